use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::settings::AppSettings;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, SettingsReader, SettingsWriter};

const ITEMS_PER_PAGE: &str = "items_per_page";
const MAX_RESULT_ROWS: &str = "max_result_rows";
const ALLOW_WRITES: &str = "allow_writes";
const SLOW_QUERY_MS: &str = "slow_query_ms";
const MONITORED_TABLES: &str = "monitored_tables";

impl SettingsReader for DieselRepository {
    fn load_settings(&self) -> RepositoryResult<AppSettings> {
        use crate::models::setting::AppSettingRow;
        use crate::schema::app_settings;

        let mut conn = self.conn()?;
        let stored: HashMap<String, String> = app_settings::table
            .load::<AppSettingRow>(&mut conn)?
            .into_iter()
            .map(|row| (row.key, row.value))
            .collect();

        // Missing or unparsable keys fall back to defaults so old databases
        // keep loading after upgrades.
        let defaults = AppSettings::default();
        Ok(AppSettings {
            items_per_page: parse_or(&stored, ITEMS_PER_PAGE, defaults.items_per_page),
            max_result_rows: parse_or(&stored, MAX_RESULT_ROWS, defaults.max_result_rows),
            allow_writes: parse_or(&stored, ALLOW_WRITES, defaults.allow_writes),
            slow_query_ms: parse_or(&stored, SLOW_QUERY_MS, defaults.slow_query_ms),
            monitored_tables: stored
                .get(MONITORED_TABLES)
                .and_then(|raw| serde_json::from_str(raw).ok())
                .unwrap_or(defaults.monitored_tables),
        })
    }
}

impl SettingsWriter for DieselRepository {
    fn save_settings(&self, settings: &AppSettings) -> RepositoryResult<()> {
        use crate::schema::app_settings;

        let monitored = serde_json::to_string(&settings.monitored_tables)
            .unwrap_or_else(|_| "[]".to_string());
        let rows = vec![
            row(ITEMS_PER_PAGE, settings.items_per_page.to_string()),
            row(MAX_RESULT_ROWS, settings.max_result_rows.to_string()),
            row(ALLOW_WRITES, settings.allow_writes.to_string()),
            row(SLOW_QUERY_MS, settings.slow_query_ms.to_string()),
            row(MONITORED_TABLES, monitored),
        ];

        let mut conn = self.conn()?;
        diesel::replace_into(app_settings::table)
            .values(&rows)
            .execute(&mut conn)?;

        Ok(())
    }
}

fn row(key: &str, value: String) -> crate::models::setting::AppSettingRow {
    crate::models::setting::AppSettingRow {
        key: key.to_string(),
        value,
    }
}

fn parse_or<T: std::str::FromStr>(stored: &HashMap<String, String>, key: &str, default: T) -> T {
    stored
        .get(key)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
