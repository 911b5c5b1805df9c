use serde::Deserialize;

use crate::domain::settings::AppSettings;

/// Application settings form.
///
/// Posted with repeated `monitored_tables` fields, so routes decode the body
/// with `serde_html_form` rather than the urlencoded extractor.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub items_per_page: usize,
    pub max_result_rows: usize,
    /// Checkbox: present when ticked.
    #[serde(default)]
    pub allow_writes: Option<String>,
    pub slow_query_ms: i64,
    #[serde(default)]
    pub monitored_tables: Vec<String>,
}

impl From<SettingsForm> for AppSettings {
    fn from(form: SettingsForm) -> Self {
        AppSettings {
            items_per_page: form.items_per_page,
            max_result_rows: form.max_result_rows,
            allow_writes: form.allow_writes.is_some(),
            slow_query_ms: form.slow_query_ms,
            monitored_tables: form
                .monitored_tables
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
        .clamped()
    }
}

/// API token minting form.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    /// Token lifetime in days.
    pub ttl_days: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkbox_presence_toggles_writes() {
        let form = SettingsForm {
            items_per_page: 20,
            max_result_rows: 100,
            allow_writes: Some("on".to_string()),
            slow_query_ms: 5000,
            monitored_tables: vec!["orders".to_string(), " ".to_string()],
        };
        let settings: AppSettings = form.into();
        assert!(settings.allow_writes);
        assert_eq!(settings.monitored_tables, vec!["orders".to_string()]);
    }

    #[test]
    fn decodes_repeated_fields_from_form_body() {
        let form: SettingsForm = serde_html_form::from_str(
            "items_per_page=10&max_result_rows=50&slow_query_ms=2000\
             &monitored_tables=orders&monitored_tables=customers",
        )
        .unwrap();
        assert_eq!(form.monitored_tables.len(), 2);
        let settings: AppSettings = form.into();
        assert!(!settings.allow_writes);
        assert_eq!(settings.items_per_page, 10);
    }
}
