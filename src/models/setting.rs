use diesel::prelude::*;

/// One key/value row backing [`crate::domain::settings::AppSettings`].
#[derive(Debug, Clone, Queryable, Insertable, Identifiable)]
#[diesel(table_name = crate::schema::app_settings)]
#[diesel(primary_key(key))]
pub struct AppSettingRow {
    pub key: String,
    pub value: String,
}
