use crate::capabilities::CapabilitySet;
use crate::domain::settings::AppSettings;

/// Data required to render the settings template.
pub struct SettingsPageData {
    pub settings: AppSettings,
    pub capabilities: CapabilitySet,
    pub backend_name: &'static str,
    pub live: bool,
    /// Table names offered in the monitored-tables selector.
    pub available_tables: Vec<String>,
    pub app_version: &'static str,
}
