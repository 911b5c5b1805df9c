//! Configuration model loaded from external sources.

use serde::Deserialize;

/// Basic configuration shared across handlers.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Cookie/session/JWT signing secret. Must be at least 64 bytes.
    pub secret: String,
    /// Local SQLite metadata store.
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,
    #[serde(default = "default_app_title")]
    pub app_title: String,
    #[serde(default)]
    pub admin: AdminConfig,
    /// Cloud database client integration; absent means unavailable.
    #[serde(default)]
    pub supabase: Option<SupabaseConfig>,
    /// Raw SQL driver integration; absent means unavailable.
    #[serde(default)]
    pub remote: Option<RemoteDbConfig>,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

/// The single administrator account.
#[derive(Clone, Debug, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_username")]
    pub username: String,
    /// Plaintext or bcrypt hash (`$2…`); verified accordingly at login.
    #[serde(default = "default_admin_password")]
    pub password: String,
    #[serde(default = "default_admin_email")]
    pub email: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password: default_admin_password(),
            email: default_admin_email(),
        }
    }
}

/// Supabase-style REST endpoint credentials.
#[derive(Clone, Debug, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

/// Direct connection to the inspected database server.
#[derive(Clone, Debug, Deserialize)]
pub struct RemoteDbConfig {
    pub url: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
}

/// Alert thresholds for the dashboard status panel.
#[derive(Clone, Debug, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_cpu_threshold")]
    pub cpu_threshold: f64,
    #[serde(default = "default_memory_threshold")]
    pub memory_threshold: f64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            cpu_threshold: default_cpu_threshold(),
            memory_threshold: default_memory_threshold(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from an optional `sqldeck.yaml` plus `SQLDECK_*`
    /// environment variables (double underscore separates nesting levels).
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("sqldeck").required(false))
            .add_source(
                config::Environment::with_prefix("SQLDECK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

fn default_domain() -> String {
    "localhost".to_string()
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_url() -> String {
    "sqldeck.db".to_string()
}

fn default_templates_dir() -> String {
    "templates/**/*.html".to_string()
}

fn default_app_title() -> String {
    "sqldeck".to_string()
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin".to_string()
}

fn default_admin_email() -> String {
    "admin@localhost".to_string()
}

fn default_pool_size() -> u32 {
    5
}

fn default_query_timeout_secs() -> u64 {
    30
}

fn default_cpu_threshold() -> f64 {
    80.0
}

fn default_memory_threshold() -> f64 {
    85.0
}
