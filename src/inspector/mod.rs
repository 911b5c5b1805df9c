//! Capability providers for the inspected remote database.
//!
//! Page services depend only on [`DatabaseInspector`]; which implementation
//! they get is decided once at startup by [`detect`]. A build without any
//! live integration, or a deployment without the matching configuration,
//! falls back to the demo backend instead of failing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::capabilities::CapabilitySet;
use crate::domain::inspect::{QueryOutcome, ServerMetrics, TableDetails, TableOverview};
use crate::models::config::ServerConfig;

pub mod demo;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "supabase")]
pub mod supabase;

#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("operation not supported by the {0} backend")]
    Unsupported(&'static str),

    #[error("write statements are disabled")]
    WritesDisabled,

    #[error("could not decode backend response: {0}")]
    Decode(String),
}

pub type InspectorResult<T> = Result<T, InspectorError>;

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for InspectorError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => InspectorError::Query("no rows returned".to_string()),
            sqlx::Error::Database(e) => InspectorError::Query(e.to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                InspectorError::Connection(err.to_string())
            }
            _ => InspectorError::Query(err.to_string()),
        }
    }
}

#[cfg(feature = "supabase")]
impl From<reqwest::Error> for InspectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            InspectorError::Connection(err.to_string())
        } else if err.is_decode() {
            InspectorError::Decode(err.to_string())
        } else {
            InspectorError::Query(err.to_string())
        }
    }
}

/// Limits applied to a single editor execution.
#[derive(Clone, Copy, Debug)]
pub struct QueryOptions {
    pub allow_writes: bool,
    pub max_rows: usize,
}

/// Provider interface for the remote database backend.
#[async_trait]
pub trait DatabaseInspector: Send + Sync {
    /// Short backend label shown in the UI and logs.
    fn backend_name(&self) -> &'static str;

    /// False when serving canned demo data.
    fn is_live(&self) -> bool;

    /// Round-trip check returning the observed latency.
    async fn ping(&self) -> InspectorResult<Duration>;

    async fn list_tables(&self) -> InspectorResult<Vec<TableOverview>>;

    async fn table_details(&self, table: &str) -> InspectorResult<TableDetails>;

    /// Execute one statement batch from the editor.
    async fn run_query(&self, sql: &str, options: QueryOptions) -> InspectorResult<QueryOutcome>;

    async fn server_metrics(&self) -> InspectorResult<ServerMetrics>;
}

/// Probes every configured integration and selects the backend.
///
/// The raw SQL driver wins over the REST client because it can execute
/// arbitrary statements; the demo backend is the always-available fallback.
/// Flags are recorded for each integration independently of which one won.
#[cfg_attr(
    not(any(feature = "postgres", feature = "supabase")),
    allow(unused_variables, unused_mut)
)]
pub fn detect(config: &ServerConfig, env_file: bool) -> (Arc<dyn DatabaseInspector>, CapabilitySet) {
    let mut capabilities = CapabilitySet {
        env_file,
        sql_formatter: crate::sql::available(),
        ..Default::default()
    };
    let mut selected: Option<Arc<dyn DatabaseInspector>> = None;

    #[cfg(feature = "postgres")]
    if let Some(remote) = &config.remote {
        match postgres::PostgresInspector::connect(remote) {
            Ok(inspector) => {
                capabilities.sql_driver = true;
                selected = Some(Arc::new(inspector));
            }
            Err(e) => log::warn!("Raw SQL driver unavailable: {e}"),
        }
    }

    #[cfg(feature = "supabase")]
    if let Some(supabase) = &config.supabase {
        match supabase::SupabaseInspector::new(supabase) {
            Ok(inspector) => {
                capabilities.cloud_client = true;
                if selected.is_none() {
                    selected = Some(Arc::new(inspector));
                }
            }
            Err(e) => log::warn!("Cloud database client unavailable: {e}"),
        }
    }

    let inspector = selected.unwrap_or_else(|| {
        log::warn!("No live database backend available; serving demo data");
        Arc::new(demo::DemoInspector::new())
    });

    log::info!(
        "Database backend: {} (capabilities: {})",
        inspector.backend_name(),
        capabilities.summary()
    );

    (inspector, capabilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::{AdminConfig, ServerConfig};

    fn bare_config() -> ServerConfig {
        ServerConfig {
            domain: "localhost".to_string(),
            address: "127.0.0.1".to_string(),
            port: 8080,
            secret: "x".repeat(64),
            database_url: ":memory:".to_string(),
            templates_dir: "templates/**/*.html".to_string(),
            app_title: "sqldeck".to_string(),
            admin: AdminConfig::default(),
            supabase: None,
            remote: None,
            monitoring: Default::default(),
        }
    }

    #[test]
    fn unconfigured_integrations_fall_back_to_demo() {
        let (inspector, capabilities) = detect(&bare_config(), false);
        assert_eq!(inspector.backend_name(), "demo");
        assert!(!inspector.is_live());
        assert!(!capabilities.cloud_client);
        assert!(!capabilities.sql_driver);
        assert!(!capabilities.env_file);
        assert!(!capabilities.has_live_backend());
    }

    #[test]
    fn env_file_flag_is_carried_through() {
        let (_, capabilities) = detect(&bare_config(), true);
        assert!(capabilities.env_file);
    }

    #[cfg(feature = "supabase")]
    #[test]
    fn configured_cloud_client_is_detected() {
        use crate::models::config::SupabaseConfig;

        let mut config = bare_config();
        config.supabase = Some(SupabaseConfig {
            url: "http://localhost:54321".to_string(),
            anon_key: "anon".to_string(),
        });
        // Client construction is offline; nothing connects until first use.
        let (inspector, capabilities) = detect(&config, false);
        assert_eq!(inspector.backend_name(), "supabase");
        assert!(capabilities.cloud_client);
        assert!(capabilities.has_live_backend());
    }

    #[cfg(all(feature = "postgres", feature = "supabase"))]
    #[test]
    fn sql_driver_wins_over_cloud_client() {
        use crate::models::config::{RemoteDbConfig, SupabaseConfig};

        let mut config = bare_config();
        config.supabase = Some(SupabaseConfig {
            url: "http://localhost:54321".to_string(),
            anon_key: "anon".to_string(),
        });
        config.remote = Some(RemoteDbConfig {
            url: "postgres://inspector@localhost/inventory".to_string(),
            pool_size: 2,
            query_timeout_secs: 5,
        });
        let (inspector, capabilities) = detect(&config, false);
        assert_eq!(inspector.backend_name(), "postgres");
        assert!(capabilities.sql_driver);
        assert!(capabilities.cloud_client);
    }
}
