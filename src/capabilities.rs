//! Optional-integration availability flags.
//!
//! Each optional external integration is probed once at startup; the
//! resulting flags are shared read-only with handlers and templates.
//! A missing integration never aborts startup; the matching provider
//! falls back to a demo or no-op implementation instead.

use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct CapabilitySet {
    /// Supabase-style REST client constructed and configured.
    pub cloud_client: bool,
    /// Direct PostgreSQL driver constructed and configured.
    pub sql_driver: bool,
    /// SQL parser/formatter compiled in.
    pub sql_formatter: bool,
    /// A `.env` file was found and loaded at startup.
    pub env_file: bool,
}

impl CapabilitySet {
    /// True when any live database backend is available.
    pub fn has_live_backend(&self) -> bool {
        self.cloud_client || self.sql_driver
    }

    /// One-line summary for the startup log.
    pub fn summary(&self) -> String {
        fn mark(flag: bool) -> &'static str {
            if flag { "on" } else { "off" }
        }
        format!(
            "cloud client {}, sql driver {}, sql formatter {}, env file {}",
            mark(self.cloud_client),
            mark(self.sql_driver),
            mark(self.sql_formatter),
            mark(self.env_file),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_are_all_false() {
        let capabilities = CapabilitySet::default();
        assert!(!capabilities.cloud_client);
        assert!(!capabilities.sql_driver);
        assert!(!capabilities.sql_formatter);
        assert!(!capabilities.env_file);
        assert!(!capabilities.has_live_backend());
    }

    #[test]
    fn summary_reflects_flags() {
        let capabilities = CapabilitySet {
            sql_driver: true,
            ..Default::default()
        };
        assert_eq!(
            capabilities.summary(),
            "cloud client off, sql driver on, sql formatter off, env file off"
        );
    }
}
