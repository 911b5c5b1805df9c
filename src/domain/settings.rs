use serde::{Deserialize, Serialize};

/// Tunable application settings persisted in the local metadata store.
///
/// Stored as key/value rows; unknown or missing keys fall back to defaults
/// so upgrades never fail on old databases.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    /// Rows per page in paginated listings.
    pub items_per_page: usize,
    /// Hard cap on rows returned by the SQL editor.
    pub max_result_rows: usize,
    /// Whether the editor may run statements that modify data.
    pub allow_writes: bool,
    /// Executions slower than this are flagged in the history view.
    pub slow_query_ms: i64,
    /// Table names highlighted on the dashboard.
    pub monitored_tables: Vec<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            items_per_page: 20,
            max_result_rows: 200,
            allow_writes: false,
            slow_query_ms: 5_000,
            monitored_tables: Vec::new(),
        }
    }
}

impl AppSettings {
    /// Clamps user-supplied values into safe operating ranges.
    pub fn clamped(mut self) -> Self {
        self.items_per_page = self.items_per_page.clamp(5, 100);
        self.max_result_rows = self.max_result_rows.clamp(10, 10_000);
        self.slow_query_ms = self.slow_query_ms.clamp(100, 600_000);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_bounds_out_of_range_values() {
        let settings = AppSettings {
            items_per_page: 1,
            max_result_rows: 1_000_000,
            allow_writes: true,
            slow_query_ms: 1,
            monitored_tables: vec![],
        }
        .clamped();
        assert_eq!(settings.items_per_page, 5);
        assert_eq!(settings.max_result_rows, 10_000);
        assert_eq!(settings.slow_query_ms, 100);
        assert!(settings.allow_writes);
    }
}
