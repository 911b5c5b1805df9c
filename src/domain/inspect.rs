//! Value objects describing the inspected remote database.
//!
//! These types are produced by whichever database backend is live and are
//! rendered directly by the dashboard, tables, and editor pages.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Summary line for one table in the remote database.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TableOverview {
    pub name: String,
    /// Estimated number of live rows.
    pub row_estimate: i64,
    /// Total on-disk size in bytes, when the backend reports one.
    pub size_bytes: Option<i64>,
    /// Last vacuum/analyze activity, when the backend reports one.
    pub last_modified: Option<NaiveDateTime>,
}

/// Column layout entry for a single table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
}

/// Detailed statistics for a single table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TableDetails {
    pub overview: TableOverview,
    pub columns: Vec<ColumnInfo>,
    pub index_count: Option<i64>,
    pub constraint_count: Option<i64>,
}

/// Result of executing a statement through the inspector.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QueryOutcome {
    /// A read statement producing a result set.
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<serde_json::Value>>,
        /// True when the result was cut off at the configured row cap.
        truncated: bool,
    },
    /// A write statement reporting how many rows it touched.
    Affected { rows: u64 },
}

impl QueryOutcome {
    /// Number of rows returned or affected, for history bookkeeping.
    pub fn row_count(&self) -> i64 {
        match self {
            QueryOutcome::Rows { rows, .. } => rows.len() as i64,
            QueryOutcome::Affected { rows } => *rows as i64,
        }
    }
}

/// Point-in-time server health metrics.
///
/// Fields a backend cannot report are `None` and render as "n/a"; the demo
/// backend fills every field so the dashboard stays demonstrable offline.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerMetrics {
    pub connections: Option<i64>,
    pub active_queries: Option<i64>,
    pub database_size_bytes: Option<i64>,
    pub cache_hit_ratio: Option<f64>,
    pub cpu_usage: Option<f64>,
    pub memory_usage: Option<f64>,
}

/// Formats a byte count using binary units, for templates and exports.
pub fn format_bytes(bytes: i64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes <= 0 {
        return "0 B".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_count_covers_both_variants() {
        let rows = QueryOutcome::Rows {
            columns: vec!["id".to_string()],
            rows: vec![vec![json!(1)], vec![json!(2)]],
            truncated: false,
        };
        assert_eq!(rows.row_count(), 2);
        assert_eq!(QueryOutcome::Affected { rows: 7 }.row_count(), 7);
    }

    #[test]
    fn format_bytes_picks_sensible_units() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
