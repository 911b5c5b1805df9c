//! Demo backend serving a canned sample catalog.
//!
//! Selected when no live integration is available so every page stays
//! demonstrable with zero configuration. Metrics are jittered per request
//! to keep the dashboard alive.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;

use crate::domain::inspect::{
    ColumnInfo, QueryOutcome, ServerMetrics, TableDetails, TableOverview,
};
use crate::inspector::{
    DatabaseInspector, InspectorError, InspectorResult, QueryOptions,
};
use crate::sql::StatementKind;

/// (name, row estimate, size in bytes, days since last maintenance)
const SAMPLE_TABLES: &[(&str, i64, i64, i64)] = &[
    ("customers", 15_420, 2_202_009, 0),
    ("orders", 25_678, 5_452_595, 1),
    ("order_items", 84_312, 9_332_326, 1),
    ("products", 8_934, 1_887_436, 0),
    ("suppliers", 234, 46_080, 2),
    ("invoices", 12_456, 3_565_158, 0),
    ("payments", 9_876, 1_258_291, 1),
    ("audit_log", 18_792, 9_332_326, 3),
];

pub struct DemoInspector;

impl DemoInspector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DemoInspector {
    fn default() -> Self {
        Self::new()
    }
}

fn sample_overview(name: &str, rows: i64, size: i64, age_days: i64) -> TableOverview {
    TableOverview {
        name: name.to_string(),
        row_estimate: rows,
        size_bytes: Some(size),
        last_modified: Some(Utc::now().naive_utc() - chrono::Duration::days(age_days)),
    }
}

fn sample_columns(table: &str) -> Vec<ColumnInfo> {
    let mut columns = vec![
        ColumnInfo {
            name: "id".to_string(),
            data_type: "bigint".to_string(),
            nullable: false,
        },
        ColumnInfo {
            name: "name".to_string(),
            data_type: "text".to_string(),
            nullable: false,
        },
        ColumnInfo {
            name: "status".to_string(),
            data_type: "text".to_string(),
            nullable: true,
        },
        ColumnInfo {
            name: "created_at".to_string(),
            data_type: "timestamp with time zone".to_string(),
            nullable: false,
        },
    ];
    if table == "orders" || table == "invoices" || table == "payments" {
        columns.push(ColumnInfo {
            name: "amount".to_string(),
            data_type: "numeric(12,2)".to_string(),
            nullable: false,
        });
    }
    columns
}

#[async_trait]
impl DatabaseInspector for DemoInspector {
    fn backend_name(&self) -> &'static str {
        "demo"
    }

    fn is_live(&self) -> bool {
        false
    }

    async fn ping(&self) -> InspectorResult<Duration> {
        let millis = rand::rng().random_range(1..=5);
        Ok(Duration::from_millis(millis))
    }

    async fn list_tables(&self) -> InspectorResult<Vec<TableOverview>> {
        Ok(SAMPLE_TABLES
            .iter()
            .map(|&(name, rows, size, age)| sample_overview(name, rows, size, age))
            .collect())
    }

    async fn table_details(&self, table: &str) -> InspectorResult<TableDetails> {
        let &(name, rows, size, age) = SAMPLE_TABLES
            .iter()
            .find(|&&(name, ..)| name == table)
            .ok_or_else(|| InspectorError::UnknownTable(table.to_string()))?;

        let mut rng = rand::rng();
        Ok(TableDetails {
            overview: sample_overview(name, rows, size, age),
            columns: sample_columns(name),
            index_count: Some(rng.random_range(2..=8)),
            constraint_count: Some(rng.random_range(3..=10)),
        })
    }

    async fn run_query(&self, sql: &str, options: QueryOptions) -> InspectorResult<QueryOutcome> {
        match crate::sql::classify(sql) {
            StatementKind::Read => {
                let mut rng = rand::rng();
                let available = rng.random_range(3..=12usize);
                let count = available.min(options.max_rows);
                let rows = (1..=count)
                    .map(|i| {
                        vec![
                            serde_json::json!(i),
                            serde_json::json!(format!("sample row {i}")),
                            serde_json::json!(if i % 3 == 0 { "pending" } else { "active" }),
                        ]
                    })
                    .collect();
                Ok(QueryOutcome::Rows {
                    columns: vec![
                        "id".to_string(),
                        "label".to_string(),
                        "status".to_string(),
                    ],
                    rows,
                    truncated: available > options.max_rows,
                })
            }
            StatementKind::Write => {
                if !options.allow_writes {
                    return Err(InspectorError::WritesDisabled);
                }
                let rows = rand::rng().random_range(1..=40);
                Ok(QueryOutcome::Affected { rows })
            }
        }
    }

    async fn server_metrics(&self) -> InspectorResult<ServerMetrics> {
        let mut rng = rand::rng();
        Ok(ServerMetrics {
            connections: Some(rng.random_range(45..=85)),
            active_queries: Some(rng.random_range(8..=25)),
            database_size_bytes: Some(rng.random_range(24_000_000..=28_000_000)),
            cache_hit_ratio: Some(rng.random_range(85.0..=98.0)),
            cpu_usage: Some(rng.random_range(35.0..=75.0)),
            memory_usage: Some(rng.random_range(45.0..=80.0)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn demo_backend_serves_the_sample_catalog() {
        let inspector = DemoInspector::new();
        assert!(!inspector.is_live());

        let tables = inspector.list_tables().await.unwrap();
        assert_eq!(tables.len(), SAMPLE_TABLES.len());
        assert!(tables.iter().any(|t| t.name == "customers"));

        let details = inspector.table_details("orders").await.unwrap();
        assert!(details.columns.iter().any(|c| c.name == "amount"));

        assert!(matches!(
            inspector.table_details("missing").await,
            Err(InspectorError::UnknownTable(_))
        ));
    }

    #[actix_web::test]
    async fn demo_backend_rejects_writes_unless_allowed() {
        let inspector = DemoInspector::new();
        let options = QueryOptions {
            allow_writes: false,
            max_rows: 50,
        };
        assert!(matches!(
            inspector.run_query("DELETE FROM orders", options).await,
            Err(InspectorError::WritesDisabled)
        ));

        let outcome = inspector
            .run_query("SELECT * FROM orders", options)
            .await
            .unwrap();
        assert!(matches!(outcome, QueryOutcome::Rows { .. }));
    }

    #[actix_web::test]
    async fn demo_metrics_are_fully_populated() {
        let metrics = DemoInspector::new().server_metrics().await.unwrap();
        assert!(metrics.connections.is_some());
        assert!(metrics.cpu_usage.is_some());
        assert!(metrics.memory_usage.is_some());
        assert!(metrics.cache_hit_ratio.is_some());
    }
}
