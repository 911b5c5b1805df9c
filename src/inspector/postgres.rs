//! Raw SQL driver backend over a lazy PostgreSQL connection pool.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Executor, Row};

use crate::domain::inspect::{
    ColumnInfo, QueryOutcome, ServerMetrics, TableDetails, TableOverview,
};
use crate::inspector::{
    DatabaseInspector, InspectorError, InspectorResult, QueryOptions,
};
use crate::models::config::RemoteDbConfig;
use crate::sql::StatementKind;

const TABLE_OVERVIEW_SQL: &str = "\
    SELECT relname::text AS name, \
           n_live_tup::bigint AS row_estimate, \
           pg_total_relation_size(relid)::bigint AS size_bytes, \
           GREATEST(last_vacuum, last_autovacuum, last_analyze, last_autoanalyze) AS last_modified \
    FROM pg_stat_user_tables";

pub struct PostgresInspector {
    pool: PgPool,
}

impl PostgresInspector {
    /// Builds a lazy pool; the first real connection happens on first use,
    /// so a wrong URL surfaces as a page error rather than a startup abort.
    pub fn connect(config: &RemoteDbConfig) -> Result<Self, InspectorError> {
        let statement_timeout = config.query_timeout_secs * 1000;
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(Duration::from_secs(config.query_timeout_secs))
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    conn.execute(
                        format!("SET statement_timeout = {statement_timeout}").as_str(),
                    )
                    .await?;
                    Ok(())
                })
            })
            .connect_lazy(&config.url)?;

        Ok(Self { pool })
    }

    fn overview_from_row(row: &PgRow) -> InspectorResult<TableOverview> {
        Ok(TableOverview {
            name: row
                .try_get::<String, _>("name")
                .map_err(|e| InspectorError::Decode(e.to_string()))?,
            row_estimate: row
                .try_get::<i64, _>("row_estimate")
                .map_err(|e| InspectorError::Decode(e.to_string()))?,
            size_bytes: row
                .try_get::<Option<i64>, _>("size_bytes")
                .map_err(|e| InspectorError::Decode(e.to_string()))?,
            last_modified: row
                .try_get::<Option<DateTime<Utc>>, _>("last_modified")
                .map_err(|e| InspectorError::Decode(e.to_string()))?
                .map(|dt| dt.naive_utc()),
        })
    }
}

#[async_trait]
impl DatabaseInspector for PostgresInspector {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    fn is_live(&self) -> bool {
        true
    }

    async fn ping(&self) -> InspectorResult<Duration> {
        let started = Instant::now();
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(started.elapsed())
    }

    async fn list_tables(&self) -> InspectorResult<Vec<TableOverview>> {
        let rows = sqlx::query(&format!("{TABLE_OVERVIEW_SQL} ORDER BY relname"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::overview_from_row).collect()
    }

    async fn table_details(&self, table: &str) -> InspectorResult<TableDetails> {
        let overview = sqlx::query(&format!("{TABLE_OVERVIEW_SQL} WHERE relname = $1"))
            .bind(table)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| InspectorError::UnknownTable(table.to_string()))?;
        let overview = Self::overview_from_row(&overview)?;

        let columns = sqlx::query(
            "SELECT column_name::text AS name, data_type::text AS data_type, \
                    (is_nullable = 'YES') AS nullable \
             FROM information_schema.columns \
             WHERE table_schema = 'public' AND table_name = $1 \
             ORDER BY ordinal_position",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| -> InspectorResult<ColumnInfo> {
            Ok(ColumnInfo {
                name: row
                    .try_get("name")
                    .map_err(|e| InspectorError::Decode(e.to_string()))?,
                data_type: row
                    .try_get("data_type")
                    .map_err(|e| InspectorError::Decode(e.to_string()))?,
                nullable: row
                    .try_get("nullable")
                    .map_err(|e| InspectorError::Decode(e.to_string()))?,
            })
        })
        .collect::<InspectorResult<Vec<_>>>()?;

        let index_count: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM pg_indexes \
             WHERE schemaname = 'public' AND tablename = $1",
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await?;

        let constraint_count: i64 = sqlx::query_scalar(
            "SELECT count(*) FROM information_schema.table_constraints \
             WHERE table_schema = 'public' AND table_name = $1",
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await?;

        Ok(TableDetails {
            overview,
            columns,
            index_count: Some(index_count),
            constraint_count: Some(constraint_count),
        })
    }

    async fn run_query(&self, sql: &str, options: QueryOptions) -> InspectorResult<QueryOutcome> {
        match crate::sql::classify(sql) {
            StatementKind::Read => {
                // Wrapping the statement lets arbitrary result shapes come
                // back as one JSON object per row.
                let inner = sql.trim().trim_end_matches(';');
                let wrapped = format!(
                    "SELECT row_to_json(q)::text AS row_json FROM ({inner}) AS q LIMIT {}",
                    options.max_rows + 1
                );
                let raw = sqlx::query(&wrapped).fetch_all(&self.pool).await?;

                let mut columns: Vec<String> = Vec::new();
                let mut rows: Vec<Vec<serde_json::Value>> = Vec::new();
                for row in raw.iter().take(options.max_rows) {
                    let json: String = row
                        .try_get("row_json")
                        .map_err(|e| InspectorError::Decode(e.to_string()))?;
                    let object: serde_json::Map<String, serde_json::Value> =
                        serde_json::from_str(&json)
                            .map_err(|e| InspectorError::Decode(e.to_string()))?;
                    if columns.is_empty() {
                        columns = object.keys().cloned().collect();
                    }
                    rows.push(
                        columns
                            .iter()
                            .map(|c| object.get(c).cloned().unwrap_or(serde_json::Value::Null))
                            .collect(),
                    );
                }

                Ok(QueryOutcome::Rows {
                    columns,
                    truncated: raw.len() > options.max_rows,
                    rows,
                })
            }
            StatementKind::Write => {
                if !options.allow_writes {
                    return Err(InspectorError::WritesDisabled);
                }
                let result = sqlx::query(sql).execute(&self.pool).await?;
                Ok(QueryOutcome::Affected {
                    rows: result.rows_affected(),
                })
            }
        }
    }

    async fn server_metrics(&self) -> InspectorResult<ServerMetrics> {
        let row = sqlx::query(
            "SELECT (SELECT count(*) FROM pg_stat_activity)::bigint AS connections, \
                    (SELECT count(*) FROM pg_stat_activity WHERE state = 'active')::bigint AS active_queries, \
                    pg_database_size(current_database())::bigint AS database_size, \
                    (SELECT round(100.0 * sum(blks_hit) / NULLIF(sum(blks_hit) + sum(blks_read), 0), 1) \
                       FROM pg_stat_database)::float8 AS cache_hit_ratio",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(ServerMetrics {
            connections: row
                .try_get("connections")
                .map_err(|e| InspectorError::Decode(e.to_string()))?,
            active_queries: row
                .try_get("active_queries")
                .map_err(|e| InspectorError::Decode(e.to_string()))?,
            database_size_bytes: row
                .try_get("database_size")
                .map_err(|e| InspectorError::Decode(e.to_string()))?,
            cache_hit_ratio: row
                .try_get("cache_hit_ratio")
                .map_err(|e| InspectorError::Decode(e.to_string()))?,
            // Host-level usage is not visible through SQL.
            cpu_usage: None,
            memory_usage: None,
        })
    }
}
