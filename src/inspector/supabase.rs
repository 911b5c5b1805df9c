//! Cloud database client backend speaking the Supabase REST (PostgREST) API.
//!
//! The REST surface has no general SQL endpoint: table shapes come from the
//! OpenAPI document served at the REST root, row estimates from `Prefer:
//! count=estimated` probes, and raw SQL only works when the project defines
//! an `exec_sql` RPC function.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use crate::domain::inspect::{
    ColumnInfo, QueryOutcome, ServerMetrics, TableDetails, TableOverview,
};
use crate::inspector::{
    DatabaseInspector, InspectorError, InspectorResult, QueryOptions,
};
use crate::models::config::SupabaseConfig;
use crate::sql::StatementKind;

pub struct SupabaseInspector {
    http: reqwest::Client,
    base_url: String,
}

impl SupabaseInspector {
    pub fn new(config: &SupabaseConfig) -> Result<Self, InspectorError> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.anon_key)
            .map_err(|_| InspectorError::Connection("anon key is not a valid header".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.anon_key))
            .map_err(|_| InspectorError::Connection("anon key is not a valid header".to_string()))?;
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    /// Fetches the OpenAPI document PostgREST serves at the REST root.
    async fn openapi(&self) -> InspectorResult<serde_json::Value> {
        let response = self.http.get(self.rest_url("")).send().await?;
        if !response.status().is_success() {
            return Err(InspectorError::Connection(format!(
                "REST root returned {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    /// Estimated row count via a `Prefer: count=estimated` HEAD probe.
    async fn estimate_rows(&self, table: &str) -> InspectorResult<i64> {
        let response = self
            .http
            .head(self.rest_url(&format!("{table}?select=*")))
            .header("Prefer", "count=estimated")
            .header("Range", "0-0")
            .send()
            .await?;

        // Content-Range looks like "0-0/12345" or "*/12345".
        let estimate = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit('/').next())
            .and_then(|total| total.parse::<i64>().ok())
            .unwrap_or(0);

        Ok(estimate)
    }

    fn definition_columns(definition: &serde_json::Value) -> Vec<ColumnInfo> {
        let required: Vec<&str> = definition
            .get("required")
            .and_then(|r| r.as_array())
            .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();

        definition
            .get("properties")
            .and_then(|p| p.as_object())
            .map(|properties| {
                properties
                    .iter()
                    .map(|(name, spec)| ColumnInfo {
                        name: name.clone(),
                        data_type: spec
                            .get("format")
                            .or_else(|| spec.get("type"))
                            .and_then(|t| t.as_str())
                            .unwrap_or("unknown")
                            .to_string(),
                        nullable: !required.contains(&name.as_str()),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl DatabaseInspector for SupabaseInspector {
    fn backend_name(&self) -> &'static str {
        "supabase"
    }

    fn is_live(&self) -> bool {
        true
    }

    async fn ping(&self) -> InspectorResult<Duration> {
        let started = Instant::now();
        let response = self.http.get(self.rest_url("")).send().await?;
        if !response.status().is_success() {
            return Err(InspectorError::Connection(format!(
                "REST root returned {}",
                response.status()
            )));
        }
        Ok(started.elapsed())
    }

    async fn list_tables(&self) -> InspectorResult<Vec<TableOverview>> {
        let document = self.openapi().await?;
        let definitions = document
            .get("definitions")
            .and_then(|d| d.as_object())
            .ok_or_else(|| {
                InspectorError::Decode("OpenAPI document has no definitions".to_string())
            })?;

        let mut tables = Vec::with_capacity(definitions.len());
        for name in definitions.keys() {
            let row_estimate = self.estimate_rows(name).await.unwrap_or(0);
            tables.push(TableOverview {
                name: name.clone(),
                row_estimate,
                // The REST surface does not expose storage or vacuum data.
                size_bytes: None,
                last_modified: None,
            });
        }
        tables.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(tables)
    }

    async fn table_details(&self, table: &str) -> InspectorResult<TableDetails> {
        let document = self.openapi().await?;
        let definition = document
            .get("definitions")
            .and_then(|d| d.get(table))
            .ok_or_else(|| InspectorError::UnknownTable(table.to_string()))?;

        let row_estimate = self.estimate_rows(table).await.unwrap_or(0);

        Ok(TableDetails {
            overview: TableOverview {
                name: table.to_string(),
                row_estimate,
                size_bytes: None,
                last_modified: None,
            },
            columns: Self::definition_columns(definition),
            index_count: None,
            constraint_count: None,
        })
    }

    async fn run_query(&self, sql: &str, options: QueryOptions) -> InspectorResult<QueryOutcome> {
        if crate::sql::classify(sql) == StatementKind::Write && !options.allow_writes {
            return Err(InspectorError::WritesDisabled);
        }

        let response = self
            .http
            .post(self.rest_url("rpc/exec_sql"))
            .json(&serde_json::json!({ "query": sql }))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            // The project has not defined the exec_sql helper function.
            return Err(InspectorError::Unsupported("supabase"));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(InspectorError::Query(format!("{status}: {body}")));
        }

        let payload: serde_json::Value = response.json().await?;
        match payload {
            serde_json::Value::Array(objects) => {
                let mut columns: Vec<String> = Vec::new();
                let mut rows = Vec::new();
                for object in objects.iter().take(options.max_rows) {
                    let Some(map) = object.as_object() else {
                        return Err(InspectorError::Decode(
                            "expected an array of row objects".to_string(),
                        ));
                    };
                    if columns.is_empty() {
                        columns = map.keys().cloned().collect();
                    }
                    rows.push(
                        columns
                            .iter()
                            .map(|c| map.get(c).cloned().unwrap_or(serde_json::Value::Null))
                            .collect(),
                    );
                }
                let truncated = objects.len() > options.max_rows;
                Ok(QueryOutcome::Rows {
                    columns,
                    rows,
                    truncated,
                })
            }
            _ => Ok(QueryOutcome::Affected { rows: 0 }),
        }
    }

    async fn server_metrics(&self) -> InspectorResult<ServerMetrics> {
        Err(InspectorError::Unsupported("supabase"))
    }
}
