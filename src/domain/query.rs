use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Outcome status of a recorded query execution.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Success,
    Error,
}

impl QueryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryStatus::Success => "success",
            QueryStatus::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "error" => QueryStatus::Error,
            _ => QueryStatus::Success,
        }
    }
}

/// One entry in the SQL editor execution history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QueryRecord {
    pub id: i32,
    pub username: String,
    pub sql: String,
    pub status: QueryStatus,
    pub error: Option<String>,
    pub rows_affected: i64,
    pub duration_ms: i64,
    pub executed_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewQueryRecord {
    pub username: String,
    pub sql: String,
    pub status: QueryStatus,
    pub error: Option<String>,
    pub rows_affected: i64,
    pub duration_ms: i64,
}

impl NewQueryRecord {
    pub fn success(username: impl Into<String>, sql: impl Into<String>, rows: i64, ms: i64) -> Self {
        Self {
            username: username.into(),
            sql: sql.into(),
            status: QueryStatus::Success,
            error: None,
            rows_affected: rows,
            duration_ms: ms,
        }
    }

    pub fn failure(
        username: impl Into<String>,
        sql: impl Into<String>,
        error: impl Into<String>,
        ms: i64,
    ) -> Self {
        Self {
            username: username.into(),
            sql: sql.into(),
            status: QueryStatus::Error,
            error: Some(error.into()),
            rows_affected: 0,
            duration_ms: ms,
        }
    }
}
