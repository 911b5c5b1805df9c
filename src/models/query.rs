use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::query::{
    NewQueryRecord as DomainNewQueryRecord, QueryRecord as DomainQueryRecord, QueryStatus,
};

/// Diesel model for [`crate::domain::query::QueryRecord`].
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::query_history)]
pub struct QueryRecord {
    pub id: i32,
    pub username: String,
    pub sql: String,
    pub status: String,
    pub error: Option<String>,
    pub rows_affected: i64,
    pub duration_ms: i64,
    pub executed_at: NaiveDateTime,
}

/// Insertable form of [`QueryRecord`].
#[derive(Insertable)]
#[diesel(table_name = crate::schema::query_history)]
pub struct NewQueryRecord<'a> {
    pub username: &'a str,
    pub sql: &'a str,
    pub status: &'a str,
    pub error: Option<&'a str>,
    pub rows_affected: i64,
    pub duration_ms: i64,
    pub executed_at: NaiveDateTime,
}

impl From<QueryRecord> for DomainQueryRecord {
    fn from(record: QueryRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            sql: record.sql,
            status: QueryStatus::parse(&record.status),
            error: record.error,
            rows_affected: record.rows_affected,
            duration_ms: record.duration_ms,
            executed_at: record.executed_at,
        }
    }
}

impl<'a> NewQueryRecord<'a> {
    pub fn from_domain(record: &'a DomainNewQueryRecord, now: NaiveDateTime) -> Self {
        Self {
            username: &record.username,
            sql: &record.sql,
            status: record.status.as_str(),
            error: record.error.as_deref(),
            rows_affected: record.rows_affected,
            duration_ms: record.duration_ms,
            executed_at: now,
        }
    }
}
