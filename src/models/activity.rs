use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::activity::{
    ActivityEntry as DomainActivityEntry, NewActivityEntry as DomainNewActivityEntry,
};

/// Diesel model for [`crate::domain::activity::ActivityEntry`].
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::activity_log)]
pub struct ActivityEntry {
    pub id: i32,
    pub username: String,
    pub action: String,
    pub details: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`ActivityEntry`].
#[derive(Insertable)]
#[diesel(table_name = crate::schema::activity_log)]
pub struct NewActivityEntry<'a> {
    pub username: &'a str,
    pub action: &'a str,
    pub details: Option<&'a str>,
    pub created_at: NaiveDateTime,
}

impl From<ActivityEntry> for DomainActivityEntry {
    fn from(entry: ActivityEntry) -> Self {
        Self {
            id: entry.id,
            username: entry.username,
            action: entry.action,
            details: entry.details,
            created_at: entry.created_at,
        }
    }
}

impl<'a> NewActivityEntry<'a> {
    pub fn from_domain(entry: &'a DomainNewActivityEntry, now: NaiveDateTime) -> Self {
        Self {
            username: &entry.username,
            action: &entry.action,
            details: entry.details.as_deref(),
            created_at: now,
        }
    }
}
