use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::script::{
    NewSqlScript as DomainNewSqlScript, SqlScript as DomainSqlScript,
    UpdateSqlScript as DomainUpdateSqlScript,
};
use crate::models::project::Project;

/// Diesel model for [`crate::domain::script::SqlScript`].
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::scripts)]
#[diesel(belongs_to(Project, foreign_key = project_id))]
pub struct SqlScript {
    pub id: i32,
    pub project_id: Option<i32>,
    pub name: String,
    pub description: String,
    pub body: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`SqlScript`].
#[derive(Insertable)]
#[diesel(table_name = crate::schema::scripts)]
pub struct NewSqlScript<'a> {
    pub project_id: Option<i32>,
    pub name: &'a str,
    pub description: &'a str,
    pub body: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data used when updating a [`SqlScript`] record.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::scripts)]
pub struct UpdateSqlScript<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub body: &'a str,
    pub updated_at: NaiveDateTime,
}

impl From<SqlScript> for DomainSqlScript {
    fn from(script: SqlScript) -> Self {
        Self {
            id: script.id,
            project_id: script.project_id,
            name: script.name,
            description: script.description,
            body: script.body,
            created_at: script.created_at,
            updated_at: script.updated_at,
        }
    }
}

impl<'a> NewSqlScript<'a> {
    pub fn from_domain(script: &'a DomainNewSqlScript, now: NaiveDateTime) -> Self {
        Self {
            project_id: script.project_id,
            name: &script.name,
            description: &script.description,
            body: &script.body,
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateSqlScript<'a> {
    pub fn from_domain(script: &'a DomainUpdateSqlScript, now: NaiveDateTime) -> Self {
        Self {
            name: &script.name,
            description: &script.description,
            body: &script.body,
            updated_at: now,
        }
    }
}
