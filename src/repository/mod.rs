//! Persistence traits over the local metadata store.
//!
//! Services depend on these traits only; [`DieselRepository`] is the
//! production implementation and a mockall double lives behind the
//! `test-mocks` feature.

use crate::db::{DbConnection, DbPool};
use crate::domain::activity::{ActivityEntry, NewActivityEntry};
use crate::domain::project::{NewProject, Project, ProjectStatus, UpdateProject};
use crate::domain::query::{NewQueryRecord, QueryRecord};
use crate::domain::script::{NewSqlScript, SqlScript, UpdateSqlScript};
use crate::domain::settings::AppSettings;
use crate::domain::types::{ProjectId, ScriptId};
use crate::repository::errors::RepositoryResult;

pub mod activity;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod project;
pub mod query;
pub mod script;
pub mod settings;

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        let page = self.page.max(1);
        ((page - 1) * self.per_page) as i64
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProjectListQuery {
    pub search: Option<String>,
    pub status: Option<ProjectStatus>,
    pub pagination: Option<Pagination>,
}

impl ProjectListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptListQuery {
    pub project_id: Option<ProjectId>,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl ScriptListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(mut self, id: ProjectId) -> Self {
        self.project_id = Some(id);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait ProjectReader {
    fn get_project_by_id(&self, id: ProjectId) -> RepositoryResult<Option<Project>>;
    /// Returns the total match count plus one page of projects with their
    /// saved-script counts.
    fn list_projects(
        &self,
        query: ProjectListQuery,
    ) -> RepositoryResult<(usize, Vec<(Project, i64)>)>;
}

pub trait ProjectWriter {
    fn create_project(&self, new_project: &NewProject) -> RepositoryResult<Project>;
    fn update_project(&self, id: ProjectId, updates: &UpdateProject) -> RepositoryResult<Project>;
    fn set_project_status(&self, id: ProjectId, status: ProjectStatus)
    -> RepositoryResult<Project>;
    fn delete_project(&self, id: ProjectId) -> RepositoryResult<()>;
}

pub trait ScriptReader {
    fn get_script_by_id(&self, id: ScriptId) -> RepositoryResult<Option<SqlScript>>;
    fn list_scripts(&self, query: ScriptListQuery) -> RepositoryResult<(usize, Vec<SqlScript>)>;
}

pub trait ScriptWriter {
    fn create_script(&self, new_script: &NewSqlScript) -> RepositoryResult<SqlScript>;
    fn update_script(&self, id: ScriptId, updates: &UpdateSqlScript)
    -> RepositoryResult<SqlScript>;
    fn delete_script(&self, id: ScriptId) -> RepositoryResult<()>;
}

pub trait QueryHistoryReader {
    /// Most recent executions first.
    fn list_query_history(&self, limit: usize) -> RepositoryResult<Vec<QueryRecord>>;
}

pub trait QueryHistoryWriter {
    /// Appends one execution record, pruning history beyond the retention cap.
    fn record_query(&self, record: &NewQueryRecord) -> RepositoryResult<QueryRecord>;
    fn clear_query_history(&self) -> RepositoryResult<usize>;
}

pub trait ActivityReader {
    /// Most recent entries first.
    fn list_activity(&self, limit: usize) -> RepositoryResult<Vec<ActivityEntry>>;
}

pub trait ActivityWriter {
    /// Appends one audit entry, pruning the trail beyond the retention cap.
    fn log_activity(&self, entry: &NewActivityEntry) -> RepositoryResult<()>;
}

pub trait SettingsReader {
    fn load_settings(&self) -> RepositoryResult<AppSettings>;
}

pub trait SettingsWriter {
    fn save_settings(&self, settings: &AppSettings) -> RepositoryResult<()>;
}
