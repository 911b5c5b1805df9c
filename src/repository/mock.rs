//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::activity::{ActivityEntry, NewActivityEntry};
use crate::domain::project::{NewProject, Project, ProjectStatus, UpdateProject};
use crate::domain::query::{NewQueryRecord, QueryRecord};
use crate::domain::script::{NewSqlScript, SqlScript, UpdateSqlScript};
use crate::domain::settings::AppSettings;
use crate::domain::types::{ProjectId, ScriptId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ActivityReader, ActivityWriter, ProjectListQuery, ProjectReader, ProjectWriter,
    QueryHistoryReader, QueryHistoryWriter, ScriptListQuery, ScriptReader, ScriptWriter,
    SettingsReader, SettingsWriter,
};

mock! {
    pub Repository {}

    impl ProjectReader for Repository {
        fn get_project_by_id(&self, id: ProjectId) -> RepositoryResult<Option<Project>>;
        fn list_projects(
            &self,
            query: ProjectListQuery,
        ) -> RepositoryResult<(usize, Vec<(Project, i64)>)>;
    }

    impl ProjectWriter for Repository {
        fn create_project(&self, new_project: &NewProject) -> RepositoryResult<Project>;
        fn update_project(
            &self,
            id: ProjectId,
            updates: &UpdateProject,
        ) -> RepositoryResult<Project>;
        fn set_project_status(
            &self,
            id: ProjectId,
            status: ProjectStatus,
        ) -> RepositoryResult<Project>;
        fn delete_project(&self, id: ProjectId) -> RepositoryResult<()>;
    }

    impl ScriptReader for Repository {
        fn get_script_by_id(&self, id: ScriptId) -> RepositoryResult<Option<SqlScript>>;
        fn list_scripts(&self, query: ScriptListQuery) -> RepositoryResult<(usize, Vec<SqlScript>)>;
    }

    impl ScriptWriter for Repository {
        fn create_script(&self, new_script: &NewSqlScript) -> RepositoryResult<SqlScript>;
        fn update_script(
            &self,
            id: ScriptId,
            updates: &UpdateSqlScript,
        ) -> RepositoryResult<SqlScript>;
        fn delete_script(&self, id: ScriptId) -> RepositoryResult<()>;
    }

    impl QueryHistoryReader for Repository {
        fn list_query_history(&self, limit: usize) -> RepositoryResult<Vec<QueryRecord>>;
    }

    impl QueryHistoryWriter for Repository {
        fn record_query(&self, record: &NewQueryRecord) -> RepositoryResult<QueryRecord>;
        fn clear_query_history(&self) -> RepositoryResult<usize>;
    }

    impl ActivityReader for Repository {
        fn list_activity(&self, limit: usize) -> RepositoryResult<Vec<ActivityEntry>>;
    }

    impl ActivityWriter for Repository {
        fn log_activity(&self, entry: &NewActivityEntry) -> RepositoryResult<()>;
    }

    impl SettingsReader for Repository {
        fn load_settings(&self) -> RepositoryResult<AppSettings>;
    }

    impl SettingsWriter for Repository {
        fn save_settings(&self, settings: &AppSettings) -> RepositoryResult<()>;
    }
}
