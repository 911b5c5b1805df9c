use serde::Serialize;

use crate::domain::project::Project;
use crate::domain::script::SqlScript;
use crate::pagination::Paginated;

/// Query parameters accepted by the projects page service.
#[derive(Debug, Default)]
pub struct ProjectsQuery {
    pub search: Option<String>,
    /// Status filter: "active" or "inactive".
    pub status: Option<String>,
    pub page: Option<usize>,
}

/// A project joined with its saved scripts.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithScripts {
    #[serde(flatten)]
    pub project: Project,
    pub script_count: i64,
    pub scripts: Vec<SqlScript>,
}

/// Data required to render the projects template.
pub struct ProjectsPageData {
    pub projects: Paginated<ProjectWithScripts>,
    pub total: usize,
    pub search_query: Option<String>,
    pub status_filter: Option<String>,
}
