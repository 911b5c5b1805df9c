use crate::domain::inspect::QueryOutcome;
use crate::domain::project::Project;
use crate::domain::query::QueryRecord;
use crate::domain::script::SqlScript;

/// Data required to render the SQL editor template.
pub struct EditorPageData {
    /// Most recent executions, newest first.
    pub history: Vec<QueryRecord>,
    pub scripts: Vec<SqlScript>,
    /// Projects offered in the save-script form.
    pub projects: Vec<Project>,
    /// Threshold beyond which history entries are flagged as slow.
    pub slow_query_ms: i64,
}

/// Result of one editor execution, rendered inline under the console.
pub struct ExecutionData {
    pub sql: String,
    pub outcome: Option<QueryOutcome>,
    pub error: Option<String>,
    pub duration_ms: i64,
}

/// A downloadable export of a query result.
pub struct ExportData {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}
