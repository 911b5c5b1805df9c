//! SQL editor services: execution, validation, formatting, history,
//! saved scripts, and result export.

use std::time::Instant;

use validator::Validate;

use crate::domain::activity::NewActivityEntry;
use crate::domain::inspect::QueryOutcome;
use crate::domain::query::NewQueryRecord;
use crate::domain::script::{NewSqlScript, SqlScript};
use crate::domain::types::ScriptId;
use crate::dto::editor::{EditorPageData, ExecutionData, ExportData};
use crate::inspector::{DatabaseInspector, QueryOptions};
use crate::models::auth::{ACCESS_ROLE, ADMIN_ROLE, AuthenticatedUser};
use crate::repository::{
    ActivityWriter, ProjectReader, ProjectListQuery, QueryHistoryReader, QueryHistoryWriter,
    ScriptListQuery, ScriptReader, ScriptWriter, SettingsReader,
};
use crate::services::{ServiceError, ServiceResult, check_role, ensure_role};
use crate::sql::SqlAssistant;

/// History entries shown under the console.
pub const HISTORY_PAGE: usize = 20;

/// Loads the editor page: history, saved scripts, and the project selector.
pub fn load_editor_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<EditorPageData>
where
    R: QueryHistoryReader + ScriptReader + ProjectReader + SettingsReader + ?Sized,
{
    ensure_role(user, ACCESS_ROLE)?;

    let history = repo.list_query_history(HISTORY_PAGE)?;
    let (_, scripts) = repo.list_scripts(ScriptListQuery::new())?;
    let (_, projects) = repo.list_projects(ProjectListQuery::new())?;
    let settings = repo.load_settings()?;

    Ok(EditorPageData {
        history,
        scripts,
        projects: projects.into_iter().map(|(project, _)| project).collect(),
        slow_query_ms: settings.slow_query_ms,
    })
}

/// Executes one statement batch and records it in the history.
///
/// Execution errors come back inside [`ExecutionData`] so the page can show
/// them next to the console instead of failing the request.
pub async fn execute_sql<R>(
    repo: &R,
    inspector: &dyn DatabaseInspector,
    user: &AuthenticatedUser,
    sql: &str,
) -> ServiceResult<ExecutionData>
where
    R: QueryHistoryWriter + ActivityWriter + SettingsReader + ?Sized,
{
    ensure_role(user, ACCESS_ROLE)?;

    let sql = sql.trim();
    if sql.is_empty() {
        return Err(ServiceError::Form("enter a SQL statement".to_string()));
    }

    let settings = repo.load_settings()?;
    let options = QueryOptions {
        // Writes need both the setting and the admin role.
        allow_writes: settings.allow_writes && check_role(ADMIN_ROLE, &user.roles),
        max_rows: settings.max_result_rows,
    };

    let started = Instant::now();
    let result = inspector.run_query(sql, options).await;
    let duration_ms = started.elapsed().as_millis() as i64;

    let execution = match result {
        Ok(outcome) => {
            repo.record_query(&NewQueryRecord::success(
                &user.sub,
                sql,
                outcome.row_count(),
                duration_ms,
            ))?;
            ExecutionData {
                sql: sql.to_string(),
                outcome: Some(outcome),
                error: None,
                duration_ms,
            }
        }
        Err(err) => {
            log::warn!("Query failed after {duration_ms}ms: {err}");
            repo.record_query(&NewQueryRecord::failure(
                &user.sub,
                sql,
                err.to_string(),
                duration_ms,
            ))?;
            ExecutionData {
                sql: sql.to_string(),
                outcome: None,
                error: Some(err.to_string()),
                duration_ms,
            }
        }
    };

    repo.log_activity(&NewActivityEntry::new(&user.sub, "Query executed").details(sql))?;

    Ok(execution)
}

/// Pretty-prints a statement with the formatter capability.
pub fn format_sql(
    assistant: &dyn SqlAssistant,
    user: &AuthenticatedUser,
    sql: &str,
) -> ServiceResult<String> {
    ensure_role(user, ACCESS_ROLE)?;
    Ok(assistant.format(sql))
}

/// Parses a statement batch, returning the statement count.
pub fn validate_sql(
    assistant: &dyn SqlAssistant,
    user: &AuthenticatedUser,
    sql: &str,
) -> ServiceResult<usize> {
    ensure_role(user, ACCESS_ROLE)?;
    assistant.validate(sql).map_err(ServiceError::Form)
}

/// Validates the save-script form and persists a new script.
pub fn save_script<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: crate::forms::editor::SaveScriptForm,
) -> ServiceResult<SqlScript>
where
    R: ScriptWriter + ActivityWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate script form: {err}");
        return Err(ServiceError::Form("invalid script form".to_string()));
    }

    let new_script: NewSqlScript = form.into();
    if new_script.body.is_empty() {
        return Err(ServiceError::Form("the script body is empty".to_string()));
    }

    let script = repo.create_script(&new_script)?;
    repo.log_activity(&NewActivityEntry::new(&user.sub, "Script saved").details(&script.name))?;

    Ok(script)
}

/// Stores an uploaded `.sql` file as a new saved script.
pub fn upload_script<R>(
    repo: &R,
    user: &AuthenticatedUser,
    name: &str,
    contents: &[u8],
) -> ServiceResult<SqlScript>
where
    R: ScriptWriter + ActivityWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLE)?;

    let body = std::str::from_utf8(contents)
        .map_err(|_| ServiceError::Form("the uploaded file is not UTF-8 text".to_string()))?;
    let name = name.trim().trim_end_matches(".sql");
    if name.is_empty() {
        return Err(ServiceError::Form("the script needs a name".to_string()));
    }

    let new_script = NewSqlScript::new(None, name.to_string(), String::new(), body.to_string());
    if new_script.body.is_empty() {
        return Err(ServiceError::Form("the uploaded file is empty".to_string()));
    }

    let script = repo.create_script(&new_script)?;
    repo.log_activity(&NewActivityEntry::new(&user.sub, "Script uploaded").details(&script.name))?;

    Ok(script)
}

/// Runs a saved script through the console pipeline.
pub async fn run_script<R>(
    repo: &R,
    inspector: &dyn DatabaseInspector,
    user: &AuthenticatedUser,
    id: ScriptId,
) -> ServiceResult<(SqlScript, ExecutionData)>
where
    R: ScriptReader + QueryHistoryWriter + ActivityWriter + SettingsReader + ?Sized,
{
    let script = repo
        .get_script_by_id(id)?
        .ok_or(ServiceError::NotFound)?;

    let execution = execute_sql(repo, inspector, user, &script.body).await?;

    Ok((script, execution))
}

/// Deletes a saved script.
pub fn delete_script<R>(repo: &R, user: &AuthenticatedUser, id: ScriptId) -> ServiceResult<()>
where
    R: ScriptReader + ScriptWriter + ActivityWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLE)?;

    let script = repo
        .get_script_by_id(id)?
        .ok_or(ServiceError::NotFound)?;
    repo.delete_script(id)?;
    repo.log_activity(&NewActivityEntry::new(&user.sub, "Script deleted").details(&script.name))?;

    Ok(())
}

/// Clears the execution history.
pub fn clear_history<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<usize>
where
    R: QueryHistoryWriter + ActivityWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLE)?;

    let removed = repo.clear_query_history()?;
    repo.log_activity(&NewActivityEntry::new(&user.sub, "Query history cleared"))?;

    Ok(removed)
}

/// Re-runs a read query and renders the result as a CSV or JSON download.
pub async fn export_query<R>(
    repo: &R,
    inspector: &dyn DatabaseInspector,
    user: &AuthenticatedUser,
    sql: &str,
    format: &str,
) -> ServiceResult<ExportData>
where
    R: SettingsReader + ?Sized,
{
    ensure_role(user, ACCESS_ROLE)?;

    let settings = repo.load_settings()?;
    // Exports never get write access regardless of settings.
    let options = QueryOptions {
        allow_writes: false,
        max_rows: settings.max_result_rows,
    };
    let outcome = inspector.run_query(sql.trim(), options).await?;

    let QueryOutcome::Rows { columns, rows, .. } = outcome else {
        return Err(ServiceError::Form(
            "only read queries can be exported".to_string(),
        ));
    };

    match format {
        "json" => {
            let objects: Vec<serde_json::Value> = rows
                .iter()
                .map(|row| {
                    columns
                        .iter()
                        .cloned()
                        .zip(row.iter().cloned())
                        .collect::<serde_json::Map<_, _>>()
                        .into()
                })
                .collect();
            let body = serde_json::to_vec_pretty(&objects)
                .map_err(|e| ServiceError::Internal(e.to_string()))?;
            Ok(ExportData {
                filename: "result.json".to_string(),
                content_type: "application/json",
                body,
            })
        }
        "csv" => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer
                .write_record(&columns)
                .map_err(|e| ServiceError::Internal(e.to_string()))?;
            for row in &rows {
                let record: Vec<String> = row.iter().map(cell_to_string).collect();
                writer
                    .write_record(&record)
                    .map_err(|e| ServiceError::Internal(e.to_string()))?;
            }
            let body = writer
                .into_inner()
                .map_err(|e| ServiceError::Internal(e.to_string()))?;
            Ok(ExportData {
                filename: "result.csv".to_string(),
                content_type: "text/csv",
                body,
            })
        }
        other => Err(ServiceError::Form(format!("unknown export format: {other}"))),
    }
}

fn cell_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::query::{QueryRecord, QueryStatus};
    use crate::inspector::demo::DemoInspector;
    use crate::repository::mock::MockRepository;

    fn admin_user() -> AuthenticatedUser {
        AuthenticatedUser::admin("admin", "admin@localhost", 3600)
    }

    fn demo_user() -> AuthenticatedUser {
        AuthenticatedUser::demo()
    }

    fn stored(record: &NewQueryRecord) -> QueryRecord {
        QueryRecord {
            id: 1,
            username: record.username.clone(),
            sql: record.sql.clone(),
            status: record.status,
            error: record.error.clone(),
            rows_affected: record.rows_affected,
            duration_ms: record.duration_ms,
            executed_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[actix_web::test]
    async fn successful_reads_land_in_history() {
        let mut repo = MockRepository::new();
        repo.expect_load_settings()
            .returning(|| Ok(Default::default()));
        repo.expect_record_query()
            .withf(|record| record.status == QueryStatus::Success)
            .times(1)
            .returning(|record| Ok(stored(record)));
        repo.expect_log_activity().times(1).returning(|_| Ok(()));

        let inspector = DemoInspector::new();
        let result = execute_sql(&repo, &inspector, &admin_user(), "SELECT 1")
            .await
            .unwrap();
        assert!(result.outcome.is_some());
        assert!(result.error.is_none());
    }

    #[actix_web::test]
    async fn refused_writes_land_in_history_as_failures() {
        let mut repo = MockRepository::new();
        repo.expect_load_settings().returning(|| {
            Ok(crate::domain::settings::AppSettings {
                allow_writes: true,
                ..Default::default()
            })
        });
        repo.expect_record_query()
            .withf(|record| record.status == QueryStatus::Error)
            .times(1)
            .returning(|record| Ok(stored(record)));
        repo.expect_log_activity().times(1).returning(|_| Ok(()));

        let inspector = DemoInspector::new();
        // The demo session lacks the admin role, so the write is rejected
        // even though the setting allows writes.
        let result = execute_sql(&repo, &inspector, &demo_user(), "DELETE FROM t")
            .await
            .unwrap();
        assert!(result.outcome.is_none());
        assert!(result.error.is_some());
    }

    #[test]
    fn save_script_requires_admin_role() {
        let mut repo = MockRepository::new();
        repo.expect_create_script().times(0);

        let form = crate::forms::editor::SaveScriptForm {
            name: "cleanup".to_string(),
            description: String::new(),
            project_id: String::new(),
            sql: "DELETE FROM sessions".to_string(),
        };
        let result = save_script(&repo, &demo_user(), form);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn upload_rejects_non_utf8_payloads() {
        let repo = MockRepository::new();
        let result = upload_script(&repo, &admin_user(), "broken.sql", &[0xff, 0xfe]);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn export_refuses_write_statements() {
        let mut repo = MockRepository::new();
        repo.expect_load_settings()
            .returning(|| Ok(Default::default()));

        let inspector = DemoInspector::new();
        let result = export_query(&repo, &inspector, &admin_user(), "DROP TABLE t", "csv").await;
        assert!(result.is_err());
    }
}
