use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::domain::types::ScriptId;
use crate::dto::editor::ExecutionData;
use crate::forms::editor::{ExecuteForm, ExportForm, SaveScriptForm, UploadScriptForm};
use crate::inspector::DatabaseInspector;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_redirect};
use crate::services::editor as editor_service;
use crate::sql::SqlAssistant;

/// Builds the editor context and renders it, optionally with the current
/// console text and one execution result inlined under the console.
fn render_editor(
    tera: &Tera,
    repo: &DieselRepository,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    user: &AuthenticatedUser,
    sql: Option<&str>,
    execution: Option<&ExecutionData>,
) -> HttpResponse {
    let data = match editor_service::load_editor_page(repo, user) {
        Ok(data) => data,
        Err(err) => return service_error_redirect(err, "/"),
    };

    let mut context = base_context(flash_messages, user, "editor", server_config);
    context.insert("history", &data.history);
    context.insert("scripts", &data.scripts);
    context.insert("projects", &data.projects);
    context.insert("slow_query_ms", &data.slow_query_ms);
    context.insert("sql", &sql.unwrap_or_default());
    insert_execution(&mut context, execution);

    render_template(tera, "editor/index.html", &context)
}

fn insert_execution(context: &mut Context, execution: Option<&ExecutionData>) {
    if let Some(execution) = execution {
        context.insert("sql", &execution.sql);
        context.insert("outcome", &execution.outcome);
        context.insert("execution_error", &execution.error);
        context.insert("duration_ms", &execution.duration_ms);
    }
}

#[get("/editor")]
pub async fn show_editor(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_editor(
        &tera,
        repo.get_ref(),
        &flash_messages,
        &server_config,
        &user,
        None,
        None,
    )
}

#[post("/editor/execute")]
pub async fn execute_sql(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    inspector: web::Data<dyn DatabaseInspector>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ExecuteForm>,
) -> impl Responder {
    let execution =
        match editor_service::execute_sql(repo.get_ref(), inspector.as_ref(), &user, &form.sql)
            .await
        {
            Ok(execution) => execution,
            Err(err) => return service_error_redirect(err, "/editor"),
        };

    render_editor(
        &tera,
        repo.get_ref(),
        &flash_messages,
        &server_config,
        &user,
        None,
        Some(&execution),
    )
}

#[post("/editor/format")]
pub async fn format_sql(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    assistant: web::Data<dyn SqlAssistant>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ExecuteForm>,
) -> impl Responder {
    let formatted = match editor_service::format_sql(assistant.as_ref(), &user, &form.sql) {
        Ok(formatted) => formatted,
        Err(err) => return service_error_redirect(err, "/editor"),
    };

    render_editor(
        &tera,
        repo.get_ref(),
        &flash_messages,
        &server_config,
        &user,
        Some(&formatted),
        None,
    )
}

#[post("/editor/validate")]
pub async fn validate_sql(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    assistant: web::Data<dyn SqlAssistant>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ExecuteForm>,
) -> impl Responder {
    match editor_service::validate_sql(assistant.as_ref(), &user, &form.sql) {
        Ok(count) => {
            FlashMessage::success(format!("Syntax OK ({count} statement(s)).")).send()
        }
        Err(err) => FlashMessage::error(format!("Syntax check failed: {err}")).send(),
    }

    render_editor(
        &tera,
        repo.get_ref(),
        &flash_messages,
        &server_config,
        &user,
        Some(&form.sql),
        None,
    )
}

#[post("/editor/save")]
pub async fn save_script(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SaveScriptForm>,
) -> impl Responder {
    match editor_service::save_script(repo.get_ref(), &user, form) {
        Ok(script) => {
            FlashMessage::success(format!("Script \"{}\" saved.", script.name)).send();
            redirect("/editor")
        }
        Err(err) => service_error_redirect(err, "/editor"),
    }
}

#[post("/editor/upload")]
pub async fn upload_script(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadScriptForm>,
) -> impl Responder {
    let name = form
        .name
        .map(|n| n.into_inner())
        .or_else(|| form.file.file_name.clone())
        .unwrap_or_default();

    let contents = match std::fs::read(form.file.file.path()) {
        Ok(contents) => contents,
        Err(e) => {
            log::error!("Failed to read an uploaded script: {e}");
            FlashMessage::error("Could not read the uploaded file.").send();
            return redirect("/editor");
        }
    };

    match editor_service::upload_script(repo.get_ref(), &user, &name, &contents) {
        Ok(script) => {
            FlashMessage::success(format!("Script \"{}\" uploaded.", script.name)).send();
            redirect("/editor")
        }
        Err(err) => service_error_redirect(err, "/editor"),
    }
}

#[post("/editor/scripts/{id}/run")]
pub async fn run_script(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    inspector: web::Data<dyn DatabaseInspector>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let id = match ScriptId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/editor");
        }
    };

    let (script, execution) =
        match editor_service::run_script(repo.get_ref(), inspector.as_ref(), &user, id).await {
            Ok(result) => result,
            Err(err) => return service_error_redirect(err, "/editor"),
        };

    FlashMessage::info(format!("Ran script \"{}\".", script.name)).send();
    render_editor(
        &tera,
        repo.get_ref(),
        &flash_messages,
        &server_config,
        &user,
        None,
        Some(&execution),
    )
}

#[post("/editor/scripts/{id}/delete")]
pub async fn delete_script(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = match ScriptId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/editor");
        }
    };

    match editor_service::delete_script(repo.get_ref(), &user, id) {
        Ok(()) => {
            FlashMessage::success("Script deleted.").send();
            redirect("/editor")
        }
        Err(err) => service_error_redirect(err, "/editor"),
    }
}

#[post("/editor/history/clear")]
pub async fn clear_history(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match editor_service::clear_history(repo.get_ref(), &user) {
        Ok(removed) => {
            FlashMessage::success(format!("Removed {removed} history entries.")).send();
            redirect("/editor")
        }
        Err(err) => service_error_redirect(err, "/editor"),
    }
}

#[get("/editor/export")]
pub async fn export_result(
    params: web::Query<ExportForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    inspector: web::Data<dyn DatabaseInspector>,
) -> impl Responder {
    let params = params.into_inner();
    let export = match editor_service::export_query(
        repo.get_ref(),
        inspector.as_ref(),
        &user,
        &params.sql,
        &params.format,
    )
    .await
    {
        Ok(export) => export,
        Err(err) => return service_error_redirect(err, "/editor"),
    };

    HttpResponse::Ok()
        .content_type(export.content_type)
        .insert_header((
            actix_web::http::header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.filename),
        ))
        .body(export.body)
}
