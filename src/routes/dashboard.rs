use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::inspector::DatabaseInspector;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template, service_error_redirect};
use crate::services::dashboard as dashboard_service;

#[get("/")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    inspector: web::Data<dyn DatabaseInspector>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = match dashboard_service::load_dashboard(
        repo.get_ref(),
        inspector.as_ref(),
        &server_config.monitoring,
        &user,
    )
    .await
    {
        Ok(data) => data,
        Err(err) => return service_error_redirect(err, "/"),
    };

    let mut context = base_context(&flash_messages, &user, "dashboard", &server_config);
    context.insert("metrics", &data.metrics);
    context.insert("system_alerts", &data.alerts);
    context.insert("recent_activity", &data.recent_activity);
    context.insert("backend_name", &data.backend_name);
    context.insert("live", &data.live);

    render_template(&tera, "main/dashboard.html", &context)
}
