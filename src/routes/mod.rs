//! Route helpers shared by every handler module.

use actix_web::http::header;
use actix_web::HttpResponse;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::services::ServiceError;

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod editor;
pub mod projects;
pub mod settings;
pub mod tables;

/// Renders a Tera template or logs and returns a 500.
pub fn render_template(tera: &Tera, name: &str, context: &Context) -> HttpResponse {
    match tera.render(name, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render template {name}: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// 303 redirect to the given location.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Maps flash levels onto the alert styles the templates use.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context pre-populated with everything the base template needs.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    config: &ServerConfig,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content().to_string(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("app_title", &config.app_title);
    context.insert("app_version", env!("CARGO_PKG_VERSION"));
    context
}

/// Standard translation of service failures for page handlers: flash the
/// problem and send the user somewhere sensible.
pub fn service_error_redirect(err: ServiceError, fallback: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error("You are not authorized to do that.").send();
            redirect("/")
        }
        ServiceError::NotFound => {
            FlashMessage::error("Not found.").send();
            redirect(fallback)
        }
        ServiceError::Form(msg) => {
            FlashMessage::error(msg).send();
            redirect(fallback)
        }
        ServiceError::Inspector(e) => {
            FlashMessage::error(format!("Database backend error: {e}")).send();
            redirect(fallback)
        }
        ServiceError::Internal(e) => {
            log::error!("Service failure: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
