use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::capabilities::CapabilitySet;
use crate::forms::settings::{SettingsForm, TokenForm};
use crate::inspector::DatabaseInspector;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_redirect};
use crate::services::settings as settings_service;

async fn render_settings(
    tera: &Tera,
    repo: &DieselRepository,
    inspector: &dyn DatabaseInspector,
    capabilities: CapabilitySet,
    flash_messages: &IncomingFlashMessages,
    server_config: &ServerConfig,
    user: &AuthenticatedUser,
    api_token: Option<&str>,
) -> HttpResponse {
    let data =
        match settings_service::load_settings_page(repo, inspector, capabilities, user).await {
            Ok(data) => data,
            Err(err) => return service_error_redirect(err, "/"),
        };

    let mut context = base_context(flash_messages, user, "settings", server_config);
    context.insert("settings", &data.settings);
    context.insert("capabilities", &data.capabilities);
    context.insert("backend_name", &data.backend_name);
    context.insert("live", &data.live);
    context.insert("available_tables", &data.available_tables);
    context.insert("api_token", &api_token);

    render_template(tera, "settings/index.html", &context)
}

#[get("/settings")]
pub async fn show_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    inspector: web::Data<dyn DatabaseInspector>,
    capabilities: web::Data<CapabilitySet>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_settings(
        &tera,
        repo.get_ref(),
        inspector.as_ref(),
        **capabilities,
        &flash_messages,
        &server_config,
        &user,
        None,
    )
    .await
}

/// The form posts repeated `monitored_tables` fields, so the body is decoded
/// with `serde_html_form` instead of the urlencoded extractor.
#[post("/settings/save")]
pub async fn save_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: SettingsForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(e) => {
            FlashMessage::error(format!("Could not read the settings form: {e}")).send();
            return redirect("/settings");
        }
    };

    match settings_service::save_settings(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Settings saved.").send();
            redirect("/settings")
        }
        Err(err) => service_error_redirect(err, "/settings"),
    }
}

#[post("/settings/test")]
pub async fn test_connection(
    user: AuthenticatedUser,
    inspector: web::Data<dyn DatabaseInspector>,
) -> impl Responder {
    match settings_service::test_connection(inspector.as_ref(), &user).await {
        Ok(latency) => {
            FlashMessage::success(format!(
                "Connection OK: {} answered in {}ms.",
                inspector.backend_name(),
                latency.as_millis()
            ))
            .send();
            redirect("/settings")
        }
        Err(err) => service_error_redirect(err, "/settings"),
    }
}

#[post("/settings/token")]
pub async fn mint_api_token(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    inspector: web::Data<dyn DatabaseInspector>,
    capabilities: web::Data<CapabilitySet>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<TokenForm>,
) -> impl Responder {
    let token = match settings_service::mint_api_token(repo.get_ref(), &server_config, &user, form)
    {
        Ok(token) => token,
        Err(err) => return service_error_redirect(err, "/settings"),
    };

    FlashMessage::success("API token minted. Copy it now; it is not stored.").send();
    render_settings(
        &tera,
        repo.get_ref(),
        inspector.as_ref(),
        **capabilities,
        &flash_messages,
        &server_config,
        &user,
        Some(&token),
    )
    .await
}
