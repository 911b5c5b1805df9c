use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};
use validator::Validate;

use crate::domain::activity::NewActivityEntry;
use crate::forms::auth::LoginForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::{ActivityWriter, DieselRepository};
use crate::routes::{alert_level_to_str, redirect, render_template};
use crate::services::auth as auth_service;

#[get("/login")]
pub async fn show_login(
    identity: Option<Identity>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    if identity.is_some() {
        return redirect("/");
    }

    let alerts = flash_messages
        .iter()
        .map(|f| (f.content().to_string(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("app_title", &server_config.app_title);
    context.insert("app_version", env!("CARGO_PKG_VERSION"));

    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn process_login(
    req: HttpRequest,
    web::Form(form): web::Form<LoginForm>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    if form.validate().is_err() {
        FlashMessage::error("Enter a username and a password.").send();
        return redirect("/login");
    }

    let user = match auth_service::authenticate(&server_config, &form.username, &form.password) {
        Ok(user) => user,
        Err(_) => {
            FlashMessage::error("Wrong username or password.").send();
            return redirect("/login");
        }
    };

    if let Err(e) = start_session(&req, &user) {
        log::error!("Failed to start a session: {e}");
        return HttpResponse::InternalServerError().finish();
    }

    if let Err(e) = repo.log_activity(&NewActivityEntry::new(&user.sub, "Signed in")) {
        log::error!("Failed to log sign-in: {e}");
    }

    FlashMessage::success("Signed in.").send();
    redirect("/")
}

#[post("/login/demo")]
pub async fn demo_login(req: HttpRequest, repo: web::Data<DieselRepository>) -> impl Responder {
    let user = auth_service::demo_session();

    if let Err(e) = start_session(&req, &user) {
        log::error!("Failed to start a demo session: {e}");
        return HttpResponse::InternalServerError().finish();
    }

    if let Err(e) = repo.log_activity(&NewActivityEntry::new(&user.sub, "Demo session started")) {
        log::error!("Failed to log demo sign-in: {e}");
    }

    FlashMessage::info("Browsing in read-only demo mode.").send();
    redirect("/")
}

#[post("/logout")]
pub async fn logout(
    identity: Identity,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(e) = repo.log_activity(&NewActivityEntry::new(&user.sub, "Signed out")) {
        log::error!("Failed to log sign-out: {e}");
    }
    identity.logout();
    redirect("/login")
}

fn start_session(req: &HttpRequest, user: &AuthenticatedUser) -> Result<(), String> {
    let claims = serde_json::to_string(user).map_err(|e| e.to_string())?;
    Identity::login(&req.extensions(), claims).map_err(|e| e.to_string())?;
    Ok(())
}
