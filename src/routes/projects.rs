use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::types::ProjectId;
use crate::forms::projects::AddProjectForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_redirect};
use crate::services::projects as projects_service;

#[derive(Deserialize)]
struct ProjectsQueryParams {
    q: Option<String>,
    status: Option<String>,
    page: Option<usize>,
}

#[get("/projects")]
pub async fn show_projects(
    params: web::Query<ProjectsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = crate::dto::projects::ProjectsQuery {
        search: params.q,
        status: params.status,
        page: params.page,
    };

    let data = match projects_service::load_projects_page(repo.get_ref(), &user, query) {
        Ok(data) => data,
        Err(err) => return service_error_redirect(err, "/"),
    };

    let mut context = base_context(&flash_messages, &user, "projects", &server_config);
    context.insert("projects", &data.projects);
    context.insert("total", &data.total);
    context.insert("search_query", &data.search_query);
    context.insert("status_filter", &data.status_filter);

    render_template(&tera, "projects/index.html", &context)
}

#[post("/projects/add")]
pub async fn add_project(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddProjectForm>,
) -> impl Responder {
    match projects_service::add_project(repo.get_ref(), &user, form) {
        Ok(project) => {
            FlashMessage::success(format!("Project \"{}\" created.", project.name)).send();
            redirect("/projects")
        }
        Err(err) => service_error_redirect(err, "/projects"),
    }
}

#[post("/projects/{id}/toggle")]
pub async fn toggle_project(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = match ProjectId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/projects");
        }
    };

    match projects_service::toggle_project(repo.get_ref(), &user, id) {
        Ok(project) => {
            FlashMessage::success(format!(
                "Project \"{}\" is now {}.",
                project.name,
                project.status.as_str()
            ))
            .send();
            redirect("/projects")
        }
        Err(err) => service_error_redirect(err, "/projects"),
    }
}

#[post("/projects/{id}/delete")]
pub async fn delete_project(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let id = match ProjectId::new(path.into_inner()) {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/projects");
        }
    };

    match projects_service::delete_project(repo.get_ref(), &user, id) {
        Ok(()) => {
            FlashMessage::success("Project deleted. Its scripts were kept.").send();
            redirect("/projects")
        }
        Err(err) => service_error_redirect(err, "/projects"),
    }
}
