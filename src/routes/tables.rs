use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::domain::inspect::format_bytes;
use crate::inspector::DatabaseInspector;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, render_template, service_error_redirect};
use crate::services::tables as tables_service;

#[derive(Deserialize)]
struct TablesQueryParams {
    q: Option<String>,
    sort: Option<String>,
}

#[get("/tables")]
pub async fn show_tables(
    params: web::Query<TablesQueryParams>,
    user: AuthenticatedUser,
    inspector: web::Data<dyn DatabaseInspector>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = crate::dto::tables::TablesQuery {
        search: params.q,
        sort: params.sort,
    };

    let data = match tables_service::load_tables(inspector.as_ref(), &user, query).await {
        Ok(data) => data,
        Err(err) => return service_error_redirect(err, "/"),
    };

    let mut context = base_context(&flash_messages, &user, "tables", &server_config);
    context.insert("tables", &data.tables);
    context.insert("total_rows", &data.total_rows);
    context.insert("total_size", &format_bytes(data.total_size_bytes));
    context.insert("search_query", &data.search_query);
    context.insert("sort", &data.sort);

    render_template(&tera, "tables/index.html", &context)
}

#[get("/tables/{name}")]
pub async fn show_table_details(
    path: web::Path<String>,
    user: AuthenticatedUser,
    inspector: web::Data<dyn DatabaseInspector>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let name = path.into_inner();

    let data = match tables_service::load_table_details(inspector.as_ref(), &user, &name).await {
        Ok(data) => data,
        Err(err) => return service_error_redirect(err, "/tables"),
    };

    let mut context = base_context(&flash_messages, &user, "tables", &server_config);
    context.insert("table", &data.details.overview);
    context.insert("columns", &data.details.columns);
    context.insert("index_count", &data.details.index_count);
    context.insert("constraint_count", &data.details.constraint_count);
    context.insert(
        "table_size",
        &data.details.overview.size_bytes.map(format_bytes),
    );

    render_template(&tera, "tables/details.html", &context)
}
