//! Bearer-JWT JSON API. Tokens are minted on the settings page and carry
//! the same claims as a browser session.

use actix_web::{HttpResponse, Responder, get, web};
use serde::Deserialize;

use crate::dto::tables::TablesQuery;
use crate::inspector::DatabaseInspector;
use crate::models::auth::{ACCESS_ROLE, AuthenticatedUser};
use crate::services::tables as tables_service;
use crate::services::{ServiceError, check_role};

#[get("/v1/metrics")]
pub async fn api_v1_metrics(
    user: AuthenticatedUser,
    inspector: web::Data<dyn DatabaseInspector>,
) -> impl Responder {
    if !check_role(ACCESS_ROLE, &user.roles) {
        return HttpResponse::Unauthorized().finish();
    }

    match inspector.server_metrics().await {
        Ok(metrics) => HttpResponse::Ok().json(metrics),
        Err(e) => {
            log::error!("Failed to collect metrics for the API: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[derive(Deserialize)]
struct ApiV1TablesQueryParams {
    #[serde(default)]
    query: String,
}

#[get("/v1/tables")]
pub async fn api_v1_tables(
    params: web::Query<ApiV1TablesQueryParams>,
    user: AuthenticatedUser,
    inspector: web::Data<dyn DatabaseInspector>,
) -> impl Responder {
    let query = TablesQuery {
        search: Some(params.into_inner().query),
        sort: None,
    };

    match tables_service::load_tables(inspector.as_ref(), &user, query).await {
        Ok(data) => HttpResponse::Ok().json(data.tables),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(e) => {
            log::error!("Failed to list tables for the API: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
