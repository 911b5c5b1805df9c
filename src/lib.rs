#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

pub mod capabilities;
pub mod db;
pub mod domain;
pub mod dto;
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod inspector;
#[cfg(feature = "server")]
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
#[cfg(feature = "server")]
pub mod services;
pub mod sql;

#[cfg(feature = "server")]
use crate::middleware::RedirectUnauthorized;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::routes::api::{api_v1_metrics, api_v1_tables};
#[cfg(feature = "server")]
use crate::routes::auth::{demo_login, logout, process_login, show_login};
#[cfg(feature = "server")]
use crate::routes::dashboard::show_dashboard;
#[cfg(feature = "server")]
use crate::routes::editor::{
    clear_history, delete_script, execute_sql, export_result, format_sql, run_script, save_script,
    show_editor, upload_script, validate_sql,
};
#[cfg(feature = "server")]
use crate::routes::projects::{add_project, delete_project, show_projects, toggle_project};
#[cfg(feature = "server")]
use crate::routes::settings::{mint_api_token, save_settings, show_settings, test_connection};
#[cfg(feature = "server")]
use crate::routes::tables::{show_table_details, show_tables};

/// Builds and runs the Actix-Web HTTP server using the provided
/// configuration.
///
/// `env_file` records whether a `.env` file was loaded before startup; it is
/// folded into the capability flags alongside the probed integrations.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig, env_file: bool) -> std::io::Result<()> {
    // Establish Diesel connection pool for the local SQLite metadata store.
    let pool = db::establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    // Probe the optional integrations and pick the database backend.
    let (inspector, capability_flags) = inspector::detect(&server_config, env_file);
    let sql_assistant = sql::assistant();

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_login)
            .service(process_login)
            .service(demo_login)
            .service(
                web::scope("/api")
                    .service(api_v1_metrics)
                    .service(api_v1_tables),
            )
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_dashboard)
                    .service(show_tables)
                    .service(show_table_details)
                    .service(show_editor)
                    .service(execute_sql)
                    .service(format_sql)
                    .service(validate_sql)
                    .service(save_script)
                    .service(upload_script)
                    .service(run_script)
                    .service(delete_script)
                    .service(clear_history)
                    .service(export_result)
                    .service(show_projects)
                    .service(add_project)
                    .service(toggle_project)
                    .service(delete_project)
                    .service(show_settings)
                    .service(save_settings)
                    .service(test_connection)
                    .service(mint_api_token)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::from(inspector.clone()))
            .app_data(web::Data::from(sql_assistant.clone()))
            .app_data(web::Data::new(capability_flags))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
