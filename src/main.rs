use sqldeck::models::config::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Loading the .env file is optional; its absence only clears the
    // corresponding capability flag.
    let env_file = dotenvy::dotenv().is_ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if env_file {
        log::info!("Loaded environment from .env");
    } else {
        log::info!("No .env file found; using the process environment");
    }

    let server_config = ServerConfig::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load configuration: {e}")))?;

    sqldeck::run(server_config, env_file).await
}
