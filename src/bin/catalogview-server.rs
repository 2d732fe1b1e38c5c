/// Catalog dashboard server
///
/// Serves the upload page and the dashboard API. Configuration comes from
/// the HOST, PORT and MAX_UPLOAD_BYTES environment variables.

use catalogview::config::ServerConfig;
use catalogview::server::run_server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    run_server(config).await
}
