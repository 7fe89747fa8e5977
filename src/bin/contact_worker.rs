//! Contact delivery worker: receives forwarded submissions and sends the email.

use site_api::config::AppConfig;
use site_api::observability::init_tracing;
use site_api::startup::{build_worker_app, serve, StartupError};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!("Starting contact delivery worker");

    let app = build_worker_app(&config)?;
    serve(app, &config.server).await
}
