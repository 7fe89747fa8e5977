//! Site API server: `/api/chat` and `/api/contact`.

use site_api::config::AppConfig;
use site_api::observability::init_tracing;
use site_api::startup::{build_site_app, serve, StartupError};

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        model = %config.ai.model(),
        gateway = ?config.ai.gateway_id(),
        "Starting site API"
    );

    let app = build_site_app(&config)?;
    serve(app, &config.server).await
}
