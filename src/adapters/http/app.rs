//! Router composition for the two services.
//!
//! - `site_app` - `/api/chat`, `/api/contact`, `/health`
//! - `worker_app` - any path (delivery), `/health`

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::chat::{chat_router, ChatAppState};
use super::contact::{contact_router, ContactAppState};
use super::delivery::{delivery_router, DeliveryAppState};
use super::response::health;
use crate::config::ServerConfig;

/// Site API: chat proxy and contact form.
pub fn site_app(chat: ChatAppState, contact: ContactAppState, server: &ServerConfig) -> Router {
    let router = Router::new()
        .merge(chat_router().with_state(chat))
        .merge(contact_router().with_state(contact))
        .route("/health", get(health));

    with_layers(router, server)
}

/// Delivery worker: receives forwarded submissions and sends the email.
pub fn worker_app(delivery: DeliveryAppState, server: &ServerConfig) -> Router {
    let router = Router::new()
        .merge(delivery_router().with_state(delivery))
        .route("/health", get(health));

    with_layers(router, server)
}

fn with_layers(router: Router, server: &ServerConfig) -> Router {
    let router = router.layer(TraceLayer::new_for_http());
    match cors_layer(server) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// CORS for the configured origins. `None` when no origin is configured.
fn cors_layer(server: &ServerConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT]),
    )
}
