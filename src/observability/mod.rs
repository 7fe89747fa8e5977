//! Observability - tracing subscriber setup shared by both binaries.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::ServerConfig;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over the configured `log_level`. Production logs are JSON,
/// one event per line; everything else gets the human-readable format.
/// Calling this twice is harmless; the second call is ignored.
pub fn init_tracing(server: &ServerConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(server)));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true);

    let stdout_layer = if server.is_production() {
        stdout_layer.json().flatten_event(true).boxed()
    } else {
        stdout_layer.boxed()
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init();
}

/// Configured directive, or `info` when blank.
fn filter_directive(server: &ServerConfig) -> String {
    let level = server.log_level.trim();
    if level.is_empty() {
        "info".to_string()
    } else {
        level.to_string()
    }
}
