//! Startup - wires adapters from configuration and serves a router.
//!
//! Every external collaborator is optional. A missing setting leaves the
//! matching port unset, and the affected endpoint answers with its
//! "not configured" error at request time.

use axum::Router;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;

use crate::adapters::ai::{WorkersAiBinding, WorkersAiConfig};
use crate::adapters::contact::{DirectEmailDelivery, ForwardingConfig, ForwardingDelivery};
use crate::adapters::email::{ResendConfig, ResendEmailSender};
use crate::adapters::http::{
    site_app, worker_app, ChatAppState, ContactAppState, DeliveryAppState,
};
use crate::application::handlers::chat::StreamChatHandler;
use crate::application::handlers::contact::SubmitContactHandler;
use crate::config::{AppConfig, ConfigError, ServerConfig, ValidationError};
use crate::ports::{
    ContactDelivery, DeliveryError, EmailError, EmailSender, InferenceBinding, InferenceError,
};

/// Errors that stop a service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("inference binding setup failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("contact delivery setup failed: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("email sender setup failed: {0}")]
    Email(#[from] EmailError),

    #[error("server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

// ════════════════════════════════════════════════════════════════════════════════
// Adapters
// ════════════════════════════════════════════════════════════════════════════════

/// Workers AI binding, when account and token are configured.
pub fn inference_binding(
    config: &AppConfig,
) -> Result<Option<Arc<dyn InferenceBinding>>, StartupError> {
    let Some(ai) = WorkersAiConfig::from_app_config(&config.ai, config.server.request_timeout())
    else {
        return Ok(None);
    };
    Ok(Some(Arc::new(WorkersAiBinding::new(ai)?)))
}

/// Resend sender, when an API key is configured.
pub fn email_sender(config: &AppConfig) -> Result<Option<Arc<dyn EmailSender>>, StartupError> {
    let Some(api_key) = config.email.api_key() else {
        return Ok(None);
    };
    let resend = ResendConfig::new(api_key)
        .with_base_url(config.email.base_url.clone())
        .with_timeout(config.server.request_timeout());
    Ok(Some(Arc::new(ResendEmailSender::new(resend)?)))
}

/// Direct-email delivery, when a sender and both addresses are configured.
pub fn direct_delivery(
    config: &AppConfig,
) -> Result<Option<Arc<dyn ContactDelivery>>, StartupError> {
    let (Some(from), Some(to)) = (config.email.from_address(), config.email.to_address()) else {
        return Ok(None);
    };
    let Some(sender) = email_sender(config)? else {
        return Ok(None);
    };
    Ok(Some(Arc::new(DirectEmailDelivery::new(sender, from, to))))
}

/// Delivery for the site API: forwarding when a worker URL is set,
/// direct email otherwise.
pub fn site_delivery(config: &AppConfig) -> Result<Option<Arc<dyn ContactDelivery>>, StartupError> {
    if let Some(forwarding) =
        ForwardingConfig::from_app_config(&config.contact, config.server.request_timeout())
    {
        return Ok(Some(Arc::new(ForwardingDelivery::new(forwarding)?)));
    }
    direct_delivery(config)
}

// ════════════════════════════════════════════════════════════════════════════════
// Applications
// ════════════════════════════════════════════════════════════════════════════════

/// Builds the site API router from configuration.
pub fn build_site_app(config: &AppConfig) -> Result<Router, StartupError> {
    let binding = inference_binding(config)?;
    if binding.is_none() {
        tracing::warn!("No inference binding configured; /api/chat will answer 500");
    }
    let chat = StreamChatHandler::new(binding, config.ai.model())
        .with_gateway(config.ai.gateway_id());

    let delivery = site_delivery(config)?;
    if delivery.is_none() {
        tracing::warn!("No contact delivery configured; /api/contact will answer 500");
    }
    let contact = SubmitContactHandler::new(delivery);

    Ok(site_app(
        ChatAppState::new(chat),
        ContactAppState::new(contact),
        &config.server,
    ))
}

/// Builds the delivery worker router from configuration.
pub fn build_worker_app(config: &AppConfig) -> Result<Router, StartupError> {
    let delivery = direct_delivery(config)?;
    if delivery.is_none() {
        tracing::warn!("Email settings incomplete; deliveries will answer 500");
    }
    let token = config.contact.worker_token();
    if token.is_none() {
        tracing::warn!("No worker token configured; accepting unauthenticated deliveries");
    }

    let state = DeliveryAppState::new(SubmitContactHandler::new(delivery)).with_token(token);
    Ok(worker_app(state, &config.server))
}

// ════════════════════════════════════════════════════════════════════════════════
// Serving
// ════════════════════════════════════════════════════════════════════════════════

/// Binds the configured address and serves until Ctrl+C or SIGTERM.
pub async fn serve(app: Router, server: &ServerConfig) -> Result<(), StartupError> {
    let addr = server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, environment = ?server.environment, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AiConfig, ContactConfig, EmailConfig};
    use secrecy::Secret;

    fn email_config() -> EmailConfig {
        EmailConfig {
            resend_api_key: Some(Secret::new("re_test".to_string())),
            from: Some("site@example.com".to_string()),
            to: Some("me@example.com".to_string()),
            ..EmailConfig::default()
        }
    }

    #[test]
    fn empty_config_leaves_every_port_unset() {
        let config = AppConfig::default();
        assert!(inference_binding(&config).unwrap().is_none());
        assert!(email_sender(&config).unwrap().is_none());
        assert!(site_delivery(&config).unwrap().is_none());
        assert!(direct_delivery(&config).unwrap().is_none());
    }

    #[test]
    fn direct_delivery_needs_addresses_and_key() {
        let mut config = AppConfig {
            email: email_config(),
            ..AppConfig::default()
        };
        assert!(direct_delivery(&config).unwrap().is_some());

        config.email.to = None;
        assert!(direct_delivery(&config).unwrap().is_none());

        config.email = EmailConfig {
            resend_api_key: None,
            ..email_config()
        };
        assert!(direct_delivery(&config).unwrap().is_none());
    }

    #[test]
    fn site_delivery_prefers_forwarding_or_falls_back_to_email() {
        let config = AppConfig {
            email: email_config(),
            ..AppConfig::default()
        };
        assert!(site_delivery(&config).unwrap().is_some());

        let config = AppConfig {
            contact: ContactConfig {
                worker_url: Some("https://worker.example.com".to_string()),
                worker_token: None,
            },
            ..AppConfig::default()
        };
        assert!(site_delivery(&config).unwrap().is_some());
    }

    #[test]
    fn binding_is_built_from_credentials() {
        let config = AppConfig {
            ai: AiConfig {
                account_id: Some("acct".to_string()),
                api_token: Some(Secret::new("tok".to_string())),
                ..AiConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(inference_binding(&config).unwrap().is_some());
    }

    #[tokio::test]
    async fn both_apps_build_from_empty_config() {
        assert!(build_site_app(&AppConfig::default()).is_ok());
        assert!(build_worker_app(&AppConfig::default()).is_ok());
    }
}
