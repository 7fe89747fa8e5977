//! Forwarding delivery - posts the submission to the delivery worker.

use async_trait::async_trait;
use reqwest::{header, Client};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::CONTACT_TOKEN_HEADER;
use crate::config::ContactConfig;
use crate::domain::contact::{ContactMetadata, ContactSubmission};
use crate::ports::{ContactDelivery, DeliveryError};

/// Configuration for forwarding to the delivery worker.
#[derive(Debug, Clone)]
pub struct ForwardingConfig {
    /// Worker endpoint.
    pub url: String,
    /// Shared secret sent as `x-contact-token`.
    token: Option<Secret<String>>,
    /// Request timeout.
    pub timeout: Duration,
}

impl ForwardingConfig {
    /// Creates a configuration for the given worker URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Builds from application config. `None` when no worker URL is set.
    pub fn from_app_config(config: &ContactConfig, timeout: Duration) -> Option<Self> {
        let url = config.worker_url()?;
        let mut forwarding = Self::new(url).with_timeout(timeout);
        forwarding.token = config.worker_token();
        Some(forwarding)
    }

    /// Sets the shared secret.
    pub fn with_token(mut self, token: Secret<String>) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Wire payload accepted by the delivery worker.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ForwardedContact<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
    website: &'a str,
    ip: &'a str,
    user_agent: &'a str,
    sent_at: &'a str,
}

/// Delivers by forwarding to the delivery worker over HTTP.
pub struct ForwardingDelivery {
    config: ForwardingConfig,
    client: Client,
}

impl ForwardingDelivery {
    /// Creates a new forwarding delivery.
    pub fn new(config: ForwardingConfig) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DeliveryError::Transport(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl ContactDelivery for ForwardingDelivery {
    async fn deliver(
        &self,
        submission: &ContactSubmission,
        metadata: &ContactMetadata,
    ) -> Result<(), DeliveryError> {
        let payload = ForwardedContact {
            name: &submission.name,
            email: &submission.email,
            message: &submission.message,
            website: &submission.website,
            ip: &metadata.ip,
            user_agent: &metadata.user_agent,
            sent_at: &metadata.sent_at,
        };

        let mut request = self
            .client
            .post(&self.config.url)
            .header(header::ACCEPT, "application/json")
            .json(&payload);
        if let Some(token) = &self.config.token {
            request = request.header(CONTACT_TOKEN_HEADER, token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| "send failed".to_string());
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!(worker = %self.config.url, "Contact submission forwarded");
        Ok(())
    }
}
