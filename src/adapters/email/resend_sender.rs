//! Resend email sender - EmailSender over the Resend HTTP API.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

use crate::domain::contact::EmailEnvelope;
use crate::ports::{EmailError, EmailSender};

/// Configuration for the Resend sender.
#[derive(Debug, Clone)]
pub struct ResendConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the API (default: https://api.resend.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ResendConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            base_url: "https://api.resend.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Resend API sender.
pub struct ResendEmailSender {
    config: ResendConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    reply_to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl ResendEmailSender {
    /// Creates a new sender with the given configuration.
    pub fn new(config: ResendConfig) -> Result<Self, EmailError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmailError::Transport(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { config, client })
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, envelope: &EmailEnvelope) -> Result<(), EmailError> {
        let request = SendEmailRequest {
            from: &envelope.from,
            to: [&envelope.to],
            reply_to: &envelope.reply_to,
            subject: &envelope.subject,
            text: &envelope.body,
        };

        let response = self
            .client
            .post(self.emails_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(subject = %envelope.subject, "Contact email sent");
        Ok(())
    }
}
