//! Inference binding configuration (Workers AI)

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Model used when no override is configured.
pub const DEFAULT_MODEL: &str = "@cf/meta/llama-3.1-8b-instruct";

/// Inference binding configuration
///
/// The binding is considered present only when both the account id and the
/// API token are set. A missing binding is not a startup error; the chat
/// endpoint reports it per request.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Workers AI account id
    pub account_id: Option<String>,

    /// Workers AI API token
    pub api_token: Option<Secret<String>>,

    /// Model identifier override
    pub model: Option<String>,

    /// AI Gateway id; requests are routed through the gateway when set
    pub gateway_id: Option<String>,

    /// REST API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// AI Gateway base URL
    #[serde(default = "default_gateway_base_url")]
    pub gateway_base_url: String,
}

impl AiConfig {
    /// Effective model identifier (trimmed override, or the default).
    pub fn model(&self) -> String {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL)
            .to_string()
    }

    /// Effective gateway id; blank values count as unset.
    pub fn gateway_id(&self) -> Option<String> {
        self.gateway_id
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
    }

    /// Account id and token, when the binding is fully configured.
    pub fn credentials(&self) -> Option<(String, Secret<String>)> {
        let account_id = self.account_id.as_deref().map(str::trim)?;
        let token = self.api_token.as_ref()?.expose_secret().trim();
        if account_id.is_empty() || token.is_empty() {
            return None;
        }
        Some((account_id.to_string(), Secret::new(token.to_string())))
    }

    /// Check if the inference binding is configured
    pub fn has_binding(&self) -> bool {
        self.credentials().is_some()
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.base_url) {
            return Err(ValidationError::InvalidUrl("AI_BASE_URL"));
        }
        if !is_http_url(&self.gateway_base_url) {
            return Err(ValidationError::InvalidUrl("AI_GATEWAY_BASE_URL"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            api_token: None,
            model: None,
            gateway_id: None,
            base_url: default_base_url(),
            gateway_base_url: default_gateway_base_url(),
        }
    }
}

pub(super) fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

fn default_base_url() -> String {
    "https://api.cloudflare.com/client/v4".to_string()
}

fn default_gateway_base_url() -> String {
    "https://gateway.ai.cloudflare.com/v1".to_string()
}
