//! Contact forwarding configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::ai::is_http_url;
use super::error::ValidationError;

/// Contact forwarding configuration
///
/// `worker_url` selects the forwarding delivery variant on the site API.
/// `worker_token` is the shared secret: sent as `x-contact-token` by the
/// site API and required by the delivery worker when set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactConfig {
    /// Delivery worker endpoint
    pub worker_url: Option<String>,

    /// Shared secret between the site API and the delivery worker
    pub worker_token: Option<Secret<String>>,
}

impl ContactConfig {
    /// Trimmed worker URL; blank counts as unset.
    pub fn worker_url(&self) -> Option<String> {
        self.worker_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
    }

    /// Trimmed shared token; blank counts as unset.
    pub fn worker_token(&self) -> Option<Secret<String>> {
        self.worker_token
            .as_ref()
            .map(|t| t.expose_secret().trim().to_string())
            .filter(|t| !t.is_empty())
            .map(Secret::new)
    }

    /// Validate contact configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = self.worker_url() {
            if !is_http_url(&url) {
                return Err(ValidationError::InvalidUrl("CONTACT_WORKER_URL"));
            }
        }
        Ok(())
    }
}
