//! Email configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::ai::is_http_url;
use super::error::ValidationError;

/// Email configuration (Resend)
///
/// Used by the direct-email delivery variant and by the delivery worker.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    pub resend_api_key: Option<Secret<String>>,

    /// Envelope `From` address
    pub from: Option<String>,

    /// Envelope `To` address
    pub to: Option<String>,

    /// Resend API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl EmailConfig {
    /// Trimmed `From` address; blank counts as unset.
    pub fn from_address(&self) -> Option<String> {
        non_blank(self.from.as_deref())
    }

    /// Trimmed `To` address; blank counts as unset.
    pub fn to_address(&self) -> Option<String> {
        non_blank(self.to.as_deref())
    }

    /// API key, when configured.
    pub fn api_key(&self) -> Option<Secret<String>> {
        self.resend_api_key
            .as_ref()
            .map(|k| k.expose_secret().trim().to_string())
            .filter(|k| !k.is_empty())
            .map(Secret::new)
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(key) = self.api_key() {
            if !key.expose_secret().starts_with("re_") {
                return Err(ValidationError::InvalidResendKey);
            }
        }
        if let Some(from) = self.from_address() {
            if !from.contains('@') {
                return Err(ValidationError::InvalidAddress("EMAIL_FROM"));
            }
        }
        if let Some(to) = self.to_address() {
            if !to.contains('@') {
                return Err(ValidationError::InvalidAddress("EMAIL_TO"));
            }
        }
        if !is_http_url(&self.base_url) {
            return Err(ValidationError::InvalidUrl("EMAIL_BASE_URL"));
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            from: None,
            to: None,
            base_url: default_base_url(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn default_base_url() -> String {
    "https://api.resend.com".to_string()
}
