//! Contact submission and its screening rules.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::normalize::{char_len, field};

/// Maximum contact message length, in characters.
pub const MAX_CONTACT_MESSAGE_LENGTH: usize = 2000;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Minimal shape check: something@something.something, no whitespace.
pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Why a submission was refused. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactRejection {
    #[error("missing required fields")]
    MissingFields,

    #[error("invalid email")]
    InvalidEmail,

    #[error("message too long")]
    MessageTooLong,
}

/// Outcome of screening a submission that was not refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screening {
    /// Honeypot was filled. Answer as if delivered, deliver nothing.
    Spam,
    /// Passed every check; deliver it.
    Deliverable,
}

/// A contact form submission with every field normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Honeypot; real visitors never see or fill it.
    pub website: String,
}

impl ContactSubmission {
    /// Builds a submission from an untyped field map (JSON object or form).
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            name: field(fields, "name"),
            email: field(fields, "email"),
            message: field(fields, "message"),
            website: field(fields, "website"),
        }
    }

    /// Applies the checks in order: honeypot, required fields, email shape,
    /// message length.
    pub fn screen(&self) -> Result<Screening, ContactRejection> {
        if !self.website.is_empty() {
            return Ok(Screening::Spam);
        }
        if self.name.is_empty() || self.email.is_empty() || self.message.is_empty() {
            return Err(ContactRejection::MissingFields);
        }
        if !is_email(&self.email) {
            return Err(ContactRejection::InvalidEmail);
        }
        if char_len(&self.message) > MAX_CONTACT_MESSAGE_LENGTH {
            return Err(ContactRejection::MessageTooLong);
        }
        Ok(Screening::Deliverable)
    }
}
