//! SubmitContactHandler - screens a contact submission and delivers it.
//!
//! Used by both the site API (delivery is forwarding or direct email) and the
//! delivery worker (delivery is always direct email).

use std::sync::Arc;
use thiserror::Error;

use crate::domain::contact::{ContactMetadata, ContactRejection, ContactSubmission, Screening};
use crate::ports::{ContactDelivery, DeliveryError};

/// Command to submit a contact form.
#[derive(Debug, Clone)]
pub struct SubmitContactCommand {
    pub submission: ContactSubmission,
    pub metadata: ContactMetadata,
}

/// Successful outcomes. Both look identical to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitContactOutcome {
    Delivered,
    /// Honeypot was filled; nothing was delivered.
    SpamIgnored,
}

/// Errors from submitting a contact form.
#[derive(Debug, Error)]
pub enum SubmitContactError {
    #[error(transparent)]
    Rejected(#[from] ContactRejection),

    #[error("contact delivery is not configured")]
    NotConfigured,

    #[error("contact delivery failed: {0}")]
    SendFailed(#[from] DeliveryError),
}

/// Handler for contact submissions.
pub struct SubmitContactHandler {
    delivery: Option<Arc<dyn ContactDelivery>>,
}

impl SubmitContactHandler {
    pub fn new(delivery: Option<Arc<dyn ContactDelivery>>) -> Self {
        Self { delivery }
    }

    pub async fn handle(
        &self,
        cmd: SubmitContactCommand,
    ) -> Result<SubmitContactOutcome, SubmitContactError> {
        // 1. Screen: honeypot first, then field rules
        if cmd.submission.screen()? == Screening::Spam {
            tracing::info!("Contact honeypot filled, submission ignored");
            return Ok(SubmitContactOutcome::SpamIgnored);
        }

        // 2. Deliver exactly once
        let delivery = self
            .delivery
            .as_ref()
            .ok_or(SubmitContactError::NotConfigured)?;
        delivery.deliver(&cmd.submission, &cmd.metadata).await?;

        Ok(SubmitContactOutcome::Delivered)
    }
}
