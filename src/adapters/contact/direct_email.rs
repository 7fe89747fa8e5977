//! Direct-email delivery - composes the envelope and sends it in-process.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::contact::{ContactMetadata, ContactSubmission, EmailEnvelope};
use crate::ports::{ContactDelivery, DeliveryError, EmailSender};

/// Delivers by sending the notification email directly.
pub struct DirectEmailDelivery {
    sender: Arc<dyn EmailSender>,
    from: String,
    to: String,
}

impl DirectEmailDelivery {
    pub fn new(sender: Arc<dyn EmailSender>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            sender,
            from: from.into(),
            to: to.into(),
        }
    }
}

#[async_trait]
impl ContactDelivery for DirectEmailDelivery {
    async fn deliver(
        &self,
        submission: &ContactSubmission,
        metadata: &ContactMetadata,
    ) -> Result<(), DeliveryError> {
        let envelope = EmailEnvelope::compose(submission, metadata, &self.from, &self.to);
        self.sender.send(&envelope).await?;
        Ok(())
    }
}
