//! Email Sender Port - sends a composed envelope.

use async_trait::async_trait;

use super::contact_delivery::EmailError;
use crate::domain::contact::EmailEnvelope;

/// Port for sending an email.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Sends the envelope. One call, one message.
    async fn send(&self, envelope: &EmailEnvelope) -> Result<(), EmailError>;
}
