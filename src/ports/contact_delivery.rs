//! Contact Delivery Port - hand a screened submission to whatever sends it.
//!
//! Two implementations exist: forwarding to the delivery worker over HTTP,
//! and composing/sending the email in-process. The site API picks one at
//! startup based on which settings are present.

use async_trait::async_trait;

use crate::domain::contact::{ContactMetadata, ContactSubmission};

/// Port for delivering a contact submission.
#[async_trait]
pub trait ContactDelivery: Send + Sync {
    /// Delivers a submission that already passed screening.
    async fn deliver(
        &self,
        submission: &ContactSubmission,
        metadata: &ContactMetadata,
    ) -> Result<(), DeliveryError>;
}

/// Delivery errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// Downstream could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// Downstream answered but refused.
    #[error("downstream rejected delivery ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Downstream `error` field, when it sent one.
        message: String,
    },

    /// Email sender failed.
    #[error("email send failed: {0}")]
    Email(#[from] EmailError),
}

/// Email sending errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    /// Provider could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider refused the message.
    #[error("provider rejected message ({status}): {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, for logs.
        body: String,
    },
}
