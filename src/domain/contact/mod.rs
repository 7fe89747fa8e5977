//! Contact domain - submission screening, request metadata, and the
//! notification email derived from them.

mod envelope;
mod metadata;
mod submission;

pub use envelope::{single_line, EmailEnvelope};
pub use metadata::{timestamp, ContactMetadata};
pub use submission::{
    is_email, ContactRejection, ContactSubmission, Screening, MAX_CONTACT_MESSAGE_LENGTH,
};
