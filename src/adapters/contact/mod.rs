//! Contact delivery adapters.
//!
//! - `ForwardingDelivery` - posts the submission to the delivery worker
//! - `DirectEmailDelivery` - composes and sends the email in-process
//! - `RecordingDelivery` - records submissions for tests

mod direct_email;
mod forwarding;
mod recording_delivery;

pub use direct_email::DirectEmailDelivery;
pub use forwarding::{ForwardingConfig, ForwardingDelivery};
pub use recording_delivery::RecordingDelivery;

/// Header carrying the shared secret between the site API and the worker.
pub const CONTACT_TOKEN_HEADER: &str = "x-contact-token";
