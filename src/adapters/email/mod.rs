//! Email Sender Adapters.
//!
//! - `ResendEmailSender` - Resend HTTP API
//! - `RecordingEmailSender` - Records envelopes for testing

mod recording_sender;
mod resend_sender;

pub use recording_sender::RecordingEmailSender;
pub use resend_sender::{ResendConfig, ResendEmailSender};
