//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `InferenceBinding` - hosted model runtime (streaming or batch)
//! - `ContactDelivery` - delivery of a screened contact submission
//! - `EmailSender` - sending a composed notification email

mod contact_delivery;
mod email_sender;
mod inference;

pub use contact_delivery::{ContactDelivery, DeliveryError, EmailError};
pub use email_sender::EmailSender;
pub use inference::{ByteStream, InferenceBinding, InferenceError, InferenceOutput, RunOptions};
