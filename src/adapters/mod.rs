//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - Inference bindings (Workers AI REST, mock)
//! - `contact` - Contact delivery (forwarding, direct email, recording)
//! - `email` - Email senders (Resend, recording)
//! - `http` - Axum routers for both services

pub mod ai;
pub mod contact;
pub mod email;
pub mod http;
