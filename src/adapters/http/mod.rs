//! HTTP adapters - endpoint exposure for the site API and the delivery worker.
//!
//! Each endpoint has its own module with handlers and routes; `app` composes
//! them into the two services.

pub mod app;
pub mod chat;
pub mod contact;
pub mod delivery;
pub mod dto;
pub mod response;

// Re-export key types for convenience
pub use app::{site_app, worker_app};
pub use chat::{chat_router, ChatAppState};
pub use contact::{contact_router, ContactAppState};
pub use delivery::{delivery_router, DeliveryAppState};
