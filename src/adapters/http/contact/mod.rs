//! HTTP adapter for the contact form endpoint.

pub mod handlers;
pub mod routes;

pub use handlers::{ContactApiError, ContactAppState, ReplyFormat};
pub use routes::contact_router;
