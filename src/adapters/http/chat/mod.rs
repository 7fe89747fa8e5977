//! HTTP adapter for the chat endpoint.

pub mod handlers;
pub mod routes;

pub use handlers::{ChatApiError, ChatAppState};
pub use routes::chat_router;
