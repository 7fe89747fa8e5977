//! Route configuration for the chat endpoint.

use axum::routing::post;
use axum::Router;

use super::handlers::{post_chat, ChatAppState};
use crate::adapters::http::response::method_not_allowed;

/// Creates the chat router.
///
/// Routes:
/// - `POST /api/chat` - Send a message, receive a streamed or plain reply
/// - any other method - 405
pub fn chat_router() -> Router<ChatAppState> {
    Router::new().route("/api/chat", post(post_chat).fallback(method_not_allowed))
}
