//! HTTP handlers for the chat endpoint.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::adapters::http::dto::ApiResponse;
use crate::adapters::http::response::json_response;
use crate::application::handlers::chat::{
    ChatError, ChatReply, StreamChatCommand, StreamChatHandler,
};
use crate::domain::chat::ChatRequestError;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the chat endpoint.
#[derive(Clone)]
pub struct ChatAppState {
    pub handler: Arc<StreamChatHandler>,
}

impl ChatAppState {
    pub fn new(handler: StreamChatHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/chat
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/chat - Send one message, receive the model's reply.
///
/// Streams `text/event-stream` when the binding streams; otherwise returns
/// `{ok: true, text}`.
///
/// # Errors
/// - 400 Bad Request: empty or over-long message
/// - 500 Internal Server Error: no inference binding configured
/// - 502 Bad Gateway: the binding call failed
pub async fn post_chat(
    State(state): State<ChatAppState>,
    body: Bytes,
) -> Result<Response, ChatApiError> {
    // Unparseable bodies are treated as an empty payload
    let payload = serde_json::from_slice::<Value>(&body)
        .unwrap_or_else(|_| Value::Object(Map::new()));

    match state.handler.handle(StreamChatCommand::new(payload)).await? {
        ChatReply::Stream(stream) => Ok(event_stream(Body::from_stream(stream))),
        ChatReply::Text(text) => Ok(json_response(StatusCode::OK, ApiResponse::text(text))),
    }
}

/// Wraps a relayed body in server-sent-event headers.
fn event_stream(body: Body) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/event-stream; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
            (header::CONNECTION, "keep-alive"),
        ],
        body,
    )
        .into_response()
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts chat errors to HTTP responses.
#[derive(Debug)]
pub struct ChatApiError(ChatError);

impl From<ChatError> for ChatApiError {
    fn from(err: ChatError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ChatError::InvalidRequest(ChatRequestError::EmptyMessage) => (
                StatusCode::BAD_REQUEST,
                "メッセージを入力してください。".to_string(),
            ),
            ChatError::InvalidRequest(ChatRequestError::MessageTooLong { max }) => (
                StatusCode::BAD_REQUEST,
                format!("メッセージは{}字以内で入力してください。", max),
            ),
            ChatError::BindingMissing => {
                tracing::error!("AI binding missing");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AI設定が未設定です。".to_string(),
                )
            }
            ChatError::StreamFailed(err) => {
                tracing::error!(error = %err, "AI stream failed");
                (StatusCode::BAD_GATEWAY, "AIへの接続に失敗しました。".to_string())
            }
            ChatError::FallbackFailed(err) => {
                tracing::error!(error = %err, "AI non-stream failed");
                (StatusCode::BAD_GATEWAY, "AI応答の取得に失敗しました。".to_string())
            }
        };

        json_response(status, ApiResponse::error(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::InferenceError;

    fn status_of(err: ChatError) -> StatusCode {
        ChatApiError::from(err).into_response().status()
    }

    #[test]
    fn error_statuses_follow_taxonomy() {
        assert_eq!(
            status_of(ChatError::InvalidRequest(ChatRequestError::EmptyMessage)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ChatError::BindingMissing),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ChatError::StreamFailed(InferenceError::network("down"))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ChatError::FallbackFailed(InferenceError::parse("bad"))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn error_responses_are_not_cached() {
        let response = ChatApiError::from(ChatError::BindingMissing).into_response();
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }
}
