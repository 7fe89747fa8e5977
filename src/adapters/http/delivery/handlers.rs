//! HTTP handlers for the contact delivery worker.
//!
//! The worker accepts submissions forwarded by the site API, checks the
//! shared token, screens the fields again and sends the email.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use secrecy::{ExposeSecret, Secret};
use serde_json::{Map, Value};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::adapters::contact::CONTACT_TOKEN_HEADER;
use crate::adapters::http::dto::ApiResponse;
use crate::adapters::http::response::json_response;
use crate::application::handlers::contact::{
    SubmitContactCommand, SubmitContactError, SubmitContactHandler,
};
use crate::domain::contact::{ContactMetadata, ContactRejection, ContactSubmission};
use crate::domain::normalize::normalize_str;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the delivery worker.
#[derive(Clone)]
pub struct DeliveryAppState {
    pub handler: Arc<SubmitContactHandler>,
    /// Required value of `x-contact-token`. No check when unset.
    token: Option<Secret<String>>,
}

impl DeliveryAppState {
    pub fn new(handler: SubmitContactHandler) -> Self {
        Self {
            handler: Arc::new(handler),
            token: None,
        }
    }

    /// Requires callers to present this token.
    pub fn with_token(mut self, token: Option<Secret<String>>) -> Self {
        self.token = token;
        self
    }

    fn authorizes(&self, headers: &HeaderMap) -> bool {
        let Some(required) = &self.token else {
            return true;
        };
        let provided = normalize_str(
            headers
                .get(CONTACT_TOKEN_HEADER)
                .and_then(|v| v.to_str().ok()),
        );

        provided
            .as_bytes()
            .ct_eq(required.expose_secret().trim().as_bytes())
            .unwrap_u8()
            == 1
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /
// ════════════════════════════════════════════════════════════════════════════════

/// POST / - Deliver a forwarded contact submission by email.
///
/// # Errors
/// - 401 Unauthorized: token required and missing or wrong
/// - 400 Bad Request: non-JSON body, missing fields, bad email, message too long
/// - 500 Internal Server Error: email settings missing or send failed
pub async fn post_delivery(
    State(state): State<DeliveryAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, DeliveryApiError> {
    if !state.authorizes(&headers) {
        return Err(DeliveryApiError::Unauthorized);
    }

    let fields = parse_payload(&headers, &body).ok_or(DeliveryApiError::InvalidPayload)?;

    let cmd = SubmitContactCommand {
        submission: ContactSubmission::from_fields(&fields),
        metadata: ContactMetadata::from_fields(&fields),
    };
    state.handler.handle(cmd).await?;

    Ok(json_response(StatusCode::OK, ApiResponse::ok()))
}

/// `None` unless the body is declared and parses as JSON.
/// Non-object JSON yields an empty field map.
fn parse_payload(headers: &HeaderMap, body: &[u8]) -> Option<Map<String, Value>> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    if !is_json {
        return None;
    }

    match serde_json::from_slice::<Value>(body).ok()? {
        Value::Null => None,
        Value::Object(fields) => Some(fields),
        _ => Some(Map::new()),
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type for the delivery worker.
#[derive(Debug)]
pub enum DeliveryApiError {
    Unauthorized,
    InvalidPayload,
    Submit(SubmitContactError),
}

impl From<SubmitContactError> for DeliveryApiError {
    fn from(err: SubmitContactError) -> Self {
        DeliveryApiError::Submit(err)
    }
}

impl IntoResponse for DeliveryApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DeliveryApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            DeliveryApiError::InvalidPayload => (StatusCode::BAD_REQUEST, "Invalid payload"),
            DeliveryApiError::Submit(SubmitContactError::Rejected(rejection)) => {
                let message = match rejection {
                    ContactRejection::MissingFields => "Missing required fields",
                    ContactRejection::InvalidEmail => "Invalid email",
                    ContactRejection::MessageTooLong => "Message too long",
                };
                (StatusCode::BAD_REQUEST, message)
            }
            DeliveryApiError::Submit(SubmitContactError::NotConfigured) => {
                tracing::error!("Email settings missing");
                (StatusCode::INTERNAL_SERVER_ERROR, "Email settings missing")
            }
            DeliveryApiError::Submit(SubmitContactError::SendFailed(err)) => {
                tracing::error!(error = %err, "Contact email send failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Send failed")
            }
        };

        json_response(status, ApiResponse::error(message))
    }
}
