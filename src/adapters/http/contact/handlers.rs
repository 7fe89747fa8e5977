//! HTTP handlers for the contact form endpoint.
//!
//! The form posts either as JSON (from script) or as a plain HTML form, so
//! every reply is rendered as JSON or as a minimal HTML page depending on the
//! `Accept` header.

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::adapters::http::dto::ApiResponse;
use crate::adapters::http::response::json_response;
use crate::application::handlers::contact::{
    SubmitContactCommand, SubmitContactError, SubmitContactHandler, SubmitContactOutcome,
};
use crate::domain::contact::{ContactMetadata, ContactRejection, ContactSubmission};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the contact endpoint.
#[derive(Clone)]
pub struct ContactAppState {
    pub handler: Arc<SubmitContactHandler>,
}

impl ContactAppState {
    pub fn new(handler: SubmitContactHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/contact
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/contact - Submit the contact form.
///
/// Accepts JSON, urlencoded or multipart bodies. A filled honeypot answers
/// exactly like a successful submission.
///
/// # Errors
/// - 400 Bad Request: missing fields, bad email, message too long
/// - 500 Internal Server Error: delivery not configured or delivery failed
pub async fn post_contact(
    State(state): State<ContactAppState>,
    request: Request,
) -> Result<Response, ContactApiError> {
    let format = ReplyFormat::from_headers(request.headers());
    let metadata = request_metadata(request.headers());
    let fields = read_fields(request).await;

    let cmd = SubmitContactCommand {
        submission: ContactSubmission::from_fields(&fields),
        metadata,
    };

    let outcome = state
        .handler
        .handle(cmd)
        .await
        .map_err(|error| ContactApiError { format, error })?;

    let message = match outcome {
        SubmitContactOutcome::Delivered => "送信しました。折り返しご連絡します。",
        SubmitContactOutcome::SpamIgnored => "送信を受け付けました。",
    };
    Ok(match format {
        ReplyFormat::Json => json_response(StatusCode::OK, ApiResponse::ok()),
        ReplyFormat::Html => html_response(StatusCode::OK, message),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Request Parsing
// ════════════════════════════════════════════════════════════════════════════════

/// Reads the body into a field map. Anything unreadable becomes an empty map.
async fn read_fields(request: Request) -> Map<String, Value> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.contains("application/json") {
        let Ok(body) = Bytes::from_request(request, &()).await else {
            return Map::new();
        };
        match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(fields)) => fields,
            _ => Map::new(),
        }
    } else if content_type.contains("multipart/form-data") {
        match Multipart::from_request(request, &()).await {
            Ok(multipart) => read_multipart(multipart).await,
            Err(_) => Map::new(),
        }
    } else {
        match Form::<Vec<(String, String)>>::from_request(request, &()).await {
            Ok(Form(pairs)) => pairs
                .into_iter()
                .map(|(name, value)| (name, Value::String(value)))
                .collect(),
            Err(_) => Map::new(),
        }
    }
}

/// Text parts become strings; file parts are kept as null so they read as empty.
async fn read_multipart(mut multipart: Multipart) -> Map<String, Value> {
    let mut fields = Map::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = if field.file_name().is_some() {
            Value::Null
        } else {
            field.text().await.map(Value::String).unwrap_or(Value::Null)
        };
        fields.insert(name, value);
    }
    fields
}

/// Client address and user agent from the request headers.
///
/// The address comes from `cf-connecting-ip`, falling back to the first
/// `x-forwarded-for` hop.
pub fn request_metadata(headers: &HeaderMap) -> ContactMetadata {
    let ip = header_str(headers, "cf-connecting-ip")
        .filter(|ip| !ip.is_empty())
        .or_else(|| {
            header_str(headers, "x-forwarded-for")
                .and_then(|hops| hops.split(',').next())
                .map(str::trim)
        })
        .unwrap_or_default();
    let user_agent = header_str(headers, header::USER_AGENT.as_str()).unwrap_or_default();

    ContactMetadata::now(ip, user_agent)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

// ════════════════════════════════════════════════════════════════════════════════
// Rendering
// ════════════════════════════════════════════════════════════════════════════════

/// How the caller wants to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyFormat {
    Json,
    Html,
}

impl ReplyFormat {
    /// JSON when `Accept` mentions `application/json`, HTML otherwise.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let wants_json = headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|accept| accept.contains("application/json"));
        if wants_json {
            ReplyFormat::Json
        } else {
            ReplyFormat::Html
        }
    }
}

/// Minimal page telling a no-script visitor what happened.
pub fn html_page(message: &str) -> String {
    format!(
        "<!doctype html><html lang=\"ja\"><meta charset=\"utf-8\"><title>Contact</title>\
<body style=\"font-family: sans-serif; padding: 32px;\"><p>{}</p>\
<p><a href=\"/\">Back to site</a></p></body></html>",
        message
    )
}

fn html_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        html_page(message),
    )
        .into_response()
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that renders contact errors in the caller's format.
#[derive(Debug)]
pub struct ContactApiError {
    format: ReplyFormat,
    error: SubmitContactError,
}

impl IntoResponse for ContactApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.error {
            SubmitContactError::Rejected(ContactRejection::MissingFields) => {
                (StatusCode::BAD_REQUEST, "必須項目を入力してください。")
            }
            SubmitContactError::Rejected(ContactRejection::InvalidEmail) => {
                (StatusCode::BAD_REQUEST, "メールアドレスを確認してください。")
            }
            SubmitContactError::Rejected(ContactRejection::MessageTooLong) => {
                (StatusCode::BAD_REQUEST, "本文が長すぎます。")
            }
            SubmitContactError::NotConfigured => {
                tracing::error!("Contact delivery is not configured");
                (StatusCode::INTERNAL_SERVER_ERROR, "送信設定が未設定です。")
            }
            SubmitContactError::SendFailed(err) => {
                tracing::error!(error = %err, "Contact delivery failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "送信に失敗しました。")
            }
        };

        match self.format {
            ReplyFormat::Json => json_response(status, ApiResponse::error(message)),
            ReplyFormat::Html => html_response(status, message),
        }
    }
}
