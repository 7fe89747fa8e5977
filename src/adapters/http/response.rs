//! Response helpers shared by the endpoint modules.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::dto::{ApiResponse, HealthResponse};

/// Body sent with every 405.
pub const METHOD_NOT_ALLOWED_BODY: &str = "Method Not Allowed";

/// JSON response that must never be cached.
pub fn json_response(status: StatusCode, body: ApiResponse) -> Response {
    (status, [(header::CACHE_CONTROL, "no-store")], Json(body)).into_response()
}

/// Fallback for any method an endpoint does not accept.
pub async fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_BODY).into_response()
}

/// GET /health - liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
