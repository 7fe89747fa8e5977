//! Route configuration for the contact endpoint.

use axum::routing::post;
use axum::Router;

use super::handlers::{post_contact, ContactAppState};
use crate::adapters::http::response::method_not_allowed;

/// Creates the contact router.
///
/// Routes:
/// - `POST /api/contact` - Submit the contact form (JSON, urlencoded, multipart)
/// - any other method - 405
pub fn contact_router() -> Router<ContactAppState> {
    Router::new().route(
        "/api/contact",
        post(post_contact).fallback(method_not_allowed),
    )
}
