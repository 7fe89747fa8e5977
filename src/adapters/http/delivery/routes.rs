//! Route configuration for the contact delivery worker.

use axum::routing::post;
use axum::Router;

use super::handlers::{post_delivery, DeliveryAppState};
use crate::adapters::http::response::method_not_allowed;

/// Creates the delivery worker router.
///
/// The worker answers on every path, so a worker URL with a path segment
/// still reaches it. Explicit routes merged alongside (`/health`) win.
///
/// Routes:
/// - `POST /` and `POST /*path` - Deliver a forwarded submission
/// - any other method - 405
pub fn delivery_router() -> Router<DeliveryAppState> {
    Router::new()
        .route("/", post(post_delivery).fallback(method_not_allowed))
        .route("/*path", post(post_delivery).fallback(method_not_allowed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::contact::DirectEmailDelivery;
    use crate::adapters::email::RecordingEmailSender;
    use crate::application::handlers::contact::SubmitContactHandler;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use secrecy::Secret;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(sender: &RecordingEmailSender, token: Option<&str>) -> Router {
        let delivery =
            DirectEmailDelivery::new(Arc::new(sender.clone()), "site@example.com", "me@example.com");
        let state = DeliveryAppState::new(SubmitContactHandler::new(Some(Arc::new(delivery))))
            .with_token(token.map(|t| Secret::new(t.to_string())));
        delivery_router().with_state(state)
    }

    fn request(token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("x-contact-token", token);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn payload() -> Value {
        json!({
            "name": "A",
            "email": "a@b.com",
            "message": "hi",
            "website": "",
            "ip": "203.0.113.7",
            "userAgent": "Mozilla/5.0",
            "sentAt": "2026-10-16T09:23:05.000Z"
        })
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn delivers_with_matching_token() {
        let sender = RecordingEmailSender::new();

        let response = app(&sender, Some("s3cret"))
            .oneshot(request(Some("s3cret"), payload()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"ok": true}));

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_to, "a@b.com");
        assert!(sent[0].body.contains("Sent: 2026-10-16T09:23:05.000Z"));
        assert!(sent[0].body.contains("User-Agent: Mozilla/5.0"));
    }

    #[tokio::test]
    async fn wrong_or_missing_token_is_401() {
        let sender = RecordingEmailSender::new();

        for token in [Some("wrong"), None] {
            let response = app(&sender, Some("s3cret"))
                .oneshot(request(token, payload()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                json_body(response).await,
                json!({"ok": false, "error": "Unauthorized"})
            );
        }
        assert_eq!(sender.send_count(), 0);
    }

    #[tokio::test]
    async fn non_json_body_is_invalid_payload() {
        let sender = RecordingEmailSender::new();
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "text/plain")
            .body(Body::from("name=A"))
            .unwrap();

        let response = app(&sender, None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"ok": false, "error": "Invalid payload"})
        );
    }

    #[tokio::test]
    async fn field_rejections_use_worker_messages() {
        let sender = RecordingEmailSender::new();

        for (body, expected) in [
            (json!({"name": "A", "message": "hi"}), "Missing required fields"),
            (json!({"name": "A", "email": "nope", "message": "hi"}), "Invalid email"),
            (
                json!({"name": "A", "email": "a@b.com", "message": "x".repeat(2001)}),
                "Message too long",
            ),
        ] {
            let response = app(&sender, None).oneshot(request(None, body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(json_body(response).await, json!({"ok": false, "error": expected}));
        }
        assert_eq!(sender.send_count(), 0);
    }

    #[tokio::test]
    async fn honeypot_is_ok_without_sending() {
        let sender = RecordingEmailSender::new();
        let mut body = payload();
        body["website"] = json!("http://spam");

        let response = app(&sender, None).oneshot(request(None, body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(sender.send_count(), 0);
    }

    #[tokio::test]
    async fn missing_email_settings_is_500() {
        let state = DeliveryAppState::new(SubmitContactHandler::new(None));
        let app = delivery_router().with_state(state);

        let response = app.oneshot(request(None, payload())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"ok": false, "error": "Email settings missing"})
        );
    }

    #[tokio::test]
    async fn send_failure_is_500() {
        let response = app(&RecordingEmailSender::failing(), None)
            .oneshot(request(None, payload()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({"ok": false, "error": "Send failed"}));
    }

    #[tokio::test]
    async fn delivers_on_any_path() {
        let sender = RecordingEmailSender::new();
        let request = Request::builder()
            .method("POST")
            .uri("/contact")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"name": "A", "email": "a@b.com", "message": "hi"}).to_string(),
            ))
            .unwrap();

        let response = app(&sender, None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(sender.send_count(), 1);
    }

    #[tokio::test]
    async fn get_on_any_path_is_method_not_allowed() {
        let request = Request::builder()
            .method("GET")
            .uri("/anything/nested")
            .body(Body::empty())
            .unwrap();

        let response = app(&RecordingEmailSender::new(), None)
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn get_is_method_not_allowed() {
        let request = Request::builder()
            .method("GET")
            .uri("/")
            .body(Body::empty())
            .unwrap();

        let response = app(&RecordingEmailSender::new(), None)
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
