//! Workers AI binding - InferenceBinding over the Cloudflare REST API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = WorkersAiConfig::new(account_id, api_token)
//!     .with_base_url("https://api.cloudflare.com/client/v4")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let binding = WorkersAiBinding::new(config)?;
//! ```
//!
//! # Routing
//!
//! - Direct: `{base_url}/accounts/{account}/ai/run/{model}`
//! - Gateway: `{gateway_base_url}/{account}/{gateway}/workers-ai/{model}`
//!
//! # Streaming
//!
//! A `text/event-stream` response is handed back as a byte stream without
//! parsing; anything else is decoded as JSON and unwrapped from the
//! `{result, success}` envelope when present.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{header, Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::time::Duration;

use crate::config::AiConfig;
use crate::domain::chat::InferenceInput;
use crate::ports::{InferenceBinding, InferenceError, InferenceOutput, RunOptions};

/// Configuration for the Workers AI binding.
#[derive(Debug, Clone)]
pub struct WorkersAiConfig {
    /// Account that owns the models.
    pub account_id: String,
    /// API token for authentication.
    api_token: Secret<String>,
    /// REST API base URL.
    pub base_url: String,
    /// AI Gateway base URL.
    pub gateway_base_url: String,
    /// Timeout for non-streaming calls.
    pub timeout: Duration,
}

impl WorkersAiConfig {
    /// Creates a new configuration for the given account.
    pub fn new(account_id: impl Into<String>, api_token: Secret<String>) -> Self {
        let defaults = AiConfig::default();
        Self {
            account_id: account_id.into(),
            api_token,
            base_url: defaults.base_url,
            gateway_base_url: defaults.gateway_base_url,
            timeout: Duration::from_secs(30),
        }
    }

    /// Builds from application config. `None` when the binding is not configured.
    pub fn from_app_config(config: &AiConfig, timeout: Duration) -> Option<Self> {
        let (account_id, token) = config.credentials()?;
        Some(
            Self::new(account_id, token)
                .with_base_url(config.base_url.clone())
                .with_gateway_base_url(config.gateway_base_url.clone())
                .with_timeout(timeout),
        )
    }

    /// Sets the REST API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the AI Gateway base URL.
    pub fn with_gateway_base_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_base_url = url.into();
        self
    }

    /// Sets the timeout for non-streaming calls.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Workers AI binding implementation.
pub struct WorkersAiBinding {
    config: WorkersAiConfig,
    client: Client,
}

impl WorkersAiBinding {
    /// Creates a new binding with the given configuration.
    ///
    /// Only the connect phase is bounded on the client; a streamed body may
    /// stay open as long as the model keeps producing.
    pub fn new(config: WorkersAiConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| InferenceError::network(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the run URL for a model, through the gateway when one is set.
    fn run_url(&self, model: &str, options: &RunOptions) -> String {
        match &options.gateway_id {
            Some(gateway) => format!(
                "{}/{}/{}/workers-ai/{}",
                self.config.gateway_base_url.trim_end_matches('/'),
                self.config.account_id,
                gateway,
                model
            ),
            None => format!(
                "{}/accounts/{}/ai/run/{}",
                self.config.base_url.trim_end_matches('/'),
                self.config.account_id,
                model
            ),
        }
    }

    /// Rejects non-success statuses, keeping the body for the logs.
    async fn check_status(response: Response) -> Result<Response, InferenceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(InferenceError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

fn is_event_stream(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("text/event-stream"))
}

/// Strips the REST `{result, success, ...}` envelope when present.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("success") && map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[async_trait]
impl InferenceBinding for WorkersAiBinding {
    async fn run(
        &self,
        model: &str,
        input: &InferenceInput,
        options: &RunOptions,
    ) -> Result<InferenceOutput, InferenceError> {
        let url = self.run_url(model, options);
        let mut request = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_token.expose_secret())
            .json(input);
        if !input.is_streaming() {
            request = request.timeout(self.config.timeout);
        }

        tracing::debug!(model, gateway = ?options.gateway_id, stream = input.is_streaming(), "Running inference");

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                InferenceError::network(format!("Timed out: {}", e))
            } else if e.is_connect() {
                InferenceError::network(format!("Connection failed: {}", e))
            } else {
                InferenceError::network(e.to_string())
            }
        })?;
        let response = Self::check_status(response).await?;

        if is_event_stream(&response) {
            let stream = response
                .bytes_stream()
                .map(|chunk| chunk.map_err(|e| InferenceError::Stream(e.to_string())));
            return Ok(InferenceOutput::Stream(Box::pin(stream)));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| InferenceError::parse(format!("Failed to parse response: {}", e)))?;

        Ok(InferenceOutput::Value(unwrap_envelope(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::{ChatTurn, RequestShape};
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::response::{IntoResponse, Response as AxumResponse};
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    // ───────────────────────────────────────────────────────────────
    // Fake Workers AI upstream
    // ───────────────────────────────────────────────────────────────

    #[derive(Clone, Default)]
    struct Upstream {
        requests: Arc<Mutex<Vec<(String, Option<String>, Value)>>>,
        fail_with: Option<u16>,
    }

    const SSE_BODY: &str = "data: {\"response\":\"こん\"}\n\ndata: {\"response\":\"にちは\"}\n\ndata: [DONE]\n\n";

    async fn fake_run(
        State(upstream): State<Upstream>,
        uri: Uri,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> AxumResponse {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let streaming = body.get("stream").is_some();
        upstream
            .requests
            .lock()
            .unwrap()
            .push((uri.path().to_string(), auth, body));

        if let Some(status) = upstream.fail_with {
            let status = StatusCode::from_u16(status).unwrap();
            return (status, "upstream said no").into_response();
        }
        if streaming {
            ([("content-type", "text/event-stream")], SSE_BODY).into_response()
        } else {
            Json(json!({
                "result": {"response": "hello"},
                "success": true,
                "errors": [],
                "messages": []
            }))
            .into_response()
        }
    }

    async fn spawn_upstream(upstream: Upstream) -> String {
        let app = Router::new().fallback(fake_run).with_state(upstream);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn binding(base: &str) -> WorkersAiBinding {
        let config = WorkersAiConfig::new("acct", Secret::new("cf-token".to_string()))
            .with_base_url(base)
            .with_gateway_base_url(format!("{}/gw", base));
        WorkersAiBinding::new(config).unwrap()
    }

    fn input(stream: bool) -> InferenceInput {
        RequestShape::Chat.build(&[ChatTurn::user("hi")], stream)
    }

    // ───────────────────────────────────────────────────────────────
    // Tests
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn run_url_direct_and_gateway() {
        let config = WorkersAiConfig::new("acct", Secret::new("t".to_string()))
            .with_base_url("https://api.example.com/client/v4/")
            .with_gateway_base_url("https://gateway.example.com/v1");
        let binding = WorkersAiBinding::new(config).unwrap();

        assert_eq!(
            binding.run_url("@cf/meta/llama-3.1-8b-instruct", &RunOptions::default()),
            "https://api.example.com/client/v4/accounts/acct/ai/run/@cf/meta/llama-3.1-8b-instruct"
        );
        assert_eq!(
            binding.run_url("@cf/meta/m", &RunOptions::with_gateway(Some("site".to_string()))),
            "https://gateway.example.com/v1/acct/site/workers-ai/@cf/meta/m"
        );
    }

    #[test]
    fn from_app_config_requires_credentials() {
        let config = AiConfig::default();
        assert!(WorkersAiConfig::from_app_config(&config, Duration::from_secs(5)).is_none());

        let config = AiConfig {
            account_id: Some("acct".to_string()),
            api_token: Some(Secret::new("t".to_string())),
            ..Default::default()
        };
        let built = WorkersAiConfig::from_app_config(&config, Duration::from_secs(5)).unwrap();
        assert_eq!(built.account_id, "acct");
        assert_eq!(built.timeout, Duration::from_secs(5));
    }

    #[test]
    fn envelope_is_unwrapped_only_when_present() {
        assert_eq!(
            unwrap_envelope(json!({"result": {"response": "x"}, "success": true})),
            json!({"response": "x"})
        );
        assert_eq!(unwrap_envelope(json!({"response": "x"})), json!({"response": "x"}));
        assert_eq!(unwrap_envelope(json!("x")), json!("x"));
    }

    #[tokio::test]
    async fn streaming_response_is_passed_through_untouched() {
        let upstream = Upstream::default();
        let base = spawn_upstream(upstream.clone()).await;

        let output = binding(&base)
            .run("@cf/meta/m", &input(true), &RunOptions::default())
            .await
            .unwrap();

        let InferenceOutput::Stream(stream) = output else {
            panic!("expected a stream");
        };
        let chunks: Vec<_> = stream.collect().await;
        let mut relayed = Vec::new();
        for chunk in chunks {
            relayed.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(relayed, SSE_BODY.as_bytes());

        let requests = upstream.requests.lock().unwrap();
        assert_eq!(requests[0].0, "/accounts/acct/ai/run/@cf/meta/m");
        assert_eq!(requests[0].1.as_deref(), Some("Bearer cf-token"));
        assert_eq!(requests[0].2["stream"], json!(true));
    }

    #[tokio::test]
    async fn json_response_is_unwrapped() {
        let upstream = Upstream::default();
        let base = spawn_upstream(upstream.clone()).await;

        let output = binding(&base)
            .run("@cf/meta/m", &input(false), &RunOptions::default())
            .await
            .unwrap();

        match output {
            InferenceOutput::Value(value) => assert_eq!(value, json!({"response": "hello"})),
            other => panic!("expected value, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn gateway_route_is_used_when_configured() {
        let upstream = Upstream::default();
        let base = spawn_upstream(upstream.clone()).await;

        binding(&base)
            .run(
                "@cf/meta/m",
                &input(false),
                &RunOptions::with_gateway(Some("site".to_string())),
            )
            .await
            .unwrap();

        let requests = upstream.requests.lock().unwrap();
        assert_eq!(requests[0].0, "/gw/acct/site/workers-ai/@cf/meta/m");
    }

    #[tokio::test]
    async fn error_status_is_reported_with_body() {
        let upstream = Upstream {
            fail_with: Some(403),
            ..Default::default()
        };
        let base = spawn_upstream(upstream).await;

        let err = binding(&base)
            .run("@cf/meta/m", &input(true), &RunOptions::default())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            InferenceError::Status {
                status: 403,
                body: "upstream said no".to_string()
            }
        );
    }

    #[tokio::test]
    async fn unreachable_runtime_is_a_network_error() {
        let err = binding("http://127.0.0.1:9")
            .run("@cf/meta/m", &input(false), &RunOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::Network(_)));
    }
}
