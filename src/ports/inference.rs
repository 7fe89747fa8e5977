//! Inference Binding Port - interface to the hosted model runtime.
//!
//! The binding takes a model identifier and an input document and returns
//! either a live byte stream (when streaming was requested and the runtime
//! honours it) or a JSON result.
//!
//! # Example
//!
//! ```ignore
//! let input = RequestShape::for_model(model).build(&turns, true);
//! match binding.run(model, &input, &RunOptions::default()).await? {
//!     InferenceOutput::Stream(bytes) => { /* relay */ }
//!     InferenceOutput::Value(result) => { /* extract text */ }
//! }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use serde_json::Value;
use std::fmt;
use std::pin::Pin;

use crate::domain::chat::InferenceInput;

/// Raw byte stream produced by the binding (server-sent events).
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, InferenceError>> + Send>>;

/// Port for running a hosted model.
#[async_trait]
pub trait InferenceBinding: Send + Sync {
    /// Runs `model` on `input`.
    async fn run(
        &self,
        model: &str,
        input: &InferenceInput,
        options: &RunOptions,
    ) -> Result<InferenceOutput, InferenceError>;
}

/// Per-call routing options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Route through this AI Gateway when set.
    pub gateway_id: Option<String>,
}

impl RunOptions {
    /// Options routed through the given gateway.
    pub fn with_gateway(gateway_id: Option<String>) -> Self {
        Self { gateway_id }
    }
}

/// What the binding handed back.
pub enum InferenceOutput {
    /// Streamed body, relayed to the caller untouched.
    Stream(ByteStream),
    /// Complete JSON result.
    Value(Value),
}

impl fmt::Debug for InferenceOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceOutput::Stream(_) => f.write_str("InferenceOutput::Stream(..)"),
            InferenceOutput::Value(value) => {
                f.debug_tuple("InferenceOutput::Value").field(value).finish()
            }
        }
    }
}

/// Inference binding errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    /// Request never got a response.
    #[error("network error: {0}")]
    Network(String),

    /// Runtime answered with a non-success status.
    #[error("inference returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for logs.
        body: String,
    },

    /// Result body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Stream broke after it started.
    #[error("stream error: {0}")]
    Stream(String),
}

impl InferenceError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn run_options_default_has_no_gateway() {
        assert_eq!(RunOptions::default().gateway_id, None);
        assert_eq!(
            RunOptions::with_gateway(Some("gw".to_string())).gateway_id.as_deref(),
            Some("gw")
        );
    }

    #[test]
    fn output_debug_hides_stream() {
        let stream: ByteStream = Box::pin(futures::stream::empty());
        assert_eq!(
            format!("{:?}", InferenceOutput::Stream(stream)),
            "InferenceOutput::Stream(..)"
        );
        assert!(format!("{:?}", InferenceOutput::Value(json!("x"))).contains("\"x\""));
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = InferenceError::Status {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "inference returned status 403: forbidden");
        assert_eq!(InferenceError::network("down").to_string(), "network error: down");
    }
}
