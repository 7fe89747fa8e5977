//! Mock inference binding for testing.
//!
//! Provides a configurable mock implementation of the InferenceBinding port,
//! allowing tests to run without calling a real model runtime.
//!
//! # Features
//!
//! - Pre-configured outputs (streams, JSON results, errors), consumed in order
//! - Call tracking for verification (model, serialized input, options)
//!
//! # Example
//!
//! ```ignore
//! let binding = MockInferenceBinding::new()
//!     .with_stream(["data: {\"response\":\"hi\"}\n\n", "data: [DONE]\n\n"]);
//!
//! let output = binding.run(model, &input, &RunOptions::default()).await?;
//! assert_eq!(binding.call_count(), 1);
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::chat::InferenceInput;
use crate::ports::{InferenceBinding, InferenceError, InferenceOutput, RunOptions};

/// Mock inference binding for testing.
#[derive(Debug, Clone, Default)]
pub struct MockInferenceBinding {
    /// Pre-configured outputs (consumed in order).
    outputs: Arc<Mutex<VecDeque<MockOutput>>>,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<RecordedRun>>>,
}

/// A configured mock output.
#[derive(Debug, Clone)]
pub enum MockOutput {
    /// Stream these chunks back.
    Stream(Vec<Bytes>),
    /// Return a complete JSON result.
    Value(Value),
    /// Fail the call.
    Error(InferenceError),
}

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub model: String,
    /// Input document as it would go over the wire.
    pub input: Value,
    pub options: RunOptions,
}

impl MockInferenceBinding {
    /// Creates a mock with no queued outputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a streamed output made of the given chunks.
    pub fn with_stream<I, C>(self, chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Bytes>,
    {
        let chunks = chunks.into_iter().map(Into::into).collect();
        self.push(MockOutput::Stream(chunks))
    }

    /// Queues a JSON result.
    pub fn with_value(self, value: Value) -> Self {
        self.push(MockOutput::Value(value))
    }

    /// Queues an error.
    pub fn with_error(self, error: InferenceError) -> Self {
        self.push(MockOutput::Error(error))
    }

    fn push(self, output: MockOutput) -> Self {
        self.outputs.lock().unwrap().push_back(output);
        self
    }

    /// Returns every recorded invocation.
    pub fn calls(&self) -> Vec<RecordedRun> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl InferenceBinding for MockInferenceBinding {
    async fn run(
        &self,
        model: &str,
        input: &InferenceInput,
        options: &RunOptions,
    ) -> Result<InferenceOutput, InferenceError> {
        let input = serde_json::to_value(input)
            .map_err(|e| InferenceError::parse(format!("unserializable input: {}", e)))?;
        self.calls.lock().unwrap().push(RecordedRun {
            model: model.to_string(),
            input,
            options: options.clone(),
        });

        let next = self.outputs.lock().unwrap().pop_front();
        match next {
            Some(MockOutput::Stream(chunks)) => Ok(InferenceOutput::Stream(Box::pin(
                stream::iter(chunks.into_iter().map(Ok)),
            ))),
            Some(MockOutput::Value(value)) => Ok(InferenceOutput::Value(value)),
            Some(MockOutput::Error(error)) => Err(error),
            None => Err(InferenceError::network("no mock output queued")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::{ChatTurn, RequestShape};
    use futures::StreamExt;
    use serde_json::json;

    fn input() -> InferenceInput {
        RequestShape::Chat.build(&[ChatTurn::user("hi")], true)
    }

    #[tokio::test]
    async fn returns_outputs_in_order_and_records_calls() {
        let binding = MockInferenceBinding::new()
            .with_value(json!({"response": "one"}))
            .with_error(InferenceError::network("down"));

        let first = binding
            .run("model-a", &input(), &RunOptions::default())
            .await
            .unwrap();
        assert!(matches!(first, InferenceOutput::Value(_)));

        let second = binding.run("model-b", &input(), &RunOptions::default()).await;
        assert_eq!(second.unwrap_err(), InferenceError::network("down"));

        let calls = binding.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].model, "model-a");
        assert_eq!(calls[0].input["stream"], json!(true));
    }

    #[tokio::test]
    async fn stream_output_yields_chunks() {
        let binding = MockInferenceBinding::new().with_stream(["a", "b"]);
        let output = binding
            .run("m", &input(), &RunOptions::default())
            .await
            .unwrap();

        let InferenceOutput::Stream(stream) = output else {
            panic!("expected stream");
        };
        let chunks: Vec<_> = stream.map(|c| c.unwrap()).collect().await;
        assert_eq!(chunks, vec![Bytes::from("a"), Bytes::from("b")]);
    }

    #[tokio::test]
    async fn empty_queue_is_an_error() {
        let binding = MockInferenceBinding::new();
        assert!(binding
            .run("m", &input(), &RunOptions::default())
            .await
            .is_err());
    }
}
