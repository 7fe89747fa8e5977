//! StreamChatHandler - relays a model reply for one visitor message.
//!
//! The binding is asked for a stream first. When it hands back a complete
//! result instead, the handler asks again without the stream flag and
//! returns plain text.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::chat::{extract_text, ChatRequest, ChatRequestError, RequestShape};
use crate::ports::{ByteStream, InferenceBinding, InferenceError, InferenceOutput, RunOptions};

/// Command carrying the raw chat payload.
#[derive(Debug, Clone)]
pub struct StreamChatCommand {
    /// Untyped body, `{message, history?}`. Unparseable bodies arrive as `{}`.
    pub payload: Value,
}

impl StreamChatCommand {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }
}

/// What to send back to the visitor.
pub enum ChatReply {
    /// Server-sent events from the binding, relayed verbatim.
    Stream(ByteStream),
    /// Text from the non-streamed fallback.
    Text(String),
}

impl fmt::Debug for ChatReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatReply::Stream(_) => f.write_str("ChatReply::Stream(..)"),
            ChatReply::Text(text) => f.debug_tuple("ChatReply::Text").field(text).finish(),
        }
    }
}

/// Errors from handling a chat message.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    InvalidRequest(#[from] ChatRequestError),

    #[error("inference binding is not configured")]
    BindingMissing,

    #[error("streaming inference failed: {0}")]
    StreamFailed(InferenceError),

    #[error("non-streaming inference failed: {0}")]
    FallbackFailed(InferenceError),
}

/// Handler for chat messages.
pub struct StreamChatHandler {
    binding: Option<Arc<dyn InferenceBinding>>,
    model: String,
    gateway_id: Option<String>,
}

impl StreamChatHandler {
    pub fn new(binding: Option<Arc<dyn InferenceBinding>>, model: impl Into<String>) -> Self {
        Self {
            binding,
            model: model.into(),
            gateway_id: None,
        }
    }

    /// Routes every call through the given gateway.
    pub fn with_gateway(mut self, gateway_id: Option<String>) -> Self {
        self.gateway_id = gateway_id;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn handle(&self, cmd: StreamChatCommand) -> Result<ChatReply, ChatError> {
        // 1. Validate before touching the binding
        let request = ChatRequest::from_payload(&cmd.payload)?;

        let binding = self.binding.as_ref().ok_or(ChatError::BindingMissing)?;

        // 2. Build the turn list and the model-specific input
        let turns = request.turns();
        let shape = RequestShape::for_model(&self.model);
        let options = RunOptions::with_gateway(self.gateway_id.clone());

        // 3. Ask for a stream
        let streamed = binding
            .run(&self.model, &shape.build(&turns, true), &options)
            .await
            .map_err(ChatError::StreamFailed)?;

        if let InferenceOutput::Stream(stream) = streamed {
            return Ok(ChatReply::Stream(stream));
        }

        // 4. No stream on offer: ask again without the flag
        tracing::debug!(model = %self.model, "Binding returned no stream, using fallback");
        let result = match binding
            .run(&self.model, &shape.build(&turns, false), &options)
            .await
            .map_err(ChatError::FallbackFailed)?
        {
            InferenceOutput::Value(value) => value,
            InferenceOutput::Stream(_) => {
                return Err(ChatError::FallbackFailed(InferenceError::parse(
                    "stream returned for a non-streaming call",
                )))
            }
        };

        Ok(ChatReply::Text(extract_text(&result)))
    }
}
