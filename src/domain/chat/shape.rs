//! Request shapes for the inference binding.
//!
//! Two model families take different input documents. The family is picked
//! from the model identifier alone, and each shape has its own builder so
//! both can be checked without touching the binding.

use serde::Serialize;
use serde_json::Value;

use super::turn::{ChatRole, ChatTurn};

/// Model identifiers with this prefix take the "responses" input shape.
pub const RESPONSES_MODEL_PREFIX: &str = "@cf/openai/gpt-oss-";

/// Generation cap for both shapes.
pub const MAX_OUTPUT_TOKENS: u32 = 400;

/// Input document family accepted by a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    /// `{messages, stream?, max_tokens}`
    Chat,
    /// `{input, tool_choice: "none", stream?, max_output_tokens}`
    Responses,
}

impl RequestShape {
    /// Selects the shape for a model identifier.
    pub fn for_model(model: &str) -> Self {
        if model.starts_with(RESPONSES_MODEL_PREFIX) {
            RequestShape::Responses
        } else {
            RequestShape::Chat
        }
    }

    /// Builds the input document. `stream: false` omits the key entirely.
    pub fn build(self, turns: &[ChatTurn], stream: bool) -> InferenceInput {
        let stream = stream.then_some(true);
        match self {
            RequestShape::Chat => InferenceInput::Chat(ChatInput {
                messages: turns.to_vec(),
                stream,
                max_tokens: MAX_OUTPUT_TOKENS,
            }),
            RequestShape::Responses => InferenceInput::Responses(ResponsesInput {
                input: turns.iter().map(ResponsesItem::from).collect(),
                tool_choice: "none",
                stream,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            }),
        }
    }
}

/// Input document sent to the binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InferenceInput {
    Chat(ChatInput),
    Responses(ResponsesInput),
}

impl InferenceInput {
    /// Whether the document asks for a streamed result.
    pub fn is_streaming(&self) -> bool {
        match self {
            InferenceInput::Chat(input) => input.stream.is_some(),
            InferenceInput::Responses(input) => input.stream.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatInput {
    pub messages: Vec<ChatTurn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsesInput {
    pub input: Vec<ResponsesItem>,
    pub tool_choice: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsesItem {
    pub role: ChatRole,
    pub content: String,
}

impl From<&ChatTurn> for ResponsesItem {
    fn from(turn: &ChatTurn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// Pulls display text out of a non-streamed binding result.
///
/// Accepts a bare string, `{output_text}` or `{response}`; any other shape is
/// returned as its JSON text so the visitor still sees something. Falsy
/// results (`null`, `false`, zero) read as no text.
pub fn extract_text(result: &Value) -> String {
    match result {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::String(text) => text.clone(),
        Value::Object(map) => {
            let picked = map.get("output_text").or_else(|| map.get("response"));
            match picked {
                Some(Value::String(text)) => text.clone(),
                Some(other) => other.to_string(),
                None => result.to_string(),
            }
        }
        other => other.to_string(),
    }
}
