//! Chat domain - turns, request validation, and model request shapes.

mod request;
mod shape;
mod turn;

pub use request::{ChatRequest, ChatRequestError, HistoryPair, MAX_MESSAGE_LENGTH, SYSTEM_PROMPT};
pub use shape::{
    extract_text, ChatInput, InferenceInput, RequestShape, ResponsesInput, ResponsesItem,
    MAX_OUTPUT_TOKENS, RESPONSES_MODEL_PREFIX,
};
pub use turn::{ChatRole, ChatTurn};
