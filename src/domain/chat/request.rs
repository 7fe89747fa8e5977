//! Chat request - the normalized form of an inbound chat payload.

use serde_json::Value;
use thiserror::Error;

use super::turn::ChatTurn;
use crate::domain::normalize::{char_len, normalize};

/// Maximum length of a visitor message, in characters. Each Unicode scalar
/// value counts once, so an astral-plane character such as an emoji is one.
pub const MAX_MESSAGE_LENGTH: usize = 50;

/// Fixed persona prompt, always the first and only system turn.
pub const SYSTEM_PROMPT: &str = "あなたは「さいぴちゃん」（saip氏のにじげんのすがた）として話します。\n\
かわいくておとなしげな女の子をロールプレイし、丁寧でやさしい口調で答えてください。\n\
返答は必ず日本語で3〜5文にしてください。\n\
メタ情報やJSONは出力せず、本文のみを返してください。";

/// Reasons a chat payload is rejected before reaching the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatRequestError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("message exceeds {max} characters")]
    MessageTooLong { max: usize },
}

/// One prior exchange carried along with the new message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPair {
    pub user: String,
    pub assistant: String,
}

/// A validated chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    message: String,
    history: Option<HistoryPair>,
}

impl ChatRequest {
    /// Normalizes and validates an untyped payload of the shape
    /// `{message, history?: {user?, assistant?}}`.
    ///
    /// History is kept only when both sides normalize to non-empty text.
    pub fn from_payload(payload: &Value) -> Result<Self, ChatRequestError> {
        let message = normalize(payload.get("message"));
        let history = payload.get("history");
        let last_user = normalize(history.and_then(|h| h.get("user")));
        let last_assistant = normalize(history.and_then(|h| h.get("assistant")));

        Self::new(message, last_user, last_assistant)
    }

    /// Validates already-normalized parts.
    pub fn new(
        message: String,
        last_user: String,
        last_assistant: String,
    ) -> Result<Self, ChatRequestError> {
        if message.is_empty() {
            return Err(ChatRequestError::EmptyMessage);
        }
        if char_len(&message) > MAX_MESSAGE_LENGTH {
            return Err(ChatRequestError::MessageTooLong {
                max: MAX_MESSAGE_LENGTH,
            });
        }

        let history = if !last_user.is_empty() && !last_assistant.is_empty() {
            Some(HistoryPair {
                user: last_user,
                assistant: last_assistant,
            })
        } else {
            None
        };

        Ok(Self { message, history })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn history(&self) -> Option<&HistoryPair> {
        self.history.as_ref()
    }

    /// Builds the turn list: system prompt, optional prior pair, new message.
    pub fn turns(&self) -> Vec<ChatTurn> {
        let mut turns = Vec::with_capacity(4);
        turns.push(ChatTurn::system(SYSTEM_PROMPT));
        if let Some(pair) = &self.history {
            turns.push(ChatTurn::user(pair.user.clone()));
            turns.push(ChatTurn::assistant(pair.assistant.clone()));
        }
        turns.push(ChatTurn::user(self.message.clone()));
        turns
    }
}
