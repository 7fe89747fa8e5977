//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over the ports.

pub mod chat;
pub mod contact;

pub use chat::{ChatError, ChatReply, StreamChatCommand, StreamChatHandler};
pub use contact::{
    SubmitContactCommand, SubmitContactError, SubmitContactHandler, SubmitContactOutcome,
};
