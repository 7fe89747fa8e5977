//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    // Chat
    ChatError, ChatReply, StreamChatCommand, StreamChatHandler,
    // Contact
    SubmitContactCommand, SubmitContactError, SubmitContactHandler, SubmitContactOutcome,
};
