//! Chat command handlers.

mod stream_chat;

pub use stream_chat::{ChatError, ChatReply, StreamChatCommand, StreamChatHandler};
