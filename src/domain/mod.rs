//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `normalize` - Field normalization shared by every inbound payload
//! - `chat` - Chat turns, request validation and model input shapes
//! - `contact` - Contact submission screening, metadata and email envelope

pub mod chat;
pub mod contact;
pub mod normalize;
