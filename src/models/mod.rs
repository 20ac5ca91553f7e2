// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod message;
pub mod scored;

pub use document::Document;
pub use message::{Chat, DEFAULT_CHAT_TITLE, Message, MessageRole};
pub use scored::ScoredDocument;
