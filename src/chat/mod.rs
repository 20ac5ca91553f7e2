// file: src/chat/mod.rs
// description: conversation orchestration module exports
// reference: internal module structure

pub mod engine;

pub use engine::{ChatEngine, Reply, ReplyMode, SIMULATED_REPLY};
