// file: src/retrieval/mod.rs
// description: retrieval module exports
// reference: internal module structure

pub mod context;
pub mod retriever;

pub use context::format_context;
pub use retriever::Retriever;
