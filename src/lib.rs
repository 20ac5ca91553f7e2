// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod chat;
pub mod completion;
pub mod config;
pub mod embedding;
pub mod error;
pub mod models;
pub mod parser;
pub mod retrieval;
pub mod store;
pub mod utils;

pub use chat::{ChatEngine, Reply, ReplyMode};
pub use completion::{
    Completion, CompletionProvider, OpenAiCompletionClient, PromptMessage, Role,
};
pub use config::{ChatConfig, Config, LibraryConfig, ProviderConfig, RetrievalConfig};
pub use embedding::{EmbeddingProvider, EmbeddingVector, OpenAiEmbeddingClient, cosine_similarity};
pub use error::{ChatError, CompletionError, EmbeddingError, Result, RetrievalError};
pub use models::{Chat, Document, Message, MessageRole, ScoredDocument};
pub use parser::{Frontmatter, FrontmatterParser, MarkdownParser, ParsedMarkdown};
pub use retrieval::{Retriever, format_context};
pub use store::{
    DocumentImporter, DocumentLibrary, DocumentStore, ImportStats, InMemoryDocumentStore,
};
pub use utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer, Validator};
