// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, ChatError>;

/// Failures of a single `embed` call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbeddingError {
    #[error("No valid API key configured for the embedding service")]
    MissingCredential,

    #[error("Cannot embed empty text")]
    EmptyInput,

    #[error("Embedding request failed: {0}")]
    Transport(String),

    #[error("Embedding request timed out")]
    Timeout,

    #[error("Embedding API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed embedding response: {0}")]
    MalformedResponse(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Retrieval only fails when the query itself cannot be embedded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetrievalError {
    #[error("Query embedding failed: {0}")]
    QueryEmbedding(#[from] EmbeddingError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    #[error("{0}")]
    MissingCredential(String),

    #[error("Failed to get response from AI: {0}")]
    Transport(String),

    #[error("Completion API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Markdown parsing error in {file}: {message}")]
    MarkdownParse { file: String, message: String },

    #[error("Document not found: {0}")]
    DocumentNotFound(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_error_wraps_embedding_error() {
        let err: RetrievalError = EmbeddingError::Timeout.into();
        assert_eq!(err, RetrievalError::QueryEmbedding(EmbeddingError::Timeout));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_chat_error_display_is_transparent() {
        let err: ChatError = CompletionError::Transport("connection reset".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Failed to get response from AI: connection reset"
        );
    }
}
