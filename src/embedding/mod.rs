// file: src/embedding/mod.rs
// description: embedding provider abstraction and vector similarity
// reference: internal module structure

pub mod openai;
pub mod similarity;

use crate::error::EmbeddingError;
use async_trait::async_trait;

pub use openai::OpenAiEmbeddingClient;
pub use similarity::cosine_similarity;

/// Fixed-length vector produced by a single embedding model.
///
/// Vectors from different models or dimensions are not comparable.
pub type EmbeddingVector = Vec<f32>;

/// Converts text into an [`EmbeddingVector`].
///
/// One call is one outbound request; nothing is cached. Implementations
/// truncate over-long input instead of rejecting it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError>;

    fn model_name(&self) -> &str;
}
