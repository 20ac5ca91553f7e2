// file: src/models/scored.rs
// description: document paired with its similarity to a query
// reference: Used for ranked retrieval results

use crate::models::Document;
use crate::utils::Validator;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    #[serde(flatten)]
    pub document: Document,

    /// Cosine similarity to the query, in [-1, 1]
    pub score: f32,
}

impl ScoredDocument {
    pub fn new(document: Document, score: f32) -> Self {
        Self { document, score }
    }

    pub fn title(&self) -> &str {
        &self.document.title
    }

    /// Format as a summary string for display
    pub fn format_summary(&self, max_content_len: usize) -> String {
        format!(
            "Score: {:.4} | {}\n{}\n",
            self.score,
            self.document.title,
            Validator::truncate_text(&self.document.content, max_content_len)
        )
    }
}
