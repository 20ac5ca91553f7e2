// file: src/retrieval/context.rs
// description: renders retrieved documents into a prompt context block
// reference: internal prompt conventions

use crate::models::ScoredDocument;

const CONTEXT_HEADER: &str =
    "Here are some relevant documents that might help answer the question:";

/// Returns `None` when nothing was retrieved, so no context is sent.
pub fn format_context(documents: &[ScoredDocument]) -> Option<String> {
    if documents.is_empty() {
        return None;
    }

    let blocks = documents
        .iter()
        .map(|scored| {
            format!(
                "Document: {}\nContent: {}\n",
                scored.document.title, scored.document.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    Some(format!("{}\n\n{}", CONTEXT_HEADER, blocks))
}
