// file: src/store/memory.rs
// description: in-memory document store
// reference: internal data structures

use crate::error::{ChatError, Result};
use crate::models::Document;
use crate::store::DocumentStore;
use crate::store::samples::sample_documents;
use crate::utils::Validator;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Vec<Document>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Store pre-filled with the demonstration knowledge base.
    pub fn with_samples() -> Self {
        Self::from_documents(sample_documents())
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn contains_content(&self, content_hash: &str) -> bool {
        self.documents
            .iter()
            .any(|doc| doc.content_hash == content_hash)
    }

    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }

    fn position(&self, id: Uuid) -> Result<usize> {
        self.documents
            .iter()
            .position(|doc| doc.id == id)
            .ok_or(ChatError::DocumentNotFound(id))
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn list(&self) -> Vec<Document> {
        self.documents.clone()
    }

    fn get(&self, id: Uuid) -> Option<Document> {
        self.documents.iter().find(|doc| doc.id == id).cloned()
    }

    fn add(&mut self, title: &str, content: &str) -> Result<Document> {
        Validator::validate_title(title)?;
        Validator::validate_content_not_empty(content)?;

        let document = Document::new(title.trim(), content);
        debug!("Added document {} ({})", document.id, document.title);
        self.documents.push(document.clone());
        Ok(document)
    }

    fn update(&mut self, id: Uuid, title: &str, content: &str) -> Result<Document> {
        Validator::validate_title(title)?;
        Validator::validate_content_not_empty(content)?;

        let index = self.position(id)?;
        let document = &mut self.documents[index];
        document.edit(title.trim(), content);
        debug!("Updated document {} ({})", document.id, document.title);
        Ok(document.clone())
    }

    fn remove(&mut self, id: Uuid) -> Result<Document> {
        let index = self.position(id)?;
        Ok(self.documents.remove(index))
    }

    fn len(&self) -> usize {
        self.documents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_list_preserve_order() {
        let mut store = InMemoryDocumentStore::new();
        let first = store.add("First", "one").unwrap();
        let second = store.add("Second", "two").unwrap();

        let ids: Vec<Uuid> = store.list().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_rejects_blank_fields() {
        let mut store = InMemoryDocumentStore::new();
        assert!(store.add("", "content").is_err());
        assert!(store.add("Title", "  ").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_replaces_title_and_content() {
        let mut store = InMemoryDocumentStore::new();
        let doc = store.add("Draft", "old").unwrap();

        let updated = store.update(doc.id, "Final", "new").unwrap();
        assert_eq!(updated.id, doc.id);
        assert_eq!(store.get(doc.id).unwrap().content, "new");
        assert_eq!(store.get(doc.id).unwrap().title, "Final");
    }

    #[test]
    fn test_missing_document_errors() {
        let mut store = InMemoryDocumentStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.update(id, "t", "c"),
            Err(ChatError::DocumentNotFound(missing)) if missing == id
        ));
        assert!(store.remove(id).is_err());
    }

    #[test]
    fn test_remove() {
        let mut store = InMemoryDocumentStore::with_samples();
        let count = store.len();
        let target = store.list()[1].clone();

        let removed = store.remove(target.id).unwrap();
        assert_eq!(removed, target);
        assert_eq!(store.len(), count - 1);
        assert!(store.get(target.id).is_none());
    }

    #[test]
    fn test_contains_content() {
        let mut store = InMemoryDocumentStore::new();
        let doc = store.add("Title", "body").unwrap();
        assert!(store.contains_content(&doc.content_hash));
        assert!(!store.contains_content(&Document::compute_hash("other")));
    }
}
