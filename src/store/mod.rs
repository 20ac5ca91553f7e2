// file: src/store/mod.rs
// description: document collection abstraction and implementations
// reference: internal module structure

pub mod import;
pub mod library;
pub mod memory;
pub mod samples;

use crate::error::Result;
use crate::models::Document;
use uuid::Uuid;

pub use import::{DocumentImporter, ImportStats};
pub use library::{DocumentLibrary, LibrarySnapshot};
pub use memory::InMemoryDocumentStore;

/// The user-maintained document collection.
///
/// Retrieval only ever calls [`list`](DocumentStore::list); edits go through
/// the mutating methods and never happen while a query is being scored.
pub trait DocumentStore: Send + Sync {
    /// All documents in insertion order.
    fn list(&self) -> Vec<Document>;

    fn get(&self, id: Uuid) -> Option<Document>;

    fn add(&mut self, title: &str, content: &str) -> Result<Document>;

    fn update(&mut self, id: Uuid, title: &str, content: &str) -> Result<Document>;

    fn remove(&mut self, id: Uuid) -> Result<Document>;

    fn len(&self) -> usize {
        self.list().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
