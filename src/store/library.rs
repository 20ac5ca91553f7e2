// file: src/store/library.rs
// description: json snapshot of the document collection on disk
// reference: https://docs.rs/serde_json

use crate::config::LibraryConfig;
use crate::error::{ChatError, Result};
use crate::models::Document;
use crate::store::InMemoryDocumentStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct DocumentLibrary {
    path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    pub saved_at: DateTime<Utc>,
    pub total_documents: usize,
    pub documents: Vec<Document>,
}

impl DocumentLibrary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the snapshot; a missing file is an empty library.
    pub fn load(&self) -> Result<Vec<Document>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path).map_err(|source| ChatError::FileOperation {
            path: self.path.clone(),
            source,
        })?;

        let snapshot: LibrarySnapshot = serde_json::from_str(&raw).map_err(|e| {
            ChatError::Serialization(format!(
                "Invalid library file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        info!(
            "Loaded {} documents from {}",
            snapshot.documents.len(),
            self.path.display()
        );
        Ok(snapshot.documents)
    }

    pub fn save(&self, documents: &[Document], pretty: bool) -> Result<LibrarySnapshot> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ChatError::FileOperation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let snapshot = LibrarySnapshot {
            saved_at: Utc::now(),
            total_documents: documents.len(),
            documents: documents.to_vec(),
        };

        let json = if pretty {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|source| ChatError::FileOperation {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| ChatError::FileOperation {
            path: self.path.clone(),
            source,
        })?;

        info!(
            "Saved {} documents to {}",
            snapshot.total_documents,
            self.path.display()
        );
        Ok(snapshot)
    }
}

/// Builds the working store: the saved library if there is one, otherwise
/// the sample documents when seeding is enabled.
pub fn open_store(config: &LibraryConfig) -> Result<InMemoryDocumentStore> {
    if let Some(path) = &config.path {
        let library = DocumentLibrary::new(path);
        if library.exists() {
            return Ok(InMemoryDocumentStore::from_documents(library.load()?));
        }
        warn!("No document library at {}", path.display());
    }

    if config.seed_samples {
        info!("Using sample documents");
        Ok(InMemoryDocumentStore::with_samples())
    } else {
        Ok(InMemoryDocumentStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentStore;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let library = DocumentLibrary::new(temp.path().join("library.json"));
        assert!(library.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let library = DocumentLibrary::new(temp.path().join("nested/library.json"));
        let documents = vec![
            Document::new("One", "first body"),
            Document::new("Two", "second body"),
        ];

        let snapshot = library.save(&documents, true).unwrap();
        assert_eq!(snapshot.total_documents, 2);
        assert!(!temp.path().join("nested/library.json.tmp").exists());

        assert_eq!(library.load().unwrap(), documents);
    }

    #[test]
    fn test_corrupt_file_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("library.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            DocumentLibrary::new(&path).load(),
            Err(ChatError::Serialization(_))
        ));
    }

    #[test]
    fn test_open_store_prefers_library_over_samples() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("library.json");
        let config = LibraryConfig {
            path: Some(path.clone()),
            seed_samples: true,
        };

        assert_eq!(open_store(&config).unwrap().len(), 5);

        DocumentLibrary::new(&path)
            .save(&[Document::new("Only", "one")], false)
            .unwrap();
        let store = open_store(&config).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].title, "Only");

        let empty = LibraryConfig {
            path: None,
            seed_samples: false,
        };
        assert!(open_store(&empty).unwrap().is_empty());
    }
}
