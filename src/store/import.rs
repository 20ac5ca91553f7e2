// file: src/store/import.rs
// description: bulk import of markdown and text files into the document store
// reference: https://docs.rs/walkdir

use crate::error::{ChatError, Result};
use crate::models::Document;
use crate::parser::{FrontmatterParser, MarkdownParser};
use crate::store::{DocumentStore, InMemoryDocumentStore};
use crate::utils::Validator;
use crate::utils::validation::MAX_TITLE_CHARS;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const IMPORTABLE_EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportStats {
    pub imported: usize,
    pub duplicates: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct DocumentImporter {
    frontmatter: FrontmatterParser,
    markdown: MarkdownParser,
    max_file_bytes: u64,
}

impl DocumentImporter {
    pub fn new() -> Self {
        Self {
            frontmatter: FrontmatterParser::new(),
            markdown: MarkdownParser::new(),
            max_file_bytes: 1024 * 1024,
        }
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    /// Walks `root` and adds every new importable file to `store`.
    /// Files whose content is already in the store are counted as duplicates.
    pub fn import_directory(
        &self,
        root: &Path,
        store: &mut InMemoryDocumentStore,
    ) -> Result<ImportStats> {
        Validator::validate_directory(root)?;
        info!("Importing documents from {}", root.display());

        let mut stats = ImportStats::default();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let importable = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| {
                    IMPORTABLE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
                });

            if !importable {
                debug!("Skipping non-document file: {}", path.display());
                stats.skipped += 1;
                continue;
            }

            if entry.metadata().map(|m| m.len()).unwrap_or(0) > self.max_file_bytes {
                warn!("Skipping oversized file: {}", path.display());
                stats.skipped += 1;
                continue;
            }

            match self.read_document(path) {
                Ok(Some((title, content))) => {
                    if store.contains_content(&Document::compute_hash(&content)) {
                        debug!("Already in library: {}", path.display());
                        stats.duplicates += 1;
                        continue;
                    }
                    match store.add(&title, &content) {
                        Ok(_) => stats.imported += 1,
                        Err(e) => {
                            warn!("Failed to import {}: {}", path.display(), e);
                            stats.failed += 1;
                        }
                    }
                }
                Ok(None) => {
                    debug!("Skipping empty file: {}", path.display());
                    stats.skipped += 1;
                }
                Err(e) => {
                    warn!("Failed to import {}: {}", path.display(), e);
                    stats.failed += 1;
                }
            }
        }

        info!(
            "Import finished: {} imported, {} duplicates, {} skipped, {} failed",
            stats.imported, stats.duplicates, stats.skipped, stats.failed
        );
        Ok(stats)
    }

    /// Title precedence: frontmatter `title`, first heading, file stem.
    pub fn read_document(&self, path: &Path) -> Result<Option<(String, String)>> {
        let raw = fs::read_to_string(path).map_err(|source| ChatError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;

        let file = path.display().to_string();
        let (frontmatter, body) = match self.frontmatter.extract(&file, &raw)? {
            Some((frontmatter, body)) => (Some(frontmatter), body),
            None => (None, raw.trim().to_string()),
        };

        let parsed = self.markdown.parse(&body);
        if parsed.plain_text.is_empty() {
            return Ok(None);
        }

        let title = frontmatter
            .as_ref()
            .and_then(|fm| fm.get("title"))
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_string)
            .or_else(|| {
                parsed
                    .title()
                    .map(str::trim)
                    .filter(|title| !title.is_empty())
                    .map(str::to_string)
            })
            .or_else(|| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().trim().to_string())
                    .filter(|stem| !stem.is_empty())
            })
            .unwrap_or_else(|| "Untitled".to_string());

        let title = Validator::truncate_chars(&title, MAX_TITLE_CHARS).to_string();

        Ok(Some((title, body)))
    }
}

impl Default for DocumentImporter {
    fn default() -> Self {
        Self::new()
    }
}
