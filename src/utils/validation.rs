// file: src/utils/validation.rs
// description: input validation and text truncation helpers
// reference: input validation patterns

use crate::error::{ChatError, Result};
use std::path::Path;

/// Value shipped in `.env` templates; never a real key.
pub const PLACEHOLDER_API_KEY: &str = "your-openai-api-key-here";

pub const MAX_TITLE_CHARS: usize = 200;

pub struct Validator;

impl Validator {
    pub fn validate_api_key(key: &str) -> Result<()> {
        let key = key.trim();

        if key.is_empty() {
            return Err(ChatError::Validation("API key is empty".to_string()));
        }

        if key == PLACEHOLDER_API_KEY {
            return Err(ChatError::Validation(
                "API key is still the template placeholder".to_string(),
            ));
        }

        Ok(())
    }

    pub fn validate_content_not_empty(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(ChatError::Validation("Content is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_title(title: &str) -> Result<()> {
        if title.trim().is_empty() {
            return Err(ChatError::Validation("Title is empty".to_string()));
        }

        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(ChatError::Validation(format!(
                "Title too long (max {} characters)",
                MAX_TITLE_CHARS
            )));
        }

        Ok(())
    }

    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ChatError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(ChatError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ChatError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    /// Cuts `text` to at most `max_chars` characters on a char boundary.
    pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
        match text.char_indices().nth(max_chars) {
            Some((idx, _)) => &text[..idx],
            None => text,
        }
    }

    pub fn truncate_text(text: &str, max_length: usize) -> String {
        let truncated = Self::truncate_chars(text, max_length);
        if truncated.len() == text.len() {
            text.to_string()
        } else {
            format!("{}...", truncated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_api_key() {
        assert!(Validator::validate_api_key("sk-abc").is_ok());
        assert!(Validator::validate_api_key("").is_err());
        assert!(Validator::validate_api_key("  ").is_err());
        assert!(Validator::validate_api_key(PLACEHOLDER_API_KEY).is_err());
    }

    #[test]
    fn test_validate_content_not_empty() {
        assert!(Validator::validate_content_not_empty("content").is_ok());
        assert!(Validator::validate_content_not_empty("").is_err());
        assert!(Validator::validate_content_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_title() {
        assert!(Validator::validate_title("What is RAG?").is_ok());
        assert!(Validator::validate_title(" ").is_err());
        assert!(Validator::validate_title(&"x".repeat(MAX_TITLE_CHARS + 1)).is_err());
    }

    #[test]
    fn test_validate_directory() {
        let temp = TempDir::new().unwrap();
        assert!(Validator::validate_directory(temp.path()).is_ok());
        assert!(Validator::validate_directory(Path::new("/nonexistent")).is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(Validator::validate_url("https://api.openai.com/v1").is_ok());
        assert!(Validator::validate_url("http://localhost:8080").is_ok());
        assert!(Validator::validate_url("api.openai.com").is_err());
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(Validator::truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(Validator::truncate_chars("short", 10), "short");
        assert_eq!(Validator::truncate_chars("", 3), "");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a ..."
        );
    }
}
