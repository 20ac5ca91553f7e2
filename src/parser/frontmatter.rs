// file: src/parser/frontmatter.rs
// description: YAML frontmatter extraction from markdown
// reference: https://docs.rs/yaml-rust

use crate::error::{ChatError, Result};
use std::collections::HashMap;
use yaml_rust::{Yaml, YamlLoader};

pub struct FrontmatterParser;

#[derive(Debug, Clone, Default)]
pub struct Frontmatter {
    pub fields: HashMap<String, String>,
}

impl Frontmatter {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

impl FrontmatterParser {
    pub fn new() -> Self {
        Self
    }

    /// Splits a leading `---` block from the body. `file` names the source in errors.
    pub fn extract(&self, file: &str, content: &str) -> Result<Option<(Frontmatter, String)>> {
        if !content.starts_with("---") {
            return Ok(None);
        }

        let parts: Vec<&str> = content.splitn(3, "---").collect();

        if parts.len() < 3 {
            return Ok(None);
        }

        let docs =
            YamlLoader::load_from_str(parts[1].trim()).map_err(|e| ChatError::MarkdownParse {
                file: file.to_string(),
                message: format!("YAML parse error: {}", e),
            })?;

        let mut fields = HashMap::new();

        if let Some(Yaml::Hash(hash)) = docs.first() {
            for (key, value) in hash {
                let Yaml::String(key) = key else { continue };
                let value = match value {
                    Yaml::String(s) => s.clone(),
                    Yaml::Integer(i) => i.to_string(),
                    Yaml::Real(r) => r.clone(),
                    Yaml::Boolean(b) => b.to_string(),
                    _ => continue,
                };
                fields.insert(key.clone(), value);
            }
        }

        Ok(Some((Frontmatter { fields }, parts[2].trim().to_string())))
    }
}

impl Default for FrontmatterParser {
    fn default() -> Self {
        Self::new()
    }
}
