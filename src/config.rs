// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{ChatError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted when no key is set in the config sources.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub retrieval: RetrievalConfig,
    pub chat: ChatConfig,
    pub library: LibraryConfig,
}

/// Connection settings shared by the embedding and completion clients.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub embedding_model: String,
    /// Expected vector length; responses of any other length are rejected.
    pub embedding_dimensions: Option<usize>,
    /// Inputs longer than this many characters are truncated before embedding.
    pub max_input_chars: usize,
    pub completion_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Documents must score strictly above this to be returned.
    pub similarity_threshold: f32,
    pub top_k: usize,
    pub max_concurrent_embeddings: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChatConfig {
    pub system_prompt: String,
    pub rag_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub path: Option<PathBuf>,
    pub seed_samples: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            embedding_dimensions: Some(1536),
            max_input_chars: 32_000,
            completion_model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            request_timeout_secs: 30,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
            top_k: 3,
            max_concurrent_embeddings: 8,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: "You are a helpful assistant.".to_string(),
            rag_enabled: true,
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("data/library.json")),
            seed_samples: true,
        }
    }
}

impl ProviderConfig {
    /// The configured key, if it is usable for real network calls.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| Validator::validate_api_key(key).is_ok())
    }

    pub fn has_credential(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn build_http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout())
            .build()
            .map_err(|e| ChatError::Config(format!("Failed to build HTTP client: {}", e)))
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new("config/default.toml")).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("RAG_CHAT")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| ChatError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| ChatError::Config(e.to_string()))?;

        if config.provider.api_key.is_none() {
            config.provider.api_key = std::env::var(API_KEY_ENV).ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        let retrieval = &self.retrieval;

        if retrieval.top_k == 0 {
            return Err(ChatError::Config(
                "top_k must be greater than 0".to_string(),
            ));
        }

        if !(-1.0..=1.0).contains(&retrieval.similarity_threshold) {
            return Err(ChatError::Config(format!(
                "similarity_threshold must be within [-1, 1], got {}",
                retrieval.similarity_threshold
            )));
        }

        if retrieval.max_concurrent_embeddings == 0 {
            return Err(ChatError::Config(
                "max_concurrent_embeddings must be greater than 0".to_string(),
            ));
        }

        if self.provider.request_timeout_secs == 0 {
            return Err(ChatError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.provider.max_input_chars == 0 {
            return Err(ChatError::Config(
                "max_input_chars must be greater than 0".to_string(),
            ));
        }

        Validator::validate_url(&self.provider.base_url)
            .map_err(|e| ChatError::Config(e.to_string()))?;

        Ok(())
    }
}
