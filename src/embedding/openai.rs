// file: src/embedding/openai.rs
// description: OpenAI-compatible embeddings API client
// reference: https://platform.openai.com/docs/api-reference/embeddings

use crate::config::ProviderConfig;
use crate::embedding::{EmbeddingProvider, EmbeddingVector};
use crate::error::{EmbeddingError, Result};
use crate::utils::Validator;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub(crate) error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub(crate) message: String,
}

/// Pulls `error.message` out of an API error body, falling back to the raw text.
pub(crate) fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiErrorResponse>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

pub struct OpenAiEmbeddingClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    dimensions: Option<usize>,
    max_input_chars: usize,
}

impl OpenAiEmbeddingClient {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            api_key: config.api_key().map(str::to_string),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.embedding_model.clone(),
            dimensions: config.embedding_dimensions,
            max_input_chars: config.max_input_chars,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Ok(Self::new(config.build_http_client()?, config))
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }

    fn validate(
        &self,
        embedding: Vec<f32>,
    ) -> std::result::Result<EmbeddingVector, EmbeddingError> {
        if embedding.is_empty() {
            return Err(EmbeddingError::MalformedResponse(
                "embedding vector is empty".to_string(),
            ));
        }

        if let Some(expected) = self.dimensions
            && embedding.len() != expected
        {
            return Err(EmbeddingError::DimensionMismatch {
                expected,
                actual: embedding.len(),
            });
        }

        if embedding.iter().any(|x| !x.is_finite()) {
            return Err(EmbeddingError::MalformedResponse(
                "embedding contains non-finite values".to_string(),
            ));
        }

        Ok(embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingClient {
    async fn embed(&self, text: &str) -> std::result::Result<EmbeddingVector, EmbeddingError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(EmbeddingError::MissingCredential)?;

        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let input = Validator::truncate_chars(text, self.max_input_chars);
        if input.len() < text.len() {
            debug!(
                "Truncated embedding input from {} to {} bytes",
                text.len(),
                input.len()
            );
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input,
        };

        debug!(
            "Requesting embedding from {} for {} chars",
            self.model,
            input.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Embedding request failed: {}", e);
                if e.is_timeout() {
                    EmbeddingError::Timeout
                } else {
                    EmbeddingError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                EmbeddingError::Timeout
            } else {
                EmbeddingError::MalformedResponse(e.to_string())
            }
        })?;

        let embedding = embedding_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                EmbeddingError::MalformedResponse("no embedding data returned".to_string())
            })?;

        debug!("Received embedding of dimension {}", embedding.len());
        self.validate(embedding)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
