// file: src/completion/openai.rs
// description: OpenAI-compatible chat completions API client
// reference: https://platform.openai.com/docs/api-reference/chat

use crate::completion::{Completion, CompletionProvider, PromptMessage, compose_messages};
use crate::config::{API_KEY_ENV, ProviderConfig};
use crate::embedding::openai::api_error_message;
use crate::error::{CompletionError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiCompletionClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiCompletionClient {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            api_key: config.api_key().map(str::to_string),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.completion_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Ok(Self::new(config.build_http_client()?, config))
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn credential(&self) -> std::result::Result<&str, CompletionError> {
        self.api_key.as_deref().ok_or_else(|| {
            CompletionError::MissingCredential(format!(
                "API key is not set or is invalid. Set {} or provider.api_key in the config file.",
                API_KEY_ENV
            ))
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionClient {
    async fn complete(
        &self,
        history: &[PromptMessage],
        retrieved_context: Option<&str>,
    ) -> std::result::Result<Completion, CompletionError> {
        let api_key = self.credential()?;

        let messages = compose_messages(history, retrieved_context);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: &messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            "Requesting completion from {} with {} messages (context: {})",
            self.model,
            messages.len(),
            retrieved_context.is_some()
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Completion request failed: {}", e);
                let reason = if e.is_timeout() {
                    "request timed out"
                } else if e.is_connect() {
                    "could not connect to the completion service"
                } else {
                    "request failed"
                };
                CompletionError::Transport(reason.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Completion API returned {}", status);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                CompletionError::MalformedResponse("response contained no message".to_string())
            })?;

        Ok(Completion { content })
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::Role;
    use serde_json::{Value, json};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> OpenAiCompletionClient {
        let config = ProviderConfig {
            api_key: api_key.map(str::to_string),
            base_url: server.uri(),
            ..ProviderConfig::default()
        };
        OpenAiCompletionClient::from_config(&config).unwrap()
    }

    fn reply(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        }))
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(reply("unused"))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        assert!(!client.has_credential());

        let err = client
            .complete(&[PromptMessage::user("hi")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::MissingCredential(_)));
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[tokio::test]
    async fn test_context_sends_single_system_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(reply("RAG retrieves first."))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("sk-test"));
        let history = vec![
            PromptMessage::system("You are a helpful assistant."),
            PromptMessage::user("What is RAG?"),
        ];

        let completion = client
            .complete(&history, Some("Document: What is RAG?\nContent: Retrieval first."))
            .await
            .unwrap();
        assert_eq!(completion.content, "RAG retrieves first.");

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let messages = body["messages"].as_array().unwrap();
        let systems: Vec<&Value> = messages
            .iter()
            .filter(|m| m["role"] == "system")
            .collect();

        assert_eq!(systems.len(), 1);
        assert!(
            systems[0]["content"]
                .as_str()
                .unwrap()
                .contains("Content: Retrieval first.")
        );
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 1000);
    }

    #[tokio::test]
    async fn test_api_error_is_converted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": { "message": "Rate limit reached" }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server, Some("sk-test"))
            .complete(&[PromptMessage::user("hi")], None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CompletionError::Api {
                status: 429,
                message: "Rate limit reached".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_choices_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let err = client_for(&server, Some("sk-test"))
            .complete(&[PromptMessage::user("hi")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let config = ProviderConfig {
            api_key: Some("sk-test".to_string()),
            base_url: "http://127.0.0.1:1".to_string(),
            ..ProviderConfig::default()
        };
        let client = OpenAiCompletionClient::from_config(&config).unwrap();

        let err = client
            .complete(&[PromptMessage::new(Role::User, "hi")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Transport(_)));
    }
}
