// file: src/completion/mod.rs
// description: language-model completion abstraction and message types
// reference: internal module structure

pub mod openai;
pub mod prompt;

use crate::error::CompletionError;
use crate::models::{Message, MessageRole};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use openai::OpenAiCompletionClient;
pub use prompt::{compose_messages, context_system_prompt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl From<MessageRole> for Role {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => Role::User,
            MessageRole::Assistant => Role::Assistant,
        }
    }
}

/// One entry of the conversation sent to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

impl From<&Message> for PromptMessage {
    fn from(message: &Message) -> Self {
        Self::new(message.role.into(), message.content.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends `history` to the model. With `retrieved_context`, the outgoing
    /// request carries exactly one system message built from that context.
    async fn complete(
        &self,
        history: &[PromptMessage],
        retrieved_context: Option<&str>,
    ) -> Result<Completion, CompletionError>;

    /// Whether a usable credential is configured.
    fn has_credential(&self) -> bool;

    fn model_name(&self) -> &str;
}
