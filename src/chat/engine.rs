// file: src/chat/engine.rs
// description: one conversational turn: retrieve, augment, complete
// reference: coordinates retrieval and completion for a chat

use crate::completion::{CompletionProvider, OpenAiCompletionClient, PromptMessage};
use crate::config::{ChatConfig, Config};
use crate::embedding::OpenAiEmbeddingClient;
use crate::error::{CompletionError, Result};
use crate::models::{Chat, Document, Message, ScoredDocument};
use crate::retrieval::{Retriever, format_context};
use crate::utils::Validator;
use std::sync::Arc;
use tracing::{info, warn};

pub const SIMULATED_REPLY: &str = "This is a simulated response because no valid API key is set. \
To connect to the language model, set OPENAI_API_KEY in your environment or .env file.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyMode {
    /// The model answered.
    Completed,
    /// No credential; a canned reply was produced without any network call.
    Simulated,
    /// The completion service failed; the reply carries the error text.
    Failed,
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub message: Message,
    pub sources: Vec<ScoredDocument>,
    pub mode: ReplyMode,
    pub error: Option<CompletionError>,
}

pub struct ChatEngine {
    retriever: Retriever,
    completion: Arc<dyn CompletionProvider>,
    system_prompt: String,
}

impl ChatEngine {
    pub fn new(
        retriever: Retriever,
        completion: Arc<dyn CompletionProvider>,
        config: &ChatConfig,
    ) -> Self {
        Self {
            retriever,
            completion,
            system_prompt: config.system_prompt.clone(),
        }
    }

    /// Wires the OpenAI-compatible clients over one shared HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = config.provider.build_http_client()?;
        let embedder = Arc::new(OpenAiEmbeddingClient::new(http.clone(), &config.provider));
        let completion = Arc::new(OpenAiCompletionClient::new(http, &config.provider));
        let retriever = Retriever::new(embedder, config.retrieval.clone());

        Ok(Self::new(retriever, completion, &config.chat))
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn has_credential(&self) -> bool {
        self.completion.has_credential()
    }

    /// System prompt followed by the chat's messages.
    pub fn history(&self, chat: &Chat) -> Vec<PromptMessage> {
        std::iter::once(PromptMessage::system(self.system_prompt.clone()))
            .chain(chat.messages.iter().map(PromptMessage::from))
            .collect()
    }

    /// Appends the user's message and the assistant's reply to `chat`.
    ///
    /// Retrieval problems never fail the turn; the model is asked without
    /// context instead. Completion problems become the reply text.
    pub async fn respond(
        &self,
        chat: &mut Chat,
        content: &str,
        documents: &[Document],
        rag_enabled: bool,
    ) -> Result<Reply> {
        Validator::validate_content_not_empty(content)?;
        chat.push(Message::user(content));

        let sources = if rag_enabled && self.has_credential() {
            match self.retriever.retrieve(content, documents).await {
                Ok(sources) => sources,
                Err(e) => {
                    warn!("Answering without retrieved context: {}", e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let context = format_context(&sources);
        let history = self.history(chat);

        let (text, mode, error) = match self.completion.complete(&history, context.as_deref()).await
        {
            Ok(completion) => (completion.content, ReplyMode::Completed, None),
            Err(CompletionError::MissingCredential(reason)) => {
                info!("Simulating reply: {}", reason);
                (
                    SIMULATED_REPLY.to_string(),
                    ReplyMode::Simulated,
                    Some(CompletionError::MissingCredential(reason)),
                )
            }
            Err(e) => {
                warn!("Completion failed: {}", e);
                (e.to_string(), ReplyMode::Failed, Some(e))
            }
        };

        let message = chat.push(Message::assistant(text)).clone();

        Ok(Reply {
            message,
            sources,
            mode,
            error,
        })
    }
}
