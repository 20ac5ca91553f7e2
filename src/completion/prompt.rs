// file: src/completion/prompt.rs
// description: system prompt construction around retrieved context
// reference: internal prompt conventions

use crate::completion::{PromptMessage, Role};

pub fn context_system_prompt(context: &str) -> String {
    format!(
        "You are a helpful assistant. Use the following retrieved information to answer the user's question:\n\n\
         {}\n\n\
         If the retrieved information doesn't contain the answer, just say you don't know and answer based on your general knowledge.",
        context
    )
}

/// Orders the outgoing messages: at most one system message, first.
///
/// With context, the system message is always the context prompt, replacing
/// whatever the caller supplied. Without context, the caller's first system
/// message is kept as is. Non-system messages keep their order.
pub fn compose_messages(history: &[PromptMessage], context: Option<&str>) -> Vec<PromptMessage> {
    let system = match context {
        Some(context) => Some(PromptMessage::system(context_system_prompt(context))),
        None => history.iter().find(|m| m.role == Role::System).cloned(),
    };

    system
        .into_iter()
        .chain(history.iter().filter(|m| m.role != Role::System).cloned())
        .collect()
}
