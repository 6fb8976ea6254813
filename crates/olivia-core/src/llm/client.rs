//! CompletionClient trait definition.
//!
//! One stateless request/response round trip to a chat-completion service.
//! Implementations live in olivia-infra (`OpenAiCompletionClient`).

use std::sync::Arc;

use olivia_types::llm::{CompletionError, RoleText};

/// Trait for chat-completion backends.
///
/// Each call is independent given its explicit history; no state is kept
/// between calls and nothing is retried internally.
pub trait CompletionClient: Send + Sync {
    /// Request a reply to `history` under `system_prompt`.
    ///
    /// The returned text is already display-ready: trimmed for the plain
    /// format, rendered for the structured one.
    fn complete(
        &self,
        system_prompt: &str,
        history: &[RoleText],
    ) -> impl std::future::Future<Output = Result<String, CompletionError>> + Send;
}

impl<T: CompletionClient> CompletionClient for Arc<T> {
    fn complete(
        &self,
        system_prompt: &str,
        history: &[RoleText],
    ) -> impl std::future::Future<Output = Result<String, CompletionError>> + Send {
        (**self).complete(system_prompt, history)
    }
}
