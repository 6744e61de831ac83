//! LlmProvider trait definition.
//!
//! This is the core abstraction the relay uses to reach a completion service.
//! Uses RPITIT for `complete`.

use relaybot_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for completion provider backends.
///
/// Implementations live in relaybot-infra (e.g., `OpenAiChatProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
