use async_trait::async_trait;
use thiserror::Error;

use crate::chat::ChatMessage;

/// Failure modes of a completion call.
///
/// Rate limiting is kept distinct so callers can degrade differently from a
/// generic backend failure.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("rate limited by provider")]
    RateLimited,

    #[error("completion failed: {0}")]
    Failed(String),
}

/// A chat-completion request forwarded to a provider.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Response from a completion provider.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub tokens_used: u64,
}

/// Trait for text-generation backends.
///
/// The engine treats this as an opaque capability: structured input in,
/// nondeterministic text out, with possible failure.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g., "groq", "mock").
    fn name(&self) -> &str;

    /// Send a completion request and return the response.
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError>;
}
