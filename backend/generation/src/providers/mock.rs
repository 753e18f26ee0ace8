use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use mockmate_core::{CompletionError, CompletionProvider, CompletionRequest, CompletionResponse};

/// What the mock should answer on one call.
#[derive(Debug, Clone)]
enum MockReply {
    Content(String),
    RateLimited,
    Failure(String),
}

/// A scripted completion provider for tests and offline runs.
///
/// Replies are consumed in call order. An exhausted (or empty) script fails
/// every remaining call, which drives callers down their fallback paths; the
/// offline demo relies on that.
pub struct MockProvider {
    script: Mutex<VecDeque<MockReply>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a successful reply.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.push(MockReply::Content(content.into()))
    }

    /// Queue a rate-limit failure.
    pub fn rate_limited(self) -> Self {
        self.push(MockReply::RateLimited)
    }

    /// Queue a generic failure.
    pub fn failing(self) -> Self {
        self.push(MockReply::Failure("scripted failure".to_string()))
    }

    fn push(self, reply: MockReply) -> Self {
        self.script.lock().unwrap().push_back(reply);
        self
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let reply = self.script.lock().unwrap().pop_front();
        match reply {
            Some(MockReply::Content(content)) => Ok(CompletionResponse {
                content,
                model: request.model.clone(),
                tokens_used: 0,
            }),
            Some(MockReply::RateLimited) => Err(CompletionError::RateLimited),
            Some(MockReply::Failure(message)) => Err(CompletionError::Failed(message)),
            None => Err(CompletionError::Failed("mock script exhausted".to_string())),
        }
    }
}
