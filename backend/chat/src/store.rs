use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use mockmate_core::{ChatMessage, InterviewError, Level};
use mockmate_generation::{fallback, GenerationError, GenerationService};

use crate::clock::{Clock, SystemClock};

/// Fixed opening line. Returned straight from the store on `open`; no
/// provider round trip for the first turn.
const GREETING: &str =
    "Hello! I'm your AI interviewer. Let's begin. Can you briefly introduce yourself?";

fn system_instruction(topic: &str, level: Level, tone: &str) -> String {
    format!(
        r#"You are an expert job interviewer for the role of "{topic}".
Interview level: {level}
Tone: {tone}

Rules:
- Ask only ONE question at a time
- Keep responses concise (2-3 sentences)
- Ask follow-ups when needed
- Provide brief feedback
- End with a short summary when the candidate says "end interview""#
    )
}

/// Expiry policy for chat sessions.
///
/// The default matches the historical behavior: a fixed 30-minute deadline
/// set at creation, not renewed on activity. Set `sliding` to renew the
/// deadline on every successful exchange instead.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub ttl: Duration,
    pub sliding: bool,
    pub sweep_interval: std::time::Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(30),
            sliding: false,
            sweep_interval: std::time::Duration::from_secs(60),
        }
    }
}

struct ChatSession {
    history: Vec<ChatMessage>,
    deadline: DateTime<Utc>,
}

/// Process-wide store of live conversational sessions.
///
/// Keyed by a caller-supplied opaque id. Entries are dropped by the sweeper
/// once their deadline passes, or explicitly via `clear`.
pub struct ChatSessionStore {
    sessions: RwLock<HashMap<String, ChatSession>>,
    generation: Arc<GenerationService>,
    clock: Arc<dyn Clock>,
    config: ChatConfig,
}

impl ChatSessionStore {
    pub fn new(generation: Arc<GenerationService>, config: ChatConfig) -> Self {
        Self::with_clock(generation, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        generation: Arc<GenerationService>,
        config: ChatConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            generation,
            clock,
            config,
        }
    }

    /// Open a session under `session_id`, discarding any existing one first.
    ///
    /// Seeds the history with the system instruction and the canned greeting,
    /// and returns the greeting.
    pub async fn open(
        &self,
        session_id: impl Into<String>,
        topic: &str,
        level: Level,
        tone: &str,
    ) -> String {
        let session_id = session_id.into();
        let history = vec![
            ChatMessage::system(system_instruction(topic, level, tone)),
            ChatMessage::assistant(GREETING),
        ];
        let deadline = self.clock.now() + self.config.ttl;

        let mut sessions = self.sessions.write().await;
        // Insert replaces wholesale: any prior history under this id is gone.
        sessions.insert(session_id.clone(), ChatSession { history, deadline });
        info!(session_id = %session_id, topic, "Chat session opened");

        GREETING.to_string()
    }

    /// Append a candidate message, get the interviewer's reply, and append it.
    ///
    /// Provider failures never escape: rate limiting and other errors come
    /// back as fixed in-band replies (which are not recorded in the history).
    pub async fn send(&self, session_id: &str, text: &str) -> Result<String, InterviewError> {
        if text.trim().is_empty() {
            return Err(InterviewError::Validation("message is required".to_string()));
        }

        let history_snapshot = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(session_id).ok_or_else(|| {
                InterviewError::NotFound(format!("chat session {session_id}"))
            })?;
            session.history.push(ChatMessage::user(text));
            session.history.clone()
        };

        // Lock is released across the round trip; an expiry sweep may remove
        // the session meanwhile, in which case the reply is still returned
        // and the next call observes NotFound.
        let reply = match self.generation.chat_reply(&history_snapshot).await {
            Ok(reply) => reply,
            Err(GenerationError::RateLimited) => {
                warn!(session_id = %session_id, "Provider rate limited, returning busy reply");
                return Ok(fallback::RATE_LIMITED_REPLY.to_string());
            }
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "Chat reply failed, returning generic reply");
                return Ok(fallback::GENERIC_ERROR_REPLY.to_string());
            }
        };

        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(session_id) {
            session.history.push(ChatMessage::assistant(reply.clone()));
            if self.config.sliding {
                session.deadline = self.clock.now() + self.config.ttl;
            }
        }
        Ok(reply)
    }

    /// Remove a session and hand back its history, e.g. for archival.
    /// Returns an empty sequence if no session was open.
    pub async fn clear(&self, session_id: &str) -> Vec<ChatMessage> {
        let mut sessions = self.sessions.write().await;
        match sessions.remove(session_id) {
            Some(session) => {
                info!(session_id = %session_id, "Chat session cleared");
                session.history
            }
            None => Vec::new(),
        }
    }

    /// Number of live sessions. Observability only.
    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop every session whose deadline has passed. Returns how many were
    /// removed. The background sweeper calls this on a fixed interval; tests
    /// call it directly with a manual clock.
    pub async fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.deadline > now);
        before - sessions.len()
    }

    /// Spawn the background sweeper task for this store.
    pub fn spawn_sweeper(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        let period = self.config.sweep_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let removed = store.sweep_expired().await;
                if removed > 0 {
                    info!(removed, "Swept expired chat sessions");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mockmate_core::ChatRole;
    use mockmate_generation::MockProvider;

    use crate::clock::ManualClock;

    fn store_with(provider: MockProvider, config: ChatConfig) -> (Arc<ChatSessionStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = Arc::new(ChatSessionStore::with_clock(
            Arc::new(GenerationService::new(Arc::new(provider))),
            config,
            clock.clone(),
        ));
        (store, clock)
    }

    #[tokio::test]
    async fn open_returns_greeting_without_calling_the_provider() {
        // Empty script: any provider call would fail the exchange.
        let (store, _) = store_with(MockProvider::new(), ChatConfig::default());
        let greeting = store.open("s1", "Backend Engineer", Level::Junior, "Professional").await;
        assert!(greeting.contains("introduce yourself"));
        assert_eq!(store.active_count().await, 1);

        let history = store.clear("s1").await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, ChatRole::System);
        assert!(history[0].content.contains("Backend Engineer"));
        assert_eq!(history[1].role, ChatRole::Assistant);
    }

    #[tokio::test]
    async fn send_appends_both_turns_on_success() {
        let provider = MockProvider::new().with_reply("Tell me about a project you shipped.");
        let (store, _) = store_with(provider, ChatConfig::default());
        store.open("s1", "Backend Engineer", Level::Senior, "Friendly").await;

        let reply = store.send("s1", "Hi, I'm ready.").await.unwrap();
        assert_eq!(reply, "Tell me about a project you shipped.");

        let history = store.clear("s1").await;
        assert_eq!(history.len(), 4);
        assert_eq!(history[2].role, ChatRole::User);
        assert_eq!(history[3].content, "Tell me about a project you shipped.");
    }

    #[tokio::test]
    async fn send_on_unknown_session_is_not_found() {
        let (store, _) = store_with(MockProvider::new(), ChatConfig::default());
        let err = store.send("missing", "hello").await.unwrap_err();
        assert!(matches!(err, InterviewError::NotFound(_)));
        // And it did not silently create one.
        assert_eq!(store.active_count().await, 0);
    }

    #[tokio::test]
    async fn blank_message_is_a_validation_error() {
        let (store, _) = store_with(MockProvider::new(), ChatConfig::default());
        store.open("s1", "Backend", Level::Junior, "Professional").await;
        let err = store.send("s1", "   ").await.unwrap_err();
        assert!(matches!(err, InterviewError::Validation(_)));
    }

    #[tokio::test]
    async fn provider_failures_become_canned_in_band_replies() {
        let provider = MockProvider::new().rate_limited().failing();
        let (store, _) = store_with(provider, ChatConfig::default());
        store.open("s1", "Backend", Level::Junior, "Professional").await;

        let busy = store.send("s1", "first").await.unwrap();
        assert_eq!(busy, fallback::RATE_LIMITED_REPLY);

        let generic = store.send("s1", "second").await.unwrap();
        assert_eq!(generic, fallback::GENERIC_ERROR_REPLY);

        // Canned replies are not recorded; only the user turns were appended.
        let history = store.clear("s1").await;
        assert_eq!(history.len(), 4);
        assert!(history.iter().all(|m| m.content != fallback::RATE_LIMITED_REPLY));
    }

    #[tokio::test]
    async fn reopen_discards_the_previous_history() {
        let provider = MockProvider::new()
            .with_reply("old reply")
            .with_reply("new reply");
        let (store, _) = store_with(provider, ChatConfig::default());

        store.open("s1", "Backend", Level::Junior, "Professional").await;
        store.send("s1", "old question").await.unwrap();

        store.open("s1", "Backend", Level::Junior, "Professional").await;
        store.send("s1", "new question").await.unwrap();

        let history = store.clear("s1").await;
        assert_eq!(history.len(), 4);
        assert!(history.iter().all(|m| m.content != "old question"));
        assert!(history.iter().all(|m| m.content != "old reply"));
    }

    #[tokio::test]
    async fn clear_on_unknown_session_returns_empty() {
        let (store, _) = store_with(MockProvider::new(), ChatConfig::default());
        assert!(store.clear("missing").await.is_empty());
    }

    #[tokio::test]
    async fn sweep_removes_only_expired_sessions() {
        let (store, clock) = store_with(MockProvider::new(), ChatConfig::default());
        store.open("old", "Backend", Level::Junior, "Professional").await;

        clock.advance(Duration::minutes(20));
        store.open("young", "Backend", Level::Junior, "Professional").await;

        clock.advance(Duration::minutes(15)); // old: 35 min, young: 15 min
        assert_eq!(store.sweep_expired().await, 1);
        assert_eq!(store.active_count().await, 1);

        let err = store.send("old", "still there?").await.unwrap_err();
        assert!(matches!(err, InterviewError::NotFound(_)));
    }

    #[tokio::test]
    async fn fixed_expiry_is_not_renewed_by_activity() {
        let provider = MockProvider::new().with_reply("reply");
        let (store, clock) = store_with(provider, ChatConfig::default());
        store.open("s1", "Backend", Level::Junior, "Professional").await;

        clock.advance(Duration::minutes(20));
        store.send("s1", "keep me alive?").await.unwrap();

        clock.advance(Duration::minutes(15)); // 35 min after creation
        assert_eq!(store.sweep_expired().await, 1);
    }

    #[tokio::test]
    async fn sliding_expiry_renews_on_successful_exchange() {
        let provider = MockProvider::new().with_reply("reply");
        let config = ChatConfig {
            sliding: true,
            ..ChatConfig::default()
        };
        let (store, clock) = store_with(provider, config);
        store.open("s1", "Backend", Level::Junior, "Professional").await;

        clock.advance(Duration::minutes(20));
        store.send("s1", "keep me alive").await.unwrap();

        clock.advance(Duration::minutes(15)); // 35 min after creation, 15 after renewal
        assert_eq!(store.sweep_expired().await, 0);
        assert_eq!(store.active_count().await, 1);
    }
}
