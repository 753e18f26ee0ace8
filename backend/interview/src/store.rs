use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::session::InterviewSession;

/// Abstract interface for session persistence.
///
/// The engine only ever creates, reads, and saves whole records by primary
/// key; durable backends plug in behind this trait.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a newly created session.
    async fn insert(&self, session: InterviewSession) -> Result<()>;

    /// Fetch a session by id.
    async fn find(&self, id: Uuid) -> Result<Option<InterviewSession>>;

    /// Persist the current state of a session.
    async fn save(&self, session: &InterviewSession) -> Result<()>;

    /// Sessions belonging to a user, newest first, capped at `limit`.
    async fn find_by_user(&self, user_id: Uuid, limit: usize) -> Result<Vec<InterviewSession>>;
}

/// In-memory session store for tests and single-process runs.
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, InterviewSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: InterviewSession) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session.id, session);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<InterviewSession>> {
        let sessions = self.sessions.read().unwrap();
        Ok(sessions.get(&id).cloned())
    }

    async fn save(&self, session: &InterviewSession) -> Result<()> {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn find_by_user(&self, user_id: Uuid, limit: usize) -> Result<Vec<InterviewSession>> {
        let sessions = self.sessions.read().unwrap();
        let mut matching: Vec<InterviewSession> = sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mockmate_core::Level;

    #[tokio::test]
    async fn insert_then_find_round_trips() {
        let store = InMemorySessionStore::new();
        let session = InterviewSession::new(Uuid::new_v4(), "Arrays", Level::Junior);
        let id = session.id;
        store.insert(session).await.unwrap();

        let found = store.find(id).await.unwrap().unwrap();
        assert_eq!(found.topic, "Arrays");
        assert!(store.find(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_overwrites_by_id() {
        let store = InMemorySessionStore::new();
        let mut session = InterviewSession::new(Uuid::new_v4(), "Arrays", Level::Junior);
        store.insert(session.clone()).await.unwrap();

        session.preliminary_score = 75.0;
        store.save(&session).await.unwrap();

        let found = store.find(session.id).await.unwrap().unwrap();
        assert_eq!(found.preliminary_score, 75.0);
    }

    #[tokio::test]
    async fn find_by_user_filters_and_caps() {
        let store = InMemorySessionStore::new();
        let user = Uuid::new_v4();
        for _ in 0..3 {
            store
                .insert(InterviewSession::new(user, "Arrays", Level::Junior))
                .await
                .unwrap();
        }
        store
            .insert(InterviewSession::new(Uuid::new_v4(), "Other", Level::Junior))
            .await
            .unwrap();

        let sessions = store.find_by_user(user, 2).await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert!(sessions.iter().all(|s| s.user_id == user));
    }
}
