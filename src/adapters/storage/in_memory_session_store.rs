//! In-Memory Session Store Adapter
//!
//! Keeps conversation state in a process-local map with two eviction rules:
//!
//! - a session idle for longer than `idle_ttl` is dropped, lazily, the next
//!   time the store is touched
//! - when a save would exceed `max_sessions`, the least recently used
//!   session is dropped
//!
//! Idle time is measured on the tokio clock, so tests can advance it.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::SessionId;
use crate::ports::{SessionStore, SessionStoreError};

/// Default idle lifetime of a session.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

/// Default cap on live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug, Clone)]
struct Entry {
    state: ConversationState,
    last_access: Instant,
}

/// In-memory session store with idle expiry and an LRU cap.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Entry>>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl InMemorySessionStore {
    /// Creates a store with default limits.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl: DEFAULT_IDLE_TTL,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    /// Sets the idle lifetime.
    pub fn with_idle_ttl(mut self, idle_ttl: Duration) -> Self {
        self.idle_ttl = idle_ttl;
        self
    }

    /// Sets the session cap (at least one).
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    fn purge_expired(&self, sessions: &mut HashMap<SessionId, Entry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_access) <= self.idle_ttl);
        let purged = before - sessions.len();
        if purged > 0 {
            debug!(purged, "expired sessions purged");
        }
    }

    fn evict_least_recent(sessions: &mut HashMap<SessionId, Entry>) {
        let oldest = sessions
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            debug!(session_id = %id, "least recently used session evicted");
            sessions.remove(&id);
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
    async fn load(&self, session_id: &SessionId) -> Result<Option<ConversationState>, SessionStoreError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.purge_expired(&mut sessions, now);

        Ok(sessions.get_mut(session_id).map(|entry| {
            entry.last_access = now;
            entry.state.clone()
        }))
    }

    async fn save(&self, state: &ConversationState) -> Result<(), SessionStoreError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.purge_expired(&mut sessions, now);

        if !sessions.contains_key(&state.session_id) {
            while sessions.len() >= self.max_sessions {
                Self::evict_least_recent(&mut sessions);
            }
        }

        sessions.insert(
            state.session_id.clone(),
            Entry {
                state: state.clone(),
                last_access: now,
            },
        );
        Ok(())
    }

    async fn remove(&self, session_id: &SessionId) -> Result<(), SessionStoreError> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Role;

    fn state(id: &str) -> ConversationState {
        ConversationState::new(SessionId::new(id).unwrap())
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = InMemorySessionStore::new();
        let mut original = state("s1");
        original.record(Role::User, "안녕");

        store.save(&original).await.unwrap();
        let loaded = store.load(&original.session_id).await.unwrap().unwrap();

        assert_eq!(loaded, original);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_session_loads_none() {
        let store = InMemorySessionStore::new();
        let loaded = store.load(&SessionId::new("missing").unwrap()).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn remove_drops_session() {
        let store = InMemorySessionStore::new();
        let s = state("s1");
        store.save(&s).await.unwrap();
        store.remove(&s.session_id).await.unwrap();
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_expire() {
        let store = InMemorySessionStore::new().with_idle_ttl(Duration::from_secs(60));
        let s = state("s1");
        store.save(&s).await.unwrap();

        tokio::time::advance(Duration::from_secs(61)).await;

        assert!(store.load(&s.session_id).await.unwrap().is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn access_refreshes_idle_timer() {
        let store = InMemorySessionStore::new().with_idle_ttl(Duration::from_secs(60));
        let s = state("s1");
        store.save(&s).await.unwrap();

        tokio::time::advance(Duration::from_secs(40)).await;
        assert!(store.load(&s.session_id).await.unwrap().is_some());
        tokio::time::advance(Duration::from_secs(40)).await;

        assert!(store.load(&s.session_id).await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn cap_evicts_least_recently_used() {
        let store = InMemorySessionStore::new().with_max_sessions(2);
        let (a, b, c) = (state("a"), state("b"), state("c"));

        store.save(&a).await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        store.save(&b).await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        store.load(&a.session_id).await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        store.save(&c).await.unwrap();

        assert_eq!(store.len().await, 2);
        assert!(store.load(&a.session_id).await.unwrap().is_some());
        assert!(store.load(&b.session_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn resaving_existing_session_does_not_evict() {
        let store = InMemorySessionStore::new().with_max_sessions(1);
        let s = state("only");
        store.save(&s).await.unwrap();
        store.save(&s).await.unwrap();
        assert_eq!(store.len().await, 1);
    }
}
