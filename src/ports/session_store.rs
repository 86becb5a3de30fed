//! Session Store Port - keyed storage of conversation state.

use async_trait::async_trait;

use crate::domain::conversation::ConversationState;
use crate::domain::foundation::SessionId;

/// Errors that can occur during session storage operations.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SessionStoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    #[error("failed to serialize session state: {0}")]
    Serialization(String),
}

/// Port for persisting conversation state between turns.
///
/// Implementations document their own eviction policy; a session that was
/// evicted simply loads as `None` and starts over.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads the state for a session, if it is still held.
    async fn load(&self, session_id: &SessionId) -> Result<Option<ConversationState>, SessionStoreError>;

    /// Stores (or replaces) a session's state.
    async fn save(&self, state: &ConversationState) -> Result<(), SessionStoreError>;

    /// Drops a session.
    async fn remove(&self, session_id: &SessionId) -> Result<(), SessionStoreError>;

    /// Number of sessions currently held.
    async fn len(&self) -> usize;
}
