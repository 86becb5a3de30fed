//! Conversation module - per-session state and the turn phase machine.

mod phase;
mod state;

pub use phase::TurnPhase;
pub use state::{ConversationState, LogEntry, Role, HISTORY_SNIPPET_CHARS};
