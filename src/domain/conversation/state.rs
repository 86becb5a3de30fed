//! Conversation State Entity
//!
//! Everything a session remembers between turns: the trip profile, the
//! append-only message log, the protocol phase and the last turn's results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{Category, SessionId, StateMachine, Timestamp, ValidationError};
use crate::domain::profile::TripProfile;
use crate::domain::retrieval::CategoryResult;

use super::phase::TurnPhase;

/// Characters of each message kept in the history summary.
pub const HISTORY_SNIPPET_CHARS: usize = 100;

/// Who wrote a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "사용자",
            Role::Assistant => "어시스턴트",
        }
    }
}

/// One line of the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub role: Role,
    pub text: String,
    pub timestamp: Timestamp,
}

/// Per-session conversation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub session_id: SessionId,
    pub profile: TripProfile,
    /// Set once the profile first passes the sufficiency gate.
    pub ready: bool,
    phase: TurnPhase,
    log: Vec<LogEntry>,
    results: BTreeMap<Category, CategoryResult>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ConversationState {
    /// Creates the empty state for a new session.
    pub fn new(session_id: SessionId) -> Self {
        let now = Timestamp::now();
        Self {
            session_id,
            profile: TripProfile::new(),
            ready: false,
            phase: TurnPhase::Collecting,
            log: Vec::new(),
            results: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Current protocol phase.
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// The full log, oldest first.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Appends a log entry.
    pub fn record(&mut self, role: Role, text: impl Into<String>) {
        self.log.push(LogEntry {
            role,
            text: text.into(),
            timestamp: Timestamp::now(),
        });
        self.touch();
    }

    /// Moves to `target` if the state machine allows it.
    pub fn advance(&mut self, target: TurnPhase) -> Result<(), ValidationError> {
        self.phase = self.phase.transition_to(target)?;
        if target == TurnPhase::Ready {
            self.ready = true;
        }
        self.touch();
        Ok(())
    }

    /// Puts the session where a new turn should start.
    pub fn resume(&mut self) {
        self.phase = self.phase.resume_phase();
    }

    /// Marks the current turn as failed.
    pub fn fail(&mut self) {
        self.phase = TurnPhase::Error;
        self.touch();
    }

    /// Replaces the cached results with this turn's.
    pub fn cache_results(&mut self, results: impl IntoIterator<Item = CategoryResult>) {
        self.results = results.into_iter().map(|r| (r.category, r)).collect();
        self.touch();
    }

    /// Cached results for one category.
    pub fn cached_result(&self, category: Category) -> Option<&CategoryResult> {
        self.results.get(&category)
    }

    /// All cached results in category order.
    pub fn cached_results(&self) -> impl Iterator<Item = &CategoryResult> {
        self.results.values()
    }

    /// The last `window` log entries, one per line, each cut to
    /// [`HISTORY_SNIPPET_CHARS`] characters.
    pub fn recent_history(&self, window: usize) -> String {
        let start = self.log.len().saturating_sub(window);
        self.log[start..]
            .iter()
            .map(|entry| format!("{}: {}", entry.role.label(), snippet(&entry.text)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

fn snippet(text: &str) -> String {
    if text.chars().count() <= HISTORY_SNIPPET_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(HISTORY_SNIPPET_CHARS).collect();
        format!("{}...", cut)
    }
}
