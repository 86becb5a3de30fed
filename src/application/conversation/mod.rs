//! Conversation - the per-turn orchestrator and its outcome types.

mod orchestrator;
mod outcome;

pub use orchestrator::{
    ConversationOrchestrator, OrchestrationError, OrchestratorSettings, APOLOGY_MESSAGE,
    DEFAULT_FOLLOW_UP, FALLBACK_MESSAGE,
};
pub use outcome::{TurnDiagnostics, TurnOutcome};
