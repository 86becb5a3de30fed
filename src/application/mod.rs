//! Application layer - turn orchestration and the retrieval pipeline.
//!
//! - `conversation` - Per-turn orchestration over the session state machine
//! - `dispatch` - Per-category fan-out under a pluggable strategy
//! - `retrieval` - Retry, timeout escalation and batch splitting

pub mod conversation;
pub mod dispatch;
pub(crate) mod duration_ms;
pub mod retrieval;

pub use conversation::{ConversationOrchestrator, OrchestratorSettings, TurnDiagnostics, TurnOutcome};
pub use dispatch::{CategoryDispatcher, DispatchMode, DispatchReport};
pub use retrieval::{BatchPolicy, BatchSplitter, RetrievalClient, RetryPolicy};
