//! Turn phases of the conversation state machine.
//!
//! `Collecting → Ready → Dispatching → Synthesizing → Done`, with `Error`
//! reachable from every phase. A session remembers the phase its last turn
//! ended in; the next turn starts from [`TurnPhase::resume_phase`].

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where a session is in the recommendation protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// Gathering trip attributes; retrieval not yet allowed.
    #[default]
    Collecting,
    /// Profile is sufficient; retrieval may start.
    Ready,
    /// Category retrieval in flight.
    Dispatching,
    /// Results handed to the synthesis collaborator.
    Synthesizing,
    /// Itinerary delivered.
    Done,
    /// The last turn failed and was answered with a fallback message.
    Error,
}

impl TurnPhase {
    /// Phase the next turn starts in, given the phase the last turn ended in.
    ///
    /// Finished and failed turns start over in `Collecting`; a turn that was
    /// abandoned mid-retrieval or mid-synthesis restarts from `Ready`.
    pub fn resume_phase(&self) -> TurnPhase {
        match self {
            TurnPhase::Done | TurnPhase::Error => TurnPhase::Collecting,
            TurnPhase::Dispatching | TurnPhase::Synthesizing => TurnPhase::Ready,
            TurnPhase::Collecting => TurnPhase::Collecting,
            TurnPhase::Ready => TurnPhase::Ready,
        }
    }

    /// Returns a short label for logs and diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            TurnPhase::Collecting => "collecting",
            TurnPhase::Ready => "ready",
            TurnPhase::Dispatching => "dispatching",
            TurnPhase::Synthesizing => "synthesizing",
            TurnPhase::Done => "done",
            TurnPhase::Error => "error",
        }
    }
}

impl StateMachine for TurnPhase {
    fn valid_transitions(&self) -> Vec<Self> {
        use TurnPhase::*;
        match self {
            Collecting => vec![Ready, Error],
            Ready => vec![Dispatching, Error],
            Dispatching => vec![Synthesizing, Error],
            Synthesizing => vec![Done, Error],
            Done => vec![Collecting, Error],
            Error => vec![Collecting],
        }
    }
}
