//! What a turn hands back to the front end.

use serde::Serialize;
use std::time::Duration;

use crate::application::dispatch::DispatchReport;
use crate::application::duration_ms;
use crate::domain::conversation::TurnPhase;
use crate::domain::foundation::SessionId;
use crate::domain::profile::TripProfile;

/// Result of one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub session_id: SessionId,
    pub response: String,
    pub profile: TripProfile,
    pub diagnostics: TurnDiagnostics,
}

/// Observations about one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnDiagnostics {
    /// Phase the turn ended in.
    pub phase: TurnPhase,
    pub ready: bool,
    /// Filled trip fields out of six.
    pub profile_completion: f32,
    /// Present when the turn dispatched retrieval.
    pub dispatch: Option<DispatchReport>,
    #[serde(rename = "elapsed_ms", with = "duration_ms")]
    pub elapsed: Duration,
}
