//! Itinerary Synthesizer Port - the text-generation collaborator.
//!
//! Produces the final itinerary once results are in, and the clarifying
//! follow-up question while the profile is still insufficient.

use async_trait::async_trait;

use crate::domain::retrieval::CategoryResult;

/// Input for itinerary generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub profile_summary: String,
    pub conversation_summary: String,
    pub user_message: String,
    /// Personality tag of a recognized user, used to pick the reply tone.
    pub persona_tag: Option<String>,
    /// Results per category, already cut to the synthesis budget.
    pub results: Vec<CategoryResult>,
}

/// Input for a clarifying follow-up.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowUpRequest {
    pub profile_summary: String,
    pub conversation_summary: String,
    pub user_message: String,
    /// Labels of trip fields still unknown.
    pub missing_fields: Vec<&'static str>,
}

/// Errors from the synthesis collaborator.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SynthesisError {
    #[error("synthesis provider failed: {0}")]
    Provider(String),

    #[error("synthesis timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("synthesis returned no text")]
    Empty,
}

/// Port for itinerary and follow-up generation.
#[async_trait]
pub trait ItinerarySynthesizer: Send + Sync {
    /// Writes the itinerary from aggregated results.
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String, SynthesisError>;

    /// Writes a question asking for missing trip attributes.
    async fn follow_up(&self, request: &FollowUpRequest) -> Result<String, SynthesisError>;
}
