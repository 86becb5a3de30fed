//! Profile Extractor Port - turns a free-text message into profile fields.

use async_trait::async_trait;

use crate::domain::profile::{ProfileUpdate, TripProfile};

/// Errors from the extraction collaborator.
///
/// Callers degrade every variant to "no new information".
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ExtractionError {
    #[error("extraction provider failed: {0}")]
    Provider(String),

    #[error("extraction output malformed: {0}")]
    Malformed(String),
}

/// Port for profile-field extraction.
#[async_trait]
pub trait ProfileExtractor: Send + Sync {
    /// Extracts whatever trip attributes the message mentions.
    ///
    /// `current` is the profile known so far, given as context.
    async fn extract(
        &self,
        message: &str,
        current: &TripProfile,
    ) -> Result<ProfileUpdate, ExtractionError>;
}
