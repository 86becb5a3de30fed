//! Query Writer Port - builds the retrieval query for one category.

use async_trait::async_trait;

use crate::domain::foundation::Category;
use crate::domain::profile::TripProfile;

/// Errors from query preparation.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum QueryWriterError {
    #[error("query provider failed: {0}")]
    Provider(String),

    #[error("query writer produced an empty query")]
    Empty,
}

/// Port for per-category query preparation.
#[async_trait]
pub trait QueryWriter: Send + Sync {
    /// Writes a one-line search query for `category`.
    async fn write_query(
        &self,
        category: Category,
        profile: &TripProfile,
        message: &str,
    ) -> Result<String, QueryWriterError>;
}
