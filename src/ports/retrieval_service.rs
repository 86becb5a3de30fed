//! Retrieval Service Port - Interface to the external search collaborator.
//!
//! One call is one attempt: no retries, no fallbacks. Retry policy,
//! timeout escalation and degradation live in the application layer's
//! `RetrievalClient`, which drives this port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::retrieval::{RetrievedItem, SearchType};

/// A search request as sent to the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub top_k: usize,
    pub search_type: SearchType,
    /// Relevance/variety trade-off for MMR; ignored for similarity search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diversity_lambda: Option<f32>,
}

impl SearchRequest {
    /// Creates a similarity search request.
    pub fn new(query: impl Into<String>, top_k: usize) -> Self {
        Self {
            query: query.into(),
            top_k,
            search_type: SearchType::Similarity,
            diversity_lambda: None,
        }
    }

    /// Switches to MMR search with the given lambda.
    pub fn with_diversity(mut self, lambda: f32) -> Self {
        self.search_type = SearchType::Mmr;
        self.diversity_lambda = Some(lambda);
        self
    }
}

/// Items returned by one successful attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub items: Vec<RetrievedItem>,
    /// Server-side processing time, when reported.
    pub processing_time: Option<Duration>,
}

/// Why an attempt failed. Every variant is treated as transient.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum RetrievalError {
    #[error("read timed out after {timeout_secs}s")]
    ReadTimeout { timeout_secs: u64 },

    #[error("connect timed out")]
    ConnectTimeout,

    #[error("retrieval service returned HTTP {status}")]
    Status { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Parse(String),
}

impl RetrievalError {
    /// Returns true for either kind of timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            RetrievalError::ReadTimeout { .. } | RetrievalError::ConnectTimeout
        )
    }
}

/// Port for the retrieval collaborator.
#[async_trait]
pub trait RetrievalService: Send + Sync {
    /// Performs exactly one search attempt bounded by `read_timeout`.
    async fn search(
        &self,
        request: &SearchRequest,
        read_timeout: Duration,
    ) -> Result<SearchResponse, RetrievalError>;

    /// Short name for logs (usually the endpoint).
    fn describe(&self) -> String;
}
