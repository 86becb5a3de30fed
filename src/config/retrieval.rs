//! Retrieval service configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::retrieval::HttpRetrievalConfig;
use crate::application::retrieval::RetryPolicy;
use crate::domain::retrieval::SearchType;

/// Retrieval endpoint and retry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Full URL of the search endpoint
    pub url: String,

    /// Read timeout of the first attempt; later attempts scale linearly
    pub base_timeout_secs: u64,

    pub connect_timeout_secs: u64,

    /// Attempts per request, including the first
    pub max_retries: u32,

    /// Backoff before retry `n` is `backoff_base_ms * 2^n`
    pub backoff_base_ms: u64,

    pub search_type: SearchType,

    pub diversity_lambda: f32,

    pub pool_max_idle_per_host: usize,
}

impl RetrievalConfig {
    /// Retry policy for the retrieval client
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_timeout: Duration::from_secs(self.base_timeout_secs),
            backoff_base: Duration::from_millis(self.backoff_base_ms),
            search_type: self.search_type,
            diversity_lambda: self.diversity_lambda,
        }
    }

    /// Transport settings for the HTTP adapter
    pub fn http_config(&self) -> HttpRetrievalConfig {
        HttpRetrievalConfig::new(self.url.clone())
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .with_pool_max_idle_per_host(self.pool_max_idle_per_host)
    }

    /// Validate retrieval configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ValidationError::InvalidRetrievalUrl);
        }
        if self.max_retries == 0 {
            return Err(ValidationError::MustBePositive("retrieval.max_retries"));
        }
        if self.base_timeout_secs == 0 {
            return Err(ValidationError::MustBePositive("retrieval.base_timeout_secs"));
        }
        if !(0.0..=1.0).contains(&self.diversity_lambda) {
            return Err(ValidationError::InvalidDiversityLambda);
        }
        Ok(())
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8002/chat".to_string(),
            base_timeout_secs: 90,
            connect_timeout_secs: 10,
            max_retries: 3,
            backoff_base_ms: 1000,
            search_type: SearchType::Mmr,
            diversity_lambda: 0.5,
            pool_max_idle_per_host: 32,
        }
    }
}
