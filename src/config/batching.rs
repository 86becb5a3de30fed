//! Batch splitting configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::retrieval::BatchPolicy;

/// How oversized category requests are split
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchingConfig {
    /// Requests above this count are split into batches
    pub split_threshold: usize,

    pub batch_size: usize,

    pub inter_batch_delay_ms: u64,

    /// Batches that must run before the half-full early stop may apply
    pub early_stop_min_batches: usize,
}

impl BatchingConfig {
    pub fn batch_policy(&self) -> BatchPolicy {
        BatchPolicy {
            split_threshold: self.split_threshold,
            batch_size: self.batch_size,
            inter_batch_delay: Duration::from_millis(self.inter_batch_delay_ms),
            early_stop_min_batches: self.early_stop_min_batches,
        }
    }

    /// Validate batching configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.batch_size == 0 {
            return Err(ValidationError::MustBePositive("batching.batch_size"));
        }
        if self.batch_size > self.split_threshold {
            return Err(ValidationError::BatchLargerThanThreshold);
        }
        Ok(())
    }
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            split_threshold: 20,
            batch_size: 3,
            inter_batch_delay_ms: 2000,
            early_stop_min_batches: 3,
        }
    }
}
