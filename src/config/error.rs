//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid retrieval URL format")]
    InvalidRetrievalUrl,

    #[error("Invalid AI base URL format")]
    InvalidAiBaseUrl,

    #[error("{0} must be greater than zero")]
    MustBePositive(&'static str),

    #[error("Diversity lambda must be between 0 and 1")]
    InvalidDiversityLambda,

    #[error("Batch size must not exceed the split threshold")]
    BatchLargerThanThreshold,

    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),
}
