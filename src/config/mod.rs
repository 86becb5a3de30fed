//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TRIP_CONCIERGE` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a runnable setup
//! against a local retrieval service with keyword extraction.
//!
//! # Example
//!
//! ```no_run
//! use trip_concierge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Retrieval endpoint: {}", config.retrieval.url);
//! ```

mod ai;
mod batching;
mod conversation;
mod dispatch;
mod error;
mod retrieval;
mod session;
mod telemetry;

pub use ai::AiConfig;
pub use batching::BatchingConfig;
pub use conversation::ConversationConfig;
pub use dispatch::{DispatchConfig, QueryWriterKind};
pub use error::{ConfigError, ValidationError};
pub use retrieval::RetrievalConfig;
pub use session::SessionConfig;
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Retrieval endpoint, timeouts and retries
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Oversized request splitting
    #[serde(default)]
    pub batching: BatchingConfig,

    /// Category scheduling and query preparation
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Sufficiency gate and personas
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Session lifetime
    #[serde(default)]
    pub session: SessionConfig,

    /// LLM provider (OpenAI-compatible)
    #[serde(default)]
    pub ai: AiConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TRIP_CONCIERGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TRIP_CONCIERGE__RETRIEVAL__URL=...` -> `retrieval.url = ...`
    /// - `TRIP_CONCIERGE__DISPATCH__MODE=sequential` -> `dispatch.mode = sequential`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TRIP_CONCIERGE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.retrieval.validate()?;
        self.batching.validate()?;
        self.conversation.validate()?;
        self.session.validate()?;
        self.ai.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}
