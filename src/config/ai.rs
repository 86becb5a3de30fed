//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::{
    retry_budget, OpenAIConfig, DEFAULT_BACKOFF_BASE, DEFAULT_BASE_URL, DEFAULT_MODEL,
};

/// OpenAI-compatible provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// API key; the keyword and template fallbacks are used when unset
    pub api_key: Option<Secret<String>>,

    pub base_url: String,

    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum retries on failure
    pub max_retries: u32,

    /// Outer bound on follow-up question generation, in seconds
    pub follow_up_timeout_secs: u64,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Outer bound on itinerary generation; leaves room for every provider retry
    pub fn synthesis_deadline(&self) -> Duration {
        retry_budget(self.timeout(), self.max_retries, DEFAULT_BACKOFF_BASE)
    }

    pub fn follow_up_timeout(&self) -> Duration {
        Duration::from_secs(self.follow_up_timeout_secs)
    }

    /// Check if a provider key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    /// Provider settings, when a key is configured
    pub fn provider_config(&self) -> Option<OpenAIConfig> {
        if !self.has_api_key() {
            return None;
        }
        let key = self.api_key.as_ref()?.expose_secret().clone();
        Some(
            OpenAIConfig::new(key)
                .with_base_url(self.base_url.clone())
                .with_model(self.model.clone())
                .with_timeout(self.timeout())
                .with_max_retries(self.max_retries),
        )
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidAiBaseUrl);
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("ai.model"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 120,
            max_retries: 3,
            follow_up_timeout_secs: 30,
        }
    }
}
