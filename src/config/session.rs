//! Session store configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Session lifetime limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle time after which a session is evicted
    pub idle_ttl_secs: u64,

    /// Least recently used sessions are evicted beyond this count
    pub max_sessions: usize,
}

impl SessionConfig {
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_sessions == 0 {
            return Err(ValidationError::MustBePositive("session.max_sessions"));
        }
        if self.idle_ttl_secs == 0 {
            return Err(ValidationError::MustBePositive("session.idle_ttl_secs"));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: 2 * 60 * 60,
            max_sessions: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::{DEFAULT_IDLE_TTL, DEFAULT_MAX_SESSIONS};

    #[test]
    fn test_defaults_match_store_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.idle_ttl(), DEFAULT_IDLE_TTL);
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn test_validation_rejects_zero_capacity() {
        let config = SessionConfig {
            max_sessions: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
