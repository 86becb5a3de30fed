//! Conversation configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::domain::profile::SufficiencyMode;

/// Sufficiency gate, personas and summary window
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    pub sufficiency: SufficiencyMode,

    /// JSON file of known users; recognition is off when unset
    pub persona_file: Option<PathBuf>,

    /// Log entries passed to synthesis as conversation context
    pub history_window: usize,
}

impl ConversationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.history_window == 0 {
            return Err(ValidationError::MustBePositive("conversation.history_window"));
        }
        Ok(())
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            sufficiency: SufficiencyMode::CountThreshold,
            persona_file: None,
            history_window: 6,
        }
    }
}
