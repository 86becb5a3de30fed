//! Persona Directory Port - recognizes known users by name.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::profile::ProfileUpdate;

/// A known user and their travel persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(alias = "name")]
    pub display_name: String,
    #[serde(alias = "personality")]
    pub persona_tag: String,
    #[serde(default, alias = "travel_style")]
    pub style_tag: Option<String>,
}

impl Persona {
    /// The profile fields this persona contributes.
    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            display_name: Some(self.display_name.clone()),
            persona_tag: Some(self.persona_tag.clone()),
            style_tag: self.style_tag.clone(),
            ..ProfileUpdate::default()
        }
    }
}

/// Errors from the persona directory.
#[derive(Debug, thiserror::Error)]
pub enum PersonaDirectoryError {
    #[error("failed to read persona file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse persona file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Port for persona lookup.
#[async_trait]
pub trait PersonaDirectory: Send + Sync {
    /// Returns the known user whose name appears in the message, if any.
    async fn find_in_message(&self, message: &str) -> Result<Option<Persona>, PersonaDirectoryError>;
}
