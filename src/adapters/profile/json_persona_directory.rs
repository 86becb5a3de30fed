//! JSON Persona Directory - known users loaded from a JSON file.
//!
//! File format:
//!
//! ```json
//! {"users": [{"name": "지수", "personality": "에겐녀", "travel_style": "감성 카페 투어"}]}
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::ports::{Persona, PersonaDirectory, PersonaDirectoryError};

#[derive(Debug, Deserialize)]
struct DirectoryFile {
    #[serde(default)]
    users: Vec<Persona>,
}

/// In-memory persona directory loaded once from JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonPersonaDirectory {
    personas: Vec<Persona>,
}

impl JsonPersonaDirectory {
    /// Builds a directory from personas already in memory.
    pub fn from_personas(personas: Vec<Persona>) -> Self {
        let personas = personas
            .into_iter()
            .filter(|p| !p.display_name.trim().is_empty())
            .collect();
        Self { personas }
    }

    /// Parses the directory from JSON text.
    pub fn from_json(json: &str) -> Result<Self, PersonaDirectoryError> {
        let file: DirectoryFile = serde_json::from_str(json)?;
        Ok(Self::from_personas(file.users))
    }

    /// Loads the directory from a file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, PersonaDirectoryError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let directory = Self::from_json(&raw)?;
        info!(path = %path.display(), users = directory.len(), "persona directory loaded");
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

#[async_trait]
impl PersonaDirectory for JsonPersonaDirectory {
    /// The longest matching name wins, so "지수연" is not mistaken for "지수".
    async fn find_in_message(&self, message: &str) -> Result<Option<Persona>, PersonaDirectoryError> {
        Ok(self
            .personas
            .iter()
            .filter(|p| message.contains(p.display_name.trim()))
            .max_by_key(|p| p.display_name.trim().chars().count())
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DIRECTORY: &str = r#"{
        "users": [
            {"name": "지수", "personality": "에겐녀", "travel_style": "감성 카페 투어"},
            {"name": "지수연", "personality": "테토녀"},
            {"name": "민수", "personality": "테토남", "travel_style": "액티비티"}
        ]
    }"#;

    #[tokio::test]
    async fn finds_name_mentioned_in_message() {
        let directory = JsonPersonaDirectory::from_json(DIRECTORY).unwrap();

        let persona = directory
            .find_in_message("안녕 나 민수야, 제주 가고 싶어")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(persona.persona_tag, "테토남");
        assert_eq!(persona.style_tag.as_deref(), Some("액티비티"));
    }

    #[tokio::test]
    async fn longest_name_wins() {
        let directory = JsonPersonaDirectory::from_json(DIRECTORY).unwrap();

        let persona = directory.find_in_message("지수연이에요").await.unwrap().unwrap();

        assert_eq!(persona.display_name, "지수연");
    }

    #[tokio::test]
    async fn unknown_user_is_none() {
        let directory = JsonPersonaDirectory::from_json(DIRECTORY).unwrap();
        assert!(directory.find_in_message("안녕하세요").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DIRECTORY.as_bytes()).unwrap();

        let directory = JsonPersonaDirectory::load(file.path()).await.unwrap();

        assert_eq!(directory.len(), 3);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonPersonaDirectory::load(dir.path().join("users.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, PersonaDirectoryError::Io(_)));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let err = JsonPersonaDirectory::from_json("{\"users\": [").unwrap_err();
        assert!(matches!(err, PersonaDirectoryError::Parse(_)));
    }
}
