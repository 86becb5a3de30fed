//! LLM Profile Extractor - asks the AI provider for a JSON object of trip fields.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::prompts::{extraction_prompt, EXTRACTION_SYSTEM_PROMPT};
use crate::domain::profile::{ProfileUpdate, TripProfile};
use crate::ports::{AIProvider, CompletionRequest, ExtractionError, MessageRole, ProfileExtractor};

/// ProfileExtractor backed by an LLM.
///
/// Output that cannot be read as JSON yields an empty update, not an error;
/// only provider failures are reported.
pub struct LlmProfileExtractor {
    provider: Arc<dyn AIProvider>,
}

impl LlmProfileExtractor {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ProfileExtractor for LlmProfileExtractor {
    async fn extract(
        &self,
        message: &str,
        current: &TripProfile,
    ) -> Result<ProfileUpdate, ExtractionError> {
        let request = CompletionRequest::new()
            .with_system_prompt(EXTRACTION_SYSTEM_PROMPT)
            .with_message(
                MessageRole::User,
                extraction_prompt(message, &current.summary()),
            )
            .with_temperature(0.0)
            .with_max_tokens(400);

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| ExtractionError::Provider(e.to_string()))?;

        let update = ProfileUpdate::parse_lenient(&response.content);
        debug!(empty = update.is_empty(), "profile fields extracted");
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::ports::AIError;

    #[tokio::test]
    async fn parses_fenced_json() {
        let provider = MockAIProvider::new().with_response(
            "```json\n{\"duration\": \"2박3일\", \"group_type\": \"커플\", \"budget\": null}\n```",
        );
        let extractor = LlmProfileExtractor::new(Arc::new(provider.clone()));

        let update = extractor
            .extract("여자친구랑 2박3일", &TripProfile::new())
            .await
            .unwrap();

        assert_eq!(update.duration.as_deref(), Some("2박3일"));
        assert_eq!(update.group_type.as_deref(), Some("커플"));
        assert!(update.budget.is_none());
        assert!(provider.get_calls()[0].messages[0]
            .content
            .contains("여자친구랑 2박3일"));
    }

    #[tokio::test]
    async fn unreadable_output_is_an_empty_update() {
        let provider = MockAIProvider::new().with_response("잘 모르겠어요");
        let extractor = LlmProfileExtractor::new(Arc::new(provider));

        let update = extractor.extract("안녕", &TripProfile::new()).await.unwrap();

        assert!(update.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_is_reported() {
        let provider = MockAIProvider::new().with_error(AIError::AuthenticationFailed);
        let extractor = LlmProfileExtractor::new(Arc::new(provider));

        let err = extractor.extract("안녕", &TripProfile::new()).await.unwrap_err();

        assert!(matches!(err, ExtractionError::Provider(_)));
    }
}
