//! LLM Itinerary Synthesizer - itinerary and follow-up text via the AI provider.
//!
//! Each call is bounded by its own timeout on top of whatever the provider
//! enforces, so a hung generation cannot hold a turn open.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

use super::prompts::{
    follow_up_prompt, synthesis_prompt, FOLLOW_UP_SYSTEM_PROMPT, SYNTHESIS_SYSTEM_PROMPT,
};
use crate::ports::{
    AIProvider, CompletionRequest, FollowUpRequest, ItinerarySynthesizer, MessageRole,
    SynthesisError, SynthesisRequest,
};

/// Default bound on itinerary generation.
pub const DEFAULT_SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(120);

/// Default bound on follow-up generation.
pub const DEFAULT_FOLLOW_UP_TIMEOUT: Duration = Duration::from_secs(30);

/// ItinerarySynthesizer backed by an LLM.
pub struct LlmItinerarySynthesizer {
    provider: Arc<dyn AIProvider>,
    synthesis_timeout: Duration,
    follow_up_timeout: Duration,
}

impl LlmItinerarySynthesizer {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            synthesis_timeout: DEFAULT_SYNTHESIS_TIMEOUT,
            follow_up_timeout: DEFAULT_FOLLOW_UP_TIMEOUT,
        }
    }

    pub fn with_synthesis_timeout(mut self, limit: Duration) -> Self {
        self.synthesis_timeout = limit;
        self
    }

    pub fn with_follow_up_timeout(mut self, limit: Duration) -> Self {
        self.follow_up_timeout = limit;
        self
    }

    async fn generate(
        &self,
        request: CompletionRequest,
        limit: Duration,
    ) -> Result<String, SynthesisError> {
        let response = timeout(limit, self.provider.complete(request))
            .await
            .map_err(|_| SynthesisError::Timeout {
                timeout_secs: limit.as_secs(),
            })?
            .map_err(|e| SynthesisError::Provider(e.to_string()))?;

        let text = response.content.trim();
        if text.is_empty() {
            warn!("provider returned blank text");
            return Err(SynthesisError::Empty);
        }
        Ok(text.to_string())
    }
}

#[async_trait]
impl ItinerarySynthesizer for LlmItinerarySynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String, SynthesisError> {
        let completion = CompletionRequest::new()
            .with_system_prompt(SYNTHESIS_SYSTEM_PROMPT)
            .with_message(MessageRole::User, synthesis_prompt(request))
            .with_temperature(0.7)
            .with_max_tokens(3000);

        self.generate(completion, self.synthesis_timeout).await
    }

    async fn follow_up(&self, request: &FollowUpRequest) -> Result<String, SynthesisError> {
        let completion = CompletionRequest::new()
            .with_system_prompt(FOLLOW_UP_SYSTEM_PROMPT)
            .with_message(MessageRole::User, follow_up_prompt(request))
            .with_temperature(0.7)
            .with_max_tokens(500);

        self.generate(completion, self.follow_up_timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::ports::AIError;

    fn synthesis_request() -> SynthesisRequest {
        SynthesisRequest {
            profile_summary: "여행 기간: 2박3일".to_string(),
            conversation_summary: String::new(),
            user_message: "일정 짜줘".to_string(),
            persona_tag: None,
            results: Vec::new(),
        }
    }

    #[tokio::test]
    async fn returns_trimmed_text() {
        let provider = MockAIProvider::new().with_response("  1일차: 협재해수욕장\n");
        let synthesizer = LlmItinerarySynthesizer::new(Arc::new(provider.clone()));

        let text = synthesizer.synthesize(&synthesis_request()).await.unwrap();

        assert_eq!(text, "1일차: 협재해수욕장");
        assert_eq!(
            provider.get_calls()[0].system_prompt.as_deref(),
            Some(SYNTHESIS_SYSTEM_PROMPT)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_generation_times_out() {
        let provider = MockAIProvider::new().with_delay(Duration::from_secs(200));
        let synthesizer = LlmItinerarySynthesizer::new(Arc::new(provider));

        let err = synthesizer.synthesize(&synthesis_request()).await.unwrap_err();

        assert_eq!(err, SynthesisError::Timeout { timeout_secs: 120 });
    }

    #[tokio::test(start_paused = true)]
    async fn follow_up_uses_its_own_bound() {
        let provider = MockAIProvider::new().with_delay(Duration::from_secs(20));
        let synthesizer = LlmItinerarySynthesizer::new(Arc::new(provider))
            .with_synthesis_timeout(Duration::from_secs(487))
            .with_follow_up_timeout(Duration::from_secs(5));

        let err = synthesizer
            .follow_up(&FollowUpRequest {
                profile_summary: "정보 없음".to_string(),
                conversation_summary: String::new(),
                user_message: "안녕".to_string(),
                missing_fields: vec!["여행 기간"],
            })
            .await
            .unwrap_err();

        assert_eq!(err, SynthesisError::Timeout { timeout_secs: 5 });
    }

    #[tokio::test]
    async fn blank_text_is_empty() {
        let provider = MockAIProvider::new().with_response("   ");
        let synthesizer = LlmItinerarySynthesizer::new(Arc::new(provider));

        let err = synthesizer.synthesize(&synthesis_request()).await.unwrap_err();

        assert_eq!(err, SynthesisError::Empty);
    }

    #[tokio::test]
    async fn follow_up_maps_provider_errors() {
        let provider = MockAIProvider::new().with_error(AIError::unavailable("503"));
        let synthesizer = LlmItinerarySynthesizer::new(Arc::new(provider));

        let err = synthesizer
            .follow_up(&FollowUpRequest {
                profile_summary: "정보 없음".to_string(),
                conversation_summary: String::new(),
                user_message: "안녕".to_string(),
                missing_fields: vec!["여행 기간"],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SynthesisError::Provider(_)));
    }
}
