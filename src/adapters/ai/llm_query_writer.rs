//! LLM Query Writer - one-line retrieval queries written by the AI provider.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use super::prompts::{query_prompt, QUERY_SYSTEM_PROMPT};
use crate::adapters::profile::TemplateQueryWriter;
use crate::domain::foundation::Category;
use crate::domain::profile::TripProfile;
use crate::ports::{AIProvider, CompletionRequest, MessageRole, QueryWriter, QueryWriterError};

/// QueryWriter backed by an LLM, falling back to the template writer.
pub struct LlmQueryWriter {
    provider: Arc<dyn AIProvider>,
    fallback: TemplateQueryWriter,
}

impl LlmQueryWriter {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            fallback: TemplateQueryWriter::new(),
        }
    }

    async fn ask(
        &self,
        category: Category,
        profile: &TripProfile,
        message: &str,
    ) -> Result<String, QueryWriterError> {
        let request = CompletionRequest::new()
            .with_system_prompt(QUERY_SYSTEM_PROMPT)
            .with_message(
                MessageRole::User,
                query_prompt(category, &profile.summary(), message),
            )
            .with_temperature(0.3)
            .with_max_tokens(120);

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| QueryWriterError::Provider(e.to_string()))?;

        clean_query(&response.content).ok_or(QueryWriterError::Empty)
    }
}

/// First non-blank line, without a leading label or surrounding quotes.
fn clean_query(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|l| !l.is_empty())?;
    let line = line.strip_prefix("검색 쿼리:").unwrap_or(line).trim();
    let line = line.trim_matches(|c| c == '"' || c == '\'' || c == '“' || c == '”');
    let line = line.trim();
    (!line.is_empty()).then(|| line.to_string())
}

#[async_trait]
impl QueryWriter for LlmQueryWriter {
    async fn write_query(
        &self,
        category: Category,
        profile: &TripProfile,
        message: &str,
    ) -> Result<String, QueryWriterError> {
        match self.ask(category, profile, message).await {
            Ok(query) => Ok(query),
            Err(err) => {
                warn!(%category, error = %err, "query writer falling back to template");
                self.fallback.write_query(category, profile, message).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::ports::AIError;

    #[test]
    fn clean_query_strips_label_and_quotes() {
        assert_eq!(
            clean_query("\n검색 쿼리: \"서귀포 오션뷰 숙소 추천\"\n설명...").as_deref(),
            Some("서귀포 오션뷰 숙소 추천")
        );
        assert_eq!(clean_query("  \n \"\" "), None);
    }

    #[tokio::test]
    async fn uses_provider_line() {
        let provider = MockAIProvider::new().with_response("제주 서쪽 감성 카페 맛집 추천");
        let writer = LlmQueryWriter::new(Arc::new(provider));

        let query = writer
            .write_query(Category::Food, &TripProfile::new(), "맛집 알려줘")
            .await
            .unwrap();

        assert_eq!(query, "제주 서쪽 감성 카페 맛집 추천");
    }

    #[tokio::test]
    async fn falls_back_to_template_on_error() {
        let provider = MockAIProvider::new().with_error(AIError::network("reset"));
        let writer = LlmQueryWriter::new(Arc::new(provider));

        let query = writer
            .write_query(Category::Hotel, &TripProfile::new(), "숙소")
            .await
            .unwrap();

        assert!(query.ends_with("추천"));
        assert!(query.contains("제주"));
    }
}
