//! Bootstrap - wires configured adapters into a ready orchestrator.
//!
//! With an AI key the LLM-backed extractor, query writer and synthesizer
//! are used; without one the keyword extractor, template writer and
//! listing synthesizer take their place.

use std::sync::Arc;
use tracing::info;

use crate::adapters::ai::{LlmItinerarySynthesizer, LlmProfileExtractor, LlmQueryWriter, OpenAIProvider};
use crate::adapters::profile::{JsonPersonaDirectory, KeywordProfileExtractor, TemplateQueryWriter};
use crate::adapters::retrieval::HttpRetrievalService;
use crate::adapters::storage::InMemorySessionStore;
use crate::adapters::synthesis::ListingSynthesizer;
use crate::application::conversation::{ConversationOrchestrator, OrchestratorSettings};
use crate::application::dispatch::{strategy_for, CategoryDispatcher, CategoryWorker};
use crate::application::retrieval::{BatchSplitter, RetrievalClient};
use crate::config::{AppConfig, QueryWriterKind};
use crate::ports::{
    AIError, AIProvider, ItinerarySynthesizer, PersonaDirectoryError, ProfileExtractor,
    QueryWriter, RetrievalError, RetrievalService,
};

/// Errors that prevent the application from starting.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("retrieval adapter: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("AI provider: {0}")]
    Ai(#[from] AIError),

    #[error("persona directory: {0}")]
    Personas(#[from] PersonaDirectoryError),
}

/// Everything the front end talks to.
pub struct Runtime {
    pub orchestrator: Arc<ConversationOrchestrator>,
    /// Shared with the dispatcher; exposed for health probes.
    pub retrieval: Arc<RetrievalClient>,
}

/// Builds the runtime from configuration, creating the network adapters.
pub async fn build(config: &AppConfig) -> Result<Runtime, BootstrapError> {
    let service = Arc::new(HttpRetrievalService::new(config.retrieval.http_config())?);
    let provider: Option<Arc<dyn AIProvider>> = match config.ai.provider_config() {
        Some(provider_config) => Some(Arc::new(OpenAIProvider::new(provider_config)?)),
        None => None,
    };
    assemble(config, service, provider).await
}

/// Builds the runtime around the given retrieval service and optional provider.
pub async fn assemble(
    config: &AppConfig,
    service: Arc<dyn RetrievalService>,
    provider: Option<Arc<dyn AIProvider>>,
) -> Result<Runtime, BootstrapError> {
    let retrieval = Arc::new(RetrievalClient::new(service, config.retrieval.retry_policy()));
    let splitter = Arc::new(BatchSplitter::new(
        Arc::clone(&retrieval),
        config.batching.batch_policy(),
    ));

    let (extractor, query_writer, synthesizer): (
        Arc<dyn ProfileExtractor>,
        Arc<dyn QueryWriter>,
        Arc<dyn ItinerarySynthesizer>,
    ) = match provider {
        Some(provider) => {
            let query_writer: Arc<dyn QueryWriter> = match config.dispatch.query_writer {
                QueryWriterKind::Llm => Arc::new(LlmQueryWriter::new(Arc::clone(&provider))),
                QueryWriterKind::Template => Arc::new(TemplateQueryWriter::new()),
            };
            let synthesizer = LlmItinerarySynthesizer::new(Arc::clone(&provider))
                .with_synthesis_timeout(config.ai.synthesis_deadline())
                .with_follow_up_timeout(config.ai.follow_up_timeout());
            (
                Arc::new(LlmProfileExtractor::new(provider)),
                query_writer,
                Arc::new(synthesizer),
            )
        }
        None => (
            Arc::new(KeywordProfileExtractor::new()),
            Arc::new(TemplateQueryWriter::new()),
            Arc::new(ListingSynthesizer::new()),
        ),
    };

    let worker = CategoryWorker::new(query_writer, splitter);
    let strategy = strategy_for(config.dispatch.mode, config.dispatch.inter_category_pause());
    let dispatcher = Arc::new(CategoryDispatcher::new(worker, strategy));

    let sessions = Arc::new(
        InMemorySessionStore::new()
            .with_idle_ttl(config.session.idle_ttl())
            .with_max_sessions(config.session.max_sessions),
    );

    let mut orchestrator = ConversationOrchestrator::new(sessions, extractor, dispatcher, synthesizer)
        .with_settings(OrchestratorSettings {
            sufficiency: config.conversation.sufficiency,
            search_policy: config.dispatch.search_policy,
            history_window: config.conversation.history_window,
        });

    if let Some(path) = &config.conversation.persona_file {
        let directory = JsonPersonaDirectory::load(path).await?;
        info!(personas = directory.len(), path = %path.display(), "persona directory loaded");
        orchestrator = orchestrator.with_personas(Arc::new(directory));
    }

    info!(
        mode = %config.dispatch.mode,
        retrieval = %retrieval.describe(),
        "orchestrator ready"
    );

    Ok(Runtime {
        orchestrator: Arc::new(orchestrator),
        retrieval,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::retrieval::MockRetrievalService;
    use crate::application::dispatch::DispatchMode;
    use crate::domain::foundation::SessionId;
    use std::io::Write;

    #[tokio::test]
    async fn keyword_stack_runs_without_an_ai_key() {
        let service = MockRetrievalService::new();
        let runtime = assemble(&AppConfig::default(), Arc::new(service.clone()), None)
            .await
            .unwrap();

        let outcome = runtime
            .orchestrator
            .handle_turn(&SessionId::new("boot").unwrap(), "2박3일 커플 맛집 여행")
            .await;

        assert!(outcome.response.contains("### 숙박"));
        assert_eq!(service.call_count(), 4);
    }

    #[tokio::test]
    async fn provider_backs_the_llm_collaborators() {
        let provider = MockAIProvider::new()
            .with_response(r#"{"duration":"2박3일","group_type":"커플","interests":["맛집"]}"#)
            .with_response("제주 여행 일정입니다");
        let runtime = assemble(
            &AppConfig::default(),
            Arc::new(MockRetrievalService::new()),
            Some(Arc::new(provider.clone())),
        )
        .await
        .unwrap();

        let outcome = runtime
            .orchestrator
            .handle_turn(&SessionId::new("boot").unwrap(), "둘이서 2박3일 먹방 여행")
            .await;

        assert_eq!(outcome.response, "제주 여행 일정입니다");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn persona_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"users":[{{"name":"이서준","personality":"에겐","travel_style":"힐링"}}]}}"#
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.conversation.persona_file = Some(file.path().to_path_buf());
        let runtime = assemble(&config, Arc::new(MockRetrievalService::new()), None)
            .await
            .unwrap();

        let outcome = runtime
            .orchestrator
            .handle_turn(&SessionId::new("boot").unwrap(), "이서준입니다")
            .await;
        assert_eq!(outcome.profile.persona_tag.as_deref(), Some("에겐"));
    }

    #[tokio::test]
    async fn missing_persona_file_fails_startup() {
        let mut config = AppConfig::default();
        config.conversation.persona_file = Some("/nonexistent/personas.json".into());
        let result = assemble(&config, Arc::new(MockRetrievalService::new()), None).await;
        assert!(matches!(result, Err(BootstrapError::Personas(_))));
    }

    #[test]
    fn sequential_mode_is_wired_from_config() {
        let mut config = AppConfig::default();
        config.dispatch.mode = DispatchMode::Sequential;
        let strategy = strategy_for(config.dispatch.mode, config.dispatch.inter_category_pause());
        assert_eq!(strategy.mode(), DispatchMode::Sequential);
    }
}
