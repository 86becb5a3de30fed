//! ConversationOrchestrator - runs one user turn through the state machine.
//!
//! A turn loads the session, merges what the message says into the trip
//! profile and then either asks a follow-up question (profile still thin)
//! or dispatches retrieval and hands the results to synthesis. Every turn
//! produces a response: collaborator failures degrade, and anything that
//! escapes (errors or panics) is answered with a fixed fallback message.
//!
//! Turns for the same session are serialized; different sessions run freely.

use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::outcome::{TurnDiagnostics, TurnOutcome};
use crate::application::dispatch::{CategoryDispatcher, DispatchReport};
use crate::domain::conversation::{ConversationState, Role, TurnPhase};
use crate::domain::foundation::{SessionId, ValidationError};
use crate::domain::planning::{synthesis_budget, DemandPlanner, SearchPolicy};
use crate::domain::profile::{is_sufficient, ProfileUpdate, SufficiencyMode};
use crate::ports::{
    FollowUpRequest, ItinerarySynthesizer, PersonaDirectory, ProfileExtractor, SessionStore,
    SynthesisRequest,
};

/// Reply when a turn fails outright.
pub const FALLBACK_MESSAGE: &str =
    "죄송합니다. 요청을 처리하는 중 문제가 발생했어요. 잠시 후 다시 말씀해 주세요.";

/// Reply when itinerary synthesis fails.
pub const APOLOGY_MESSAGE: &str = "죄송합니다. 일정 생성 중 오류가 발생했습니다.";

/// Reply when follow-up generation fails.
pub const DEFAULT_FOLLOW_UP: &str =
    "제주도 여행에 대해 더 자세히 알려주시면 더 좋은 추천을 드릴 수 있어요! 여행 기간, 동행, 관심사를 알려주세요.";

/// Errors that abort a turn and trigger the fallback reply.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum OrchestrationError {
    #[error("illegal phase change: {0}")]
    Transition(#[from] ValidationError),
}

/// Tunables for the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorSettings {
    pub sufficiency: SufficiencyMode,
    pub search_policy: SearchPolicy,
    /// Log entries included in conversation summaries.
    pub history_window: usize,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            sufficiency: SufficiencyMode::CountThreshold,
            search_policy: SearchPolicy::Always,
            history_window: 6,
        }
    }
}

/// Drives conversation turns.
pub struct ConversationOrchestrator {
    sessions: Arc<dyn SessionStore>,
    extractor: Arc<dyn ProfileExtractor>,
    personas: Option<Arc<dyn PersonaDirectory>>,
    dispatcher: Arc<CategoryDispatcher>,
    synthesizer: Arc<dyn ItinerarySynthesizer>,
    settings: OrchestratorSettings,
    turn_locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl ConversationOrchestrator {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        extractor: Arc<dyn ProfileExtractor>,
        dispatcher: Arc<CategoryDispatcher>,
        synthesizer: Arc<dyn ItinerarySynthesizer>,
    ) -> Self {
        Self {
            sessions,
            extractor,
            personas: None,
            dispatcher,
            synthesizer,
            settings: OrchestratorSettings::default(),
            turn_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Enables known-user recognition.
    pub fn with_personas(mut self, personas: Arc<dyn PersonaDirectory>) -> Self {
        self.personas = Some(personas);
        self
    }

    pub fn with_settings(mut self, settings: OrchestratorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Handles one user message. Never fails.
    pub async fn handle_turn(&self, session_id: &SessionId, message: &str) -> TurnOutcome {
        let started = Instant::now();
        let turn_lock = self.acquire_turn_lock(session_id).await;
        let guard = turn_lock.lock().await;

        let mut state = match self.sessions.load(session_id).await {
            Ok(Some(state)) => state,
            Ok(None) => {
                debug!(%session_id, "starting new session");
                ConversationState::new(session_id.clone())
            }
            Err(err) => {
                warn!(%session_id, error = %err, "session load failed, starting over");
                ConversationState::new(session_id.clone())
            }
        };
        state.resume();
        state.record(Role::User, message);

        let snapshot = state.clone();
        let mut dispatch = None;
        let result = AssertUnwindSafe(self.run_turn(&mut state, message, &mut dispatch))
            .catch_unwind()
            .await;

        let response = match result {
            Ok(Ok(text)) => text,
            Ok(Err(err)) => {
                error!(%session_id, error = %err, "turn failed");
                state.fail();
                FALLBACK_MESSAGE.to_string()
            }
            Err(_) => {
                error!(%session_id, "turn panicked");
                state = snapshot;
                state.fail();
                dispatch = None;
                FALLBACK_MESSAGE.to_string()
            }
        };
        state.record(Role::Assistant, response.as_str());

        if let Err(err) = self.sessions.save(&state).await {
            error!(%session_id, error = %err, "session save failed");
        }

        drop(guard);
        self.release_turn_lock(session_id, turn_lock).await;

        let elapsed = started.elapsed();
        info!(
            %session_id,
            phase = state.phase().label(),
            elapsed_ms = elapsed.as_millis() as u64,
            "turn finished"
        );

        TurnOutcome {
            session_id: session_id.clone(),
            response,
            diagnostics: TurnDiagnostics {
                phase: state.phase(),
                ready: state.ready,
                profile_completion: state.profile.completion(),
                dispatch,
                elapsed,
            },
            profile: state.profile,
        }
    }

    /// Drops a session's state.
    pub async fn forget(&self, session_id: &SessionId) {
        if let Err(err) = self.sessions.remove(session_id).await {
            warn!(%session_id, error = %err, "session removal failed");
        }
    }

    async fn run_turn(
        &self,
        state: &mut ConversationState,
        message: &str,
        dispatch: &mut Option<DispatchReport>,
    ) -> Result<String, OrchestrationError> {
        self.merge_message(state, message).await;

        if state.phase() == TurnPhase::Collecting {
            if !is_sufficient(&state.profile, self.settings.sufficiency) {
                debug!(
                    session_id = %state.session_id,
                    filled = state.profile.filled_field_count(),
                    "profile not yet sufficient"
                );
                return Ok(self.follow_up(state, message).await);
            }
            state.advance(TurnPhase::Ready)?;
        }

        state.advance(TurnPhase::Dispatching)?;
        let days = DemandPlanner::infer_days(state.profile.duration.as_deref().unwrap_or_default());
        let counts = DemandPlanner::plan_for_days(days);
        let categories = self.settings.search_policy.categories_for(message);
        let report = self
            .dispatcher
            .dispatch(&state.profile, message, &counts, &categories)
            .await;
        state.cache_results(report.results());
        *dispatch = Some(report);

        state.advance(TurnPhase::Synthesizing)?;
        let budget = synthesis_budget(days);
        let request = SynthesisRequest {
            profile_summary: state.profile.summary(),
            conversation_summary: state.recent_history(self.settings.history_window),
            user_message: message.to_string(),
            persona_tag: state.profile.persona_tag.clone(),
            results: state
                .cached_results()
                .map(|r| r.clone().truncated(budget.get(r.category)))
                .collect(),
        };
        let text = match self.synthesizer.synthesize(&request).await {
            Ok(text) => text,
            Err(err) => {
                warn!(session_id = %state.session_id, error = %err, "synthesis failed");
                APOLOGY_MESSAGE.to_string()
            }
        };

        state.advance(TurnPhase::Done)?;
        Ok(text)
    }

    async fn merge_message(&self, state: &mut ConversationState, message: &str) {
        if !state.profile.has_identity() {
            if let Some(personas) = &self.personas {
                match personas.find_in_message(message).await {
                    Ok(Some(persona)) => {
                        info!(session_id = %state.session_id, name = %persona.display_name, "known user recognized");
                        state.profile.apply(&persona.to_update());
                    }
                    Ok(None) => {}
                    Err(err) => warn!(error = %err, "persona lookup failed"),
                }
            }
        }

        let update = match self.extractor.extract(message, &state.profile).await {
            Ok(update) => update,
            Err(err) => {
                warn!(session_id = %state.session_id, error = %err, "extraction failed");
                ProfileUpdate::default()
            }
        };
        state.profile.apply(&update);
    }

    async fn follow_up(&self, state: &ConversationState, message: &str) -> String {
        let request = FollowUpRequest {
            profile_summary: state.profile.summary(),
            conversation_summary: state.recent_history(self.settings.history_window),
            user_message: message.to_string(),
            missing_fields: state.profile.missing_fields(),
        };
        match self.synthesizer.follow_up(&request).await {
            Ok(text) => text,
            Err(err) => {
                warn!(session_id = %state.session_id, error = %err, "follow-up generation failed");
                DEFAULT_FOLLOW_UP.to_string()
            }
        }
    }

    async fn acquire_turn_lock(&self, session_id: &SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.turn_locks.lock().await;
        Arc::clone(locks.entry(session_id.clone()).or_default())
    }

    async fn release_turn_lock(&self, session_id: &SessionId, turn_lock: Arc<Mutex<()>>) {
        let mut locks = self.turn_locks.lock().await;
        drop(turn_lock);
        if locks
            .get(session_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(session_id);
        }
    }
}
