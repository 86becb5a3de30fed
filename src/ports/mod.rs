//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! ## Collaborator Ports
//!
//! - `RetrievalService` - One bounded search attempt against the retrieval service
//! - `AIProvider` - LLM text completion
//! - `ProfileExtractor` - Free text to profile fields
//! - `QueryWriter` - Per-category search query preparation
//! - `ItinerarySynthesizer` - Itinerary and follow-up generation
//! - `PersonaDirectory` - Known-user lookup
//!
//! ## Storage Ports
//!
//! - `SessionStore` - Keyed conversation state with eviction

mod ai_provider;
mod itinerary_synthesizer;
mod persona_directory;
mod profile_extractor;
mod query_writer;
mod retrieval_service;
mod session_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, TokenUsage,
};
pub use itinerary_synthesizer::{
    FollowUpRequest, ItinerarySynthesizer, SynthesisError, SynthesisRequest,
};
pub use persona_directory::{Persona, PersonaDirectory, PersonaDirectoryError};
pub use profile_extractor::{ExtractionError, ProfileExtractor};
pub use query_writer::{QueryWriter, QueryWriterError};
pub use retrieval_service::{RetrievalError, RetrievalService, SearchRequest, SearchResponse};
pub use session_store::{SessionStore, SessionStoreError};
