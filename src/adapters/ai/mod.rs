//! AI Adapters.
//!
//! Implementations of the AIProvider port, plus the collaborators that
//! use it (profile extraction, query writing, itinerary synthesis).
//!
//! ## Available Adapters
//!
//! - `OpenAIProvider` - OpenAI-compatible chat completions (Upstage Solar by default)
//! - `MockAIProvider` - Configurable mock for testing
//! - `LlmProfileExtractor` - ProfileExtractor over an AIProvider
//! - `LlmQueryWriter` - QueryWriter over an AIProvider
//! - `LlmItinerarySynthesizer` - ItinerarySynthesizer over an AIProvider

mod llm_profile_extractor;
mod llm_query_writer;
mod llm_synthesizer;
mod mock_provider;
mod openai_provider;
pub mod prompts;

pub use llm_profile_extractor::LlmProfileExtractor;
pub use llm_query_writer::LlmQueryWriter;
pub use llm_synthesizer::{
    LlmItinerarySynthesizer, DEFAULT_FOLLOW_UP_TIMEOUT, DEFAULT_SYNTHESIS_TIMEOUT,
};
pub use mock_provider::{MockAIProvider, MockResponse, DEFAULT_MOCK_CONTENT};
pub use openai_provider::{
    retry_budget, OpenAIConfig, OpenAIProvider, DEFAULT_BACKOFF_BASE, DEFAULT_BASE_URL,
    DEFAULT_MODEL,
};
