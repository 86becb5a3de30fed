//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `retrieval` - Retrieval service over HTTP, plus a mock
//! - `ai` - LLM provider and the LLM-backed collaborators
//! - `profile` - Keyword extraction, persona directory, template queries
//! - `storage` - Session storage
//! - `synthesis` - Model-free itinerary listing

pub mod ai;
pub mod profile;
pub mod retrieval;
pub mod storage;
pub mod synthesis;
