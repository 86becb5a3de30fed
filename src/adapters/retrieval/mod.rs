//! Retrieval Adapters.
//!
//! Implementations of the RetrievalService port.
//!
//! ## Available Adapters
//!
//! - `HttpRetrievalService` - JSON over HTTP to the retrieval server
//! - `MockRetrievalService` - Configurable mock for testing

mod http_retrieval_service;
mod mock_retrieval_service;

pub use http_retrieval_service::{HttpRetrievalConfig, HttpRetrievalService};
pub use mock_retrieval_service::{MockRetrievalService, RecordedSearch};
