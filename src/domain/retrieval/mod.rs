//! Retrieval module - requests, results and attempt records per category.

mod values;

pub use values::{
    AttemptOutcome, CategoryRequest, CategoryResult, RetrievalAttempt, RetrievedItem, SearchType,
};
