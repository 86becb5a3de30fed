//! Value objects for category retrieval.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::domain::foundation::Category;

/// One retrieved place, restaurant, lodging or event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedItem {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
    /// Whatever else the retrieval service attached, passed through untouched.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl RetrievedItem {
    /// Creates an item with empty metadata.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            description: description.into(),
            metadata: serde_json::Value::Null,
        }
    }

    /// Attaches opaque metadata.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// What one category should fetch this turn. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub category: Category,
    pub query: String,
    pub count: usize,
}

impl CategoryRequest {
    pub fn new(category: Category, query: impl Into<String>, count: usize) -> Self {
        Self {
            category,
            query: query.into(),
            count,
        }
    }
}

/// Ordered results for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: Category,
    pub items: Vec<RetrievedItem>,
}

impl CategoryResult {
    /// Creates a result from items.
    pub fn new(category: Category, items: Vec<RetrievedItem>) -> Self {
        Self { category, items }
    }

    /// The degraded result: nothing found.
    pub fn empty(category: Category) -> Self {
        Self::new(category, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Keeps at most `max` items.
    pub fn truncated(mut self, max: usize) -> Self {
        self.items.truncate(max);
        self
    }

    /// Drops items whose name was already seen, keeping the first occurrence.
    pub fn deduplicated(mut self) -> Self {
        let mut seen = HashSet::new();
        self.items.retain(|item| seen.insert(item.name.clone()));
        self
    }

    /// Item names in order.
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.name.as_str()).collect()
    }
}

/// Outcome of a single retrieval attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AttemptOutcome {
    Succeeded { item_count: usize },
    Failed { reason: String, timed_out: bool },
}

/// Record of one try against the retrieval service. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalAttempt {
    /// 0-based attempt index.
    pub index: u32,
    /// Read timeout used for this attempt.
    pub timeout: Duration,
    pub outcome: AttemptOutcome,
}

impl RetrievalAttempt {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Succeeded { .. })
    }

    /// True when the attempt failed by running out of time.
    pub fn timed_out(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Failed { timed_out: true, .. })
    }
}

/// Ranking mode requested from the retrieval service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Pure relevance.
    Similarity,
    /// Maximal marginal relevance: trades relevance for variety.
    #[default]
    Mmr,
}
