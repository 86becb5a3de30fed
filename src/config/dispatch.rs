//! Category dispatch configuration

use serde::Deserialize;
use std::time::Duration;

use crate::application::dispatch::DispatchMode;
use crate::domain::planning::SearchPolicy;

/// Which query writer prepares retrieval queries
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueryWriterKind {
    #[default]
    Template,
    /// Falls back to the template when no AI key is configured
    Llm,
}

/// Scheduling of the per-category fetches
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub mode: DispatchMode,

    /// Pause between categories in sequential mode
    pub inter_category_pause_ms: u64,

    pub search_policy: SearchPolicy,

    pub query_writer: QueryWriterKind,
}

impl DispatchConfig {
    pub fn inter_category_pause(&self) -> Duration {
        Duration::from_millis(self.inter_category_pause_ms)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::Concurrent,
            inter_category_pause_ms: 1000,
            search_policy: SearchPolicy::Always,
            query_writer: QueryWriterKind::Template,
        }
    }
}
