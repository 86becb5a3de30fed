//! CategoryWorker - query preparation plus retrieval for one category.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::application::duration_ms;
use crate::application::retrieval::BatchSplitter;
use crate::domain::foundation::Category;
use crate::domain::profile::TripProfile;
use crate::domain::retrieval::{CategoryRequest, CategoryResult};
use crate::ports::QueryWriter;

/// Work order for one category.
#[derive(Debug, Clone)]
pub struct CategoryJob {
    pub category: Category,
    pub count: usize,
    pub profile: Arc<TripProfile>,
    pub message: Arc<str>,
}

/// What happened to one category during a dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOutcome {
    pub category: Category,
    pub query: String,
    pub requested: usize,
    pub returned: usize,
    #[serde(skip)]
    pub result: CategoryResult,
    #[serde(rename = "query_prep_ms", with = "duration_ms")]
    pub query_prep: Duration,
    #[serde(rename = "retrieval_ms", with = "duration_ms")]
    pub retrieval: Duration,
    /// Not searched this turn.
    pub skipped: bool,
    /// Set when the worker itself failed.
    pub failure: Option<String>,
}

impl CategoryOutcome {
    /// Outcome for a category left out by the search policy.
    pub fn skipped(category: Category, requested: usize) -> Self {
        Self {
            category,
            query: String::new(),
            requested,
            returned: 0,
            result: CategoryResult::empty(category),
            query_prep: Duration::ZERO,
            retrieval: Duration::ZERO,
            skipped: true,
            failure: None,
        }
    }

    /// Outcome for a worker that did not finish.
    pub fn failed(category: Category, requested: usize, failure: impl Into<String>) -> Self {
        Self {
            skipped: false,
            failure: Some(failure.into()),
            ..Self::skipped(category, requested)
        }
    }

    /// Query preparation plus retrieval.
    pub fn elapsed(&self) -> Duration {
        self.query_prep + self.retrieval
    }
}

/// Query used when the query writer fails.
pub fn fallback_query(category: Category) -> String {
    format!("제주 {} 추천", category.label())
}

/// Runs one category job.
pub struct CategoryWorker {
    query_writer: Arc<dyn QueryWriter>,
    splitter: Arc<BatchSplitter>,
}

impl CategoryWorker {
    pub fn new(query_writer: Arc<dyn QueryWriter>, splitter: Arc<BatchSplitter>) -> Self {
        Self {
            query_writer,
            splitter,
        }
    }

    pub async fn run(&self, job: CategoryJob) -> CategoryOutcome {
        let category = job.category;

        let prep_started = Instant::now();
        let query = match self
            .query_writer
            .write_query(category, &job.profile, &job.message)
            .await
        {
            Ok(query) => query,
            Err(err) => {
                warn!(%category, error = %err, "query preparation failed, using fallback query");
                fallback_query(category)
            }
        };
        let query_prep = prep_started.elapsed();

        let request = CategoryRequest::new(category, query, job.count);
        let retrieval_started = Instant::now();
        let result = self.splitter.split_fetch(&request).await;
        let retrieval = retrieval_started.elapsed();

        info!(
            %category,
            query = %request.query,
            requested = job.count,
            returned = result.len(),
            query_prep_ms = query_prep.as_millis() as u64,
            retrieval_ms = retrieval.as_millis() as u64,
            "category finished"
        );

        CategoryOutcome {
            category,
            query: request.query,
            requested: job.count,
            returned: result.len(),
            result,
            query_prep,
            retrieval,
            skipped: false,
            failure: None,
        }
    }
}
