//! Dispatch strategies - how category jobs are scheduled.
//!
//! Both strategies isolate failures per category: a worker that panics
//! yields a failed, empty outcome and the other categories carry on.

use async_trait::async_trait;
use futures::future::join_all;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::error;

use super::worker::{CategoryJob, CategoryOutcome, CategoryWorker};

/// Scheduling discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// All categories at once; wall-clock is bounded by the slowest.
    #[default]
    Concurrent,
    /// One category at a time in canonical order; wall-clock is the sum.
    Sequential,
}

impl std::fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchMode::Concurrent => write!(f, "concurrent"),
            DispatchMode::Sequential => write!(f, "sequential"),
        }
    }
}

/// Schedules category jobs on a worker.
#[async_trait]
pub trait DispatchStrategy: Send + Sync {
    fn mode(&self) -> DispatchMode;

    /// Runs every job and returns one outcome per job, in any order.
    async fn run(&self, worker: Arc<CategoryWorker>, jobs: Vec<CategoryJob>) -> Vec<CategoryOutcome>;
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "worker panicked".to_string())
}

/// Launches every job as its own task and waits for all of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcurrentDispatch;

#[async_trait]
impl DispatchStrategy for ConcurrentDispatch {
    fn mode(&self) -> DispatchMode {
        DispatchMode::Concurrent
    }

    async fn run(&self, worker: Arc<CategoryWorker>, jobs: Vec<CategoryJob>) -> Vec<CategoryOutcome> {
        let mut labels = Vec::with_capacity(jobs.len());
        let mut handles = Vec::with_capacity(jobs.len());
        for job in jobs {
            labels.push((job.category, job.count));
            let worker = Arc::clone(&worker);
            handles.push(tokio::spawn(async move { worker.run(job).await }));
        }

        join_all(handles)
            .await
            .into_iter()
            .zip(labels)
            .map(|(joined, (category, count))| {
                joined.unwrap_or_else(|err| {
                    let reason = if err.is_panic() {
                        panic_message(err.into_panic())
                    } else {
                        err.to_string()
                    };
                    error!(%category, reason = %reason, "category task failed");
                    CategoryOutcome::failed(category, count, reason)
                })
            })
            .collect()
    }
}

/// Runs jobs one after another with a pause between categories.
#[derive(Debug, Clone, Copy)]
pub struct SequentialDispatch {
    pub pause: Duration,
}

impl SequentialDispatch {
    pub fn new(pause: Duration) -> Self {
        Self { pause }
    }
}

impl Default for SequentialDispatch {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl DispatchStrategy for SequentialDispatch {
    fn mode(&self) -> DispatchMode {
        DispatchMode::Sequential
    }

    async fn run(&self, worker: Arc<CategoryWorker>, mut jobs: Vec<CategoryJob>) -> Vec<CategoryOutcome> {
        jobs.sort_by_key(|job| job.category);
        let mut outcomes = Vec::with_capacity(jobs.len());

        for (index, job) in jobs.into_iter().enumerate() {
            if index > 0 && !self.pause.is_zero() {
                sleep(self.pause).await;
            }
            let (category, count) = (job.category, job.count);
            let outcome = AssertUnwindSafe(worker.run(job))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    let reason = panic_message(payload);
                    error!(%category, reason = %reason, "category worker panicked");
                    CategoryOutcome::failed(category, count, reason)
                });
            outcomes.push(outcome);
        }

        outcomes
    }
}

/// Builds the strategy for a mode.
pub fn strategy_for(mode: DispatchMode, inter_category_pause: Duration) -> Arc<dyn DispatchStrategy> {
    match mode {
        DispatchMode::Concurrent => Arc::new(ConcurrentDispatch),
        DispatchMode::Sequential => Arc::new(SequentialDispatch::new(inter_category_pause)),
    }
}
