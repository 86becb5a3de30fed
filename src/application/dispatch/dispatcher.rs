//! CategoryDispatcher - fans category work out and reports on it.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

use super::strategy::{DispatchMode, DispatchStrategy};
use super::worker::{CategoryJob, CategoryOutcome, CategoryWorker};
use crate::application::duration_ms;
use crate::domain::foundation::Category;
use crate::domain::planning::CategoryCounts;
use crate::domain::profile::TripProfile;
use crate::domain::retrieval::CategoryResult;

/// Everything observed during one dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchReport {
    pub mode: DispatchMode,
    /// One outcome per category, in canonical order.
    pub outcomes: Vec<CategoryOutcome>,
    #[serde(rename = "wall_clock_ms", with = "duration_ms")]
    pub wall_clock: Duration,
}

impl DispatchReport {
    pub fn outcome(&self, category: Category) -> Option<&CategoryOutcome> {
        self.outcomes.iter().find(|o| o.category == category)
    }

    /// Per-category results, in canonical order.
    pub fn results(&self) -> Vec<CategoryResult> {
        self.outcomes.iter().map(|o| o.result.clone()).collect()
    }

    pub fn total_items(&self) -> usize {
        self.outcomes.iter().map(|o| o.returned).sum()
    }

    /// Sum of per-category times.
    pub fn summed_elapsed(&self) -> Duration {
        self.outcomes.iter().map(CategoryOutcome::elapsed).sum()
    }
}

/// Runs the per-category pipeline under a pluggable scheduling strategy.
pub struct CategoryDispatcher {
    worker: Arc<CategoryWorker>,
    strategy: Arc<dyn DispatchStrategy>,
}

impl CategoryDispatcher {
    pub fn new(worker: CategoryWorker, strategy: Arc<dyn DispatchStrategy>) -> Self {
        Self {
            worker: Arc::new(worker),
            strategy,
        }
    }

    pub fn mode(&self) -> DispatchMode {
        self.strategy.mode()
    }

    /// Dispatches `categories` with the demand in `counts`.
    ///
    /// Categories not listed are reported as skipped with an empty result.
    pub async fn dispatch(
        &self,
        profile: &TripProfile,
        message: &str,
        counts: &CategoryCounts,
        categories: &[Category],
    ) -> DispatchReport {
        let profile = Arc::new(profile.clone());
        let message: Arc<str> = Arc::from(message);

        let jobs: Vec<CategoryJob> = Category::ALL
            .into_iter()
            .filter(|c| categories.contains(c))
            .map(|category| CategoryJob {
                category,
                count: counts.get(category),
                profile: Arc::clone(&profile),
                message: Arc::clone(&message),
            })
            .collect();

        let started = Instant::now();
        let mut outcomes = self.strategy.run(Arc::clone(&self.worker), jobs).await;
        let wall_clock = started.elapsed();

        for category in Category::ALL {
            if !outcomes.iter().any(|o| o.category == category) {
                outcomes.push(CategoryOutcome::skipped(category, counts.get(category)));
            }
        }
        outcomes.sort_by_key(|o| o.category);

        let report = DispatchReport {
            mode: self.mode(),
            outcomes,
            wall_clock,
        };
        info!(
            mode = %report.mode,
            total_items = report.total_items(),
            wall_clock_ms = wall_clock.as_millis() as u64,
            "dispatch finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::profile::TemplateQueryWriter;
    use crate::adapters::retrieval::MockRetrievalService;
    use crate::application::dispatch::{ConcurrentDispatch, SequentialDispatch};
    use crate::application::retrieval::{BatchPolicy, BatchSplitter, RetrievalClient, RetryPolicy};
    use crate::domain::planning::DemandPlanner;
    use crate::ports::RetrievalError;

    fn dispatcher(
        service: &MockRetrievalService,
        strategy: Arc<dyn DispatchStrategy>,
    ) -> CategoryDispatcher {
        let client = RetrievalClient::new(Arc::new(service.clone()), RetryPolicy::default());
        let splitter = BatchSplitter::new(Arc::new(client), BatchPolicy::default());
        let worker = CategoryWorker::new(Arc::new(TemplateQueryWriter::new()), Arc::new(splitter));
        CategoryDispatcher::new(worker, strategy)
    }

    fn latencies() -> MockRetrievalService {
        MockRetrievalService::new()
            .with_latency_for("숙박", Duration::from_secs(1))
            .with_latency_for("관광지", Duration::from_secs(2))
            .with_latency_for("맛집", Duration::from_secs(3))
            .with_latency_for("축제", Duration::from_secs(4))
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_wall_clock_is_the_slowest_category() {
        let service = latencies();
        let report = dispatcher(&service, Arc::new(ConcurrentDispatch))
            .dispatch(
                &TripProfile::new(),
                "일정 짜줘",
                &DemandPlanner::plan("2박3일"),
                &Category::ALL,
            )
            .await;

        assert_eq!(report.mode, DispatchMode::Concurrent);
        assert_eq!(report.wall_clock, Duration::from_secs(4));
        assert_eq!(report.summed_elapsed(), Duration::from_secs(10));
        assert_eq!(
            report.outcomes.iter().map(|o| o.category).collect::<Vec<_>>(),
            Category::ALL.to_vec()
        );
        assert_eq!(report.outcome(Category::Tour).map(|o| o.returned), Some(8));
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_wall_clock_is_the_sum_plus_pauses() {
        let service = latencies();
        let report = dispatcher(&service, Arc::new(SequentialDispatch::new(Duration::from_secs(1))))
            .dispatch(
                &TripProfile::new(),
                "일정 짜줘",
                &DemandPlanner::plan("2박3일"),
                &Category::ALL,
            )
            .await;

        assert_eq!(report.mode, DispatchMode::Sequential);
        assert_eq!(report.wall_clock, Duration::from_secs(10 + 3));

        let calls = service.calls();
        let order: Vec<_> = calls.iter().map(|c| c.request.query.clone()).collect();
        assert!(order[0].contains("숙박"));
        assert!(order[1].contains("관광지"));
        assert!(order[2].contains("맛집"));
        assert!(order[3].contains("축제"));
    }

    #[tokio::test(start_paused = true)]
    async fn one_failing_category_does_not_sink_the_others() {
        let service = MockRetrievalService::new()
            .failing_for("맛집", RetrievalError::Status { status: 500 });
        let report = dispatcher(&service, Arc::new(ConcurrentDispatch))
            .dispatch(
                &TripProfile::new(),
                "일정 짜줘",
                &DemandPlanner::plan("2박3일"),
                &Category::ALL,
            )
            .await;

        assert_eq!(report.outcome(Category::Food).map(|o| o.returned), Some(0));
        assert_eq!(report.outcome(Category::Hotel).map(|o| o.returned), Some(4));
        assert_eq!(report.outcome(Category::Event).map(|o| o.returned), Some(3));
        assert_eq!(service.calls_matching("맛집").len(), 3);
    }

    #[tokio::test]
    async fn unlisted_categories_are_skipped() {
        let service = MockRetrievalService::new();
        let report = dispatcher(&service, Arc::new(ConcurrentDispatch))
            .dispatch(
                &TripProfile::new(),
                "맛집 알려줘",
                &DemandPlanner::plan("2박3일"),
                &[Category::Food],
            )
            .await;

        assert_eq!(service.call_count(), 1);
        assert!(report.outcome(Category::Hotel).unwrap().skipped);
        assert!(!report.outcome(Category::Food).unwrap().skipped);
        assert_eq!(report.outcomes.len(), 4);
    }

    #[test]
    fn report_serializes_wall_clock_in_millis() {
        let report = DispatchReport {
            mode: DispatchMode::Sequential,
            outcomes: Vec::new(),
            wall_clock: Duration::from_millis(2500),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "sequential");
        assert_eq!(json["wall_clock_ms"], 2500);
    }
}
