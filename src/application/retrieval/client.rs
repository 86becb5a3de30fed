//! RetrievalClient - bounded, retrying access to the retrieval service.
//!
//! Attempt `i` (0-based) uses a read timeout of `base_timeout * (i + 1)`.
//! Between attempts the client sleeps `backoff_base * 2^i`. When every
//! attempt fails the caller gets an empty result, never an error.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::application::duration_ms;
use crate::domain::foundation::Category;
use crate::domain::retrieval::{AttemptOutcome, CategoryResult, RetrievalAttempt, SearchType};
use crate::ports::{RetrievalError, RetrievalService, SearchRequest};

/// Query used by the health probe.
pub const PROBE_QUERY: &str = "제주도";

/// Read timeout of the health probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Retry and request-shape policy.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_retries: u32,
    pub base_timeout: Duration,
    pub backoff_base: Duration,
    pub search_type: SearchType,
    pub diversity_lambda: f32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_timeout: Duration::from_secs(90),
            backoff_base: Duration::from_secs(1),
            search_type: SearchType::Mmr,
            diversity_lambda: 0.5,
        }
    }
}

impl RetryPolicy {
    /// Read timeout for attempt `index`.
    pub fn timeout_for(&self, index: u32) -> Duration {
        self.base_timeout.saturating_mul(index.saturating_add(1))
    }

    /// Sleep after failed attempt `index`.
    pub fn backoff_for(&self, index: u32) -> Duration {
        self.backoff_base.saturating_mul(1u32 << index.min(16))
    }
}

/// Result of the health probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalHealth {
    pub status: HealthStatus,
    /// HTTP-level status when the service answered with one.
    pub status_code: Option<u16>,
    #[serde(with = "duration_ms::option")]
    pub latency: Option<Duration>,
    pub endpoint: String,
    pub error: Option<String>,
}

impl RetrievalHealth {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Coarse health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Reachable but answered with an error status.
    Unhealthy,
    /// Unreachable, timed out or unreadable.
    Error,
}

/// Retrying client over a [`RetrievalService`].
pub struct RetrievalClient {
    service: Arc<dyn RetrievalService>,
    policy: RetryPolicy,
}

impl RetrievalClient {
    pub fn new(service: Arc<dyn RetrievalService>, policy: RetryPolicy) -> Self {
        Self { service, policy }
    }

    /// Names the underlying service for logs.
    pub fn describe(&self) -> String {
        self.service.describe()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches up to `count` items, degrading to an empty result.
    pub async fn fetch(&self, query: &str, category: Category, count: usize) -> CategoryResult {
        self.fetch_with_attempts(query, category, count).await.0
    }

    /// Like [`fetch`](Self::fetch), also returning a record of every attempt.
    pub async fn fetch_with_attempts(
        &self,
        query: &str,
        category: Category,
        count: usize,
    ) -> (CategoryResult, Vec<RetrievalAttempt>) {
        let mut attempts = Vec::new();
        if count == 0 {
            return (CategoryResult::empty(category), attempts);
        }

        let request = self.request(query, count);
        let max_attempts = self.policy.max_retries.max(1);

        for index in 0..max_attempts {
            let timeout = self.policy.timeout_for(index);
            let started = Instant::now();

            match self.service.search(&request, timeout).await {
                Ok(response) => {
                    let result = CategoryResult::new(category, response.items).truncated(count);
                    info!(
                        %category,
                        attempt = index + 1,
                        items = result.len(),
                        requested = count,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "retrieval succeeded"
                    );
                    attempts.push(RetrievalAttempt {
                        index,
                        timeout,
                        outcome: AttemptOutcome::Succeeded {
                            item_count: result.len(),
                        },
                    });
                    return (result, attempts);
                }
                Err(err) => {
                    let timed_out = err.is_timeout();
                    warn!(
                        %category,
                        attempt = index + 1,
                        max_attempts,
                        timeout_secs = timeout.as_secs(),
                        timed_out,
                        error = %err,
                        "retrieval attempt failed"
                    );
                    attempts.push(RetrievalAttempt {
                        index,
                        timeout,
                        outcome: AttemptOutcome::Failed {
                            reason: err.to_string(),
                            timed_out,
                        },
                    });
                    if index + 1 < max_attempts {
                        let backoff = self.policy.backoff_for(index);
                        debug!(%category, backoff_ms = backoff.as_millis() as u64, "backing off");
                        sleep(backoff).await;
                    }
                }
            }
        }

        warn!(%category, query, "retrieval exhausted, degrading to empty result");
        (CategoryResult::empty(category), attempts)
    }

    /// One short probe request, no retries.
    pub async fn diagnose(&self) -> RetrievalHealth {
        let endpoint = self.service.describe();
        let started = Instant::now();
        let request = SearchRequest::new(PROBE_QUERY, 1);

        match self.service.search(&request, PROBE_TIMEOUT).await {
            Ok(_) => RetrievalHealth {
                status: HealthStatus::Healthy,
                status_code: Some(200),
                latency: Some(started.elapsed()),
                endpoint,
                error: None,
            },
            Err(RetrievalError::Status { status }) => RetrievalHealth {
                status: HealthStatus::Unhealthy,
                status_code: Some(status),
                latency: Some(started.elapsed()),
                endpoint,
                error: None,
            },
            Err(err) => RetrievalHealth {
                status: HealthStatus::Error,
                status_code: None,
                latency: None,
                endpoint,
                error: Some(err.to_string()),
            },
        }
    }

    fn request(&self, query: &str, count: usize) -> SearchRequest {
        let request = SearchRequest::new(query, count);
        match self.policy.search_type {
            SearchType::Mmr => request.with_diversity(self.policy.diversity_lambda),
            SearchType::Similarity => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::retrieval::MockRetrievalService;

    fn client(service: MockRetrievalService) -> RetrievalClient {
        RetrievalClient::new(Arc::new(service), RetryPolicy::default())
    }

    #[test]
    fn timeouts_escalate_and_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.timeout_for(0), Duration::from_secs(90));
        assert_eq!(policy.timeout_for(2), Duration::from_secs(270));
        assert_eq!(policy.backoff_for(0), Duration::from_secs(1));
        assert_eq!(policy.backoff_for(1), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn success_is_truncated_to_count() {
        let service = MockRetrievalService::new();
        let result = client(service.clone()).fetch("제주 맛집 추천", Category::Food, 4).await;

        assert_eq!(result.len(), 4);
        assert_eq!(service.call_count(), 1);
        let request = &service.calls()[0].request;
        assert_eq!(request.search_type, SearchType::Mmr);
        assert_eq!(request.diversity_lambda, Some(0.5));
    }

    #[tokio::test]
    async fn zero_count_skips_the_service() {
        let service = MockRetrievalService::new();
        let result = client(service.clone()).fetch("q", Category::Event, 0).await;
        assert!(result.is_empty());
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_failure_degrades_after_three_attempts() {
        let service =
            MockRetrievalService::new().always_failing(RetrievalError::Status { status: 500 });
        let started = Instant::now();

        let (result, attempts) = client(service.clone())
            .fetch_with_attempts("q", Category::Hotel, 3)
            .await;

        assert!(result.is_empty());
        assert_eq!(result.category, Category::Hotel);
        assert_eq!(attempts.len(), 3);
        assert!(attempts.iter().all(|a| !a.succeeded() && !a.timed_out()));

        let calls = service.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].started_at - calls[0].started_at, Duration::from_secs(1));
        assert_eq!(calls[2].started_at - calls[1].started_at, Duration::from_secs(2));
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn read_timeout_escalates_per_attempt() {
        let service = MockRetrievalService::new().with_latency(Duration::from_secs(150));

        let (result, attempts) = client(service.clone())
            .fetch_with_attempts("q", Category::Tour, 2)
            .await;

        assert_eq!(result.len(), 2);
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].timeout, Duration::from_secs(90));
        assert!(!attempts[0].succeeded());
        assert!(attempts[0].timed_out());
        assert_eq!(attempts[1].timeout, Duration::from_secs(180));
        assert!(attempts[1].succeeded());
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_transient_failure() {
        let service = MockRetrievalService::new().failing_first(1, RetrievalError::ConnectTimeout);
        let result = client(service.clone()).fetch("q", Category::Food, 2).await;
        assert_eq!(result.len(), 2);
        assert_eq!(service.call_count(), 2);
    }

    #[tokio::test]
    async fn diagnose_reports_health() {
        let healthy = client(MockRetrievalService::new()).diagnose().await;
        assert!(healthy.is_healthy());
        assert_eq!(healthy.endpoint, "mock");

        let unhealthy = client(
            MockRetrievalService::new().always_failing(RetrievalError::Status { status: 503 }),
        )
        .diagnose()
        .await;
        assert_eq!(unhealthy.status, HealthStatus::Unhealthy);
        assert_eq!(unhealthy.status_code, Some(503));

        let down = client(
            MockRetrievalService::new().always_failing(RetrievalError::Network("refused".into())),
        )
        .diagnose()
        .await;
        assert_eq!(down.status, HealthStatus::Error);
        assert!(down.error.is_some());
    }

    #[tokio::test]
    async fn diagnose_makes_a_single_probe() {
        let service =
            MockRetrievalService::new().always_failing(RetrievalError::Status { status: 500 });
        client(service.clone()).diagnose().await;

        let calls = service.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].request.query, PROBE_QUERY);
        assert_eq!(calls[0].request.top_k, 1);
        assert_eq!(calls[0].read_timeout, PROBE_TIMEOUT);
    }
}
