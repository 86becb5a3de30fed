//! Mock Retrieval Service for testing.
//!
//! # Features
//!
//! - Generated items (`"{query} #{n}"`) or a fixed catalog per query pattern
//! - Per-pattern latency, honoured against the caller's read timeout
//! - Scripted failures (first N calls, or every call) for retry tests
//! - Call tracking with virtual-clock timestamps
//!
//! All waiting uses `tokio::time`, so tests can run under a paused clock.
//!
//! # Example
//!
//! ```ignore
//! let service = MockRetrievalService::new()
//!     .with_latency_for("숙박", Duration::from_secs(3))
//!     .failing_first(2, RetrievalError::Status { status: 500 });
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::domain::retrieval::RetrievedItem;
use crate::ports::{RetrievalError, RetrievalService, SearchRequest, SearchResponse};

/// A recorded call.
#[derive(Debug, Clone)]
pub struct RecordedSearch {
    pub request: SearchRequest,
    pub read_timeout: Duration,
    /// When the call started, on the tokio clock.
    pub started_at: Instant,
}

#[derive(Debug, Clone)]
struct Rule<T> {
    pattern: String,
    value: T,
}

/// Mock retrieval service.
#[derive(Debug, Clone, Default)]
pub struct MockRetrievalService {
    default_latency: Duration,
    latencies: Vec<Rule<Duration>>,
    catalogs: Vec<Rule<Vec<RetrievedItem>>>,
    failing: Vec<Rule<RetrievalError>>,
    scripted_failures: Arc<Mutex<VecDeque<RetrievalError>>>,
    always_fail: Option<RetrievalError>,
    calls: Arc<Mutex<Vec<RecordedSearch>>>,
}

impl MockRetrievalService {
    /// Creates a mock that answers instantly with generated items.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latency for every call without a more specific rule.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.default_latency = latency;
        self
    }

    /// Latency for calls whose query contains `pattern`.
    pub fn with_latency_for(mut self, pattern: impl Into<String>, latency: Duration) -> Self {
        self.latencies.push(Rule {
            pattern: pattern.into(),
            value: latency,
        });
        self
    }

    /// Fixed catalog for queries containing `pattern`; the first `top_k` are returned.
    pub fn with_catalog_for(mut self, pattern: impl Into<String>, items: Vec<RetrievedItem>) -> Self {
        self.catalogs.push(Rule {
            pattern: pattern.into(),
            value: items,
        });
        self
    }

    /// Every call whose query contains `pattern` fails with `error`.
    pub fn failing_for(mut self, pattern: impl Into<String>, error: RetrievalError) -> Self {
        self.failing.push(Rule {
            pattern: pattern.into(),
            value: error,
        });
        self
    }

    /// The next `n` calls fail with `error`, then calls succeed.
    pub fn failing_first(self, n: usize, error: RetrievalError) -> Self {
        {
            let mut scripted = self.scripted_failures.lock().unwrap();
            for _ in 0..n {
                scripted.push_back(error.clone());
            }
        }
        self
    }

    /// Every call fails with `error`.
    pub fn always_failing(mut self, error: RetrievalError) -> Self {
        self.always_fail = Some(error);
        self
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<RecordedSearch> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls whose query contains `pattern`.
    pub fn calls_matching(&self, pattern: &str) -> Vec<RecordedSearch> {
        self.calls()
            .into_iter()
            .filter(|c| c.request.query.contains(pattern))
            .collect()
    }

    fn latency_for(&self, query: &str) -> Duration {
        self.latencies
            .iter()
            .find(|r| query.contains(&r.pattern))
            .map(|r| r.value)
            .unwrap_or(self.default_latency)
    }

    fn failure_for(&self, query: &str) -> Option<RetrievalError> {
        if let Some(err) = self.scripted_failures.lock().unwrap().pop_front() {
            return Some(err);
        }
        if let Some(err) = &self.always_fail {
            return Some(err.clone());
        }
        self.failing
            .iter()
            .find(|r| query.contains(&r.pattern))
            .map(|r| r.value.clone())
    }

    fn items_for(&self, request: &SearchRequest) -> Vec<RetrievedItem> {
        match self.catalogs.iter().find(|r| request.query.contains(&r.pattern)) {
            Some(rule) => rule.value.iter().take(request.top_k).cloned().collect(),
            None => (1..=request.top_k)
                .map(|n| {
                    RetrievedItem::new(
                        format!("{} #{}", request.query, n),
                        "제주특별자치도",
                        format!("{}에 대한 검색 결과 {}", request.query, n),
                    )
                })
                .collect(),
        }
    }
}

#[async_trait]
impl RetrievalService for MockRetrievalService {
    async fn search(
        &self,
        request: &SearchRequest,
        read_timeout: Duration,
    ) -> Result<SearchResponse, RetrievalError> {
        self.calls.lock().unwrap().push(RecordedSearch {
            request: request.clone(),
            read_timeout,
            started_at: Instant::now(),
        });

        let latency = self.latency_for(&request.query);
        if latency > read_timeout {
            sleep(read_timeout).await;
            return Err(RetrievalError::ReadTimeout {
                timeout_secs: read_timeout.as_secs(),
            });
        }
        if !latency.is_zero() {
            sleep(latency).await;
        }

        if let Some(err) = self.failure_for(&request.query) {
            return Err(err);
        }

        Ok(SearchResponse {
            items: self.items_for(request),
            processing_time: Some(latency),
        })
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generates_top_k_items() {
        let service = MockRetrievalService::new();
        let response = service
            .search(&SearchRequest::new("제주 숙소", 3), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(response.items.len(), 3);
        assert_eq!(response.items[0].name, "제주 숙소 #1");
        assert_eq!(service.call_count(), 1);
    }

    #[tokio::test]
    async fn catalog_is_truncated_to_top_k() {
        let catalog = (1..=5).map(|n| RetrievedItem::new(format!("item {}", n), "", "")).collect();
        let service = MockRetrievalService::new().with_catalog_for("맛집", catalog);
        let response = service
            .search(&SearchRequest::new("서귀포 맛집", 2), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(
            response.items.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
            vec!["item 1", "item 2"]
        );
    }

    #[tokio::test]
    async fn scripted_failures_run_out() {
        let service =
            MockRetrievalService::new().failing_first(1, RetrievalError::Status { status: 500 });
        let request = SearchRequest::new("q", 1);
        assert!(service.search(&request, Duration::from_secs(1)).await.is_err());
        assert!(service.search(&request, Duration::from_secs(1)).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn latency_beyond_timeout_is_a_read_timeout() {
        let service = MockRetrievalService::new().with_latency(Duration::from_secs(120));
        let started = Instant::now();
        let err = service
            .search(&SearchRequest::new("q", 1), Duration::from_secs(90))
            .await
            .unwrap_err();
        assert_eq!(err, RetrievalError::ReadTimeout { timeout_secs: 90 });
        assert_eq!(started.elapsed(), Duration::from_secs(90));
    }

    #[tokio::test(start_paused = true)]
    async fn pattern_latency_overrides_default() {
        let service = MockRetrievalService::new()
            .with_latency(Duration::from_secs(1))
            .with_latency_for("축제", Duration::from_secs(4));
        let started = Instant::now();
        service
            .search(&SearchRequest::new("제주 축제", 1), Duration::from_secs(90))
            .await
            .unwrap();
        assert_eq!(started.elapsed(), Duration::from_secs(4));
    }
}
