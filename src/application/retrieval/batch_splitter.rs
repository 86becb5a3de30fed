//! BatchSplitter - services large demands as several small retrievals.
//!
//! Demands up to `split_threshold` go out as one request. Larger demands
//! are split into sequential batches of `batch_size`. Each later batch
//! uses a lightly reworded query and results are deduplicated by name.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use super::client::RetrievalClient;
use crate::domain::retrieval::{CategoryRequest, CategoryResult, RetrievedItem};

/// Word in a query that batch perturbation rewrites.
const PERTURBED_WORD: &str = "추천";

/// Splitting policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPolicy {
    /// Largest demand served by a single request.
    pub split_threshold: usize,
    pub batch_size: usize,
    /// Pause between consecutive batches.
    pub inter_batch_delay: Duration,
    /// Batches after which half the demand is good enough.
    pub early_stop_min_batches: usize,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            split_threshold: 20,
            batch_size: 3,
            inter_batch_delay: Duration::from_secs(2),
            early_stop_min_batches: 3,
        }
    }
}

/// Query for batch `index` (0-based).
///
/// Batch 0 keeps the query, batch 1 asks for a list, later batches ask
/// for a best-N ranking.
pub fn perturb_query(query: &str, index: usize) -> String {
    match index {
        0 => query.to_string(),
        1 => query.replace(PERTURBED_WORD, "명소 리스트"),
        n => query.replace(PERTURBED_WORD, &format!("베스트 {}", n + 1)),
    }
}

/// Splits large demands into batches over a [`RetrievalClient`].
pub struct BatchSplitter {
    client: Arc<RetrievalClient>,
    policy: BatchPolicy,
}

impl BatchSplitter {
    pub fn new(client: Arc<RetrievalClient>, policy: BatchPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> &BatchPolicy {
        &self.policy
    }

    /// Fetches up to `request.count` distinct items for its category.
    pub async fn split_fetch(&self, request: &CategoryRequest) -> CategoryResult {
        let (category, query, total) = (request.category, request.query.as_str(), request.count);
        if total <= self.policy.split_threshold {
            return self.client.fetch(query, category, total).await.deduplicated();
        }

        let batch_size = self.policy.batch_size.max(1);
        let batches = total.div_ceil(batch_size);
        info!(%category, total, batches, batch_size, "splitting retrieval into batches");

        let mut accumulated: Vec<RetrievedItem> = Vec::with_capacity(total);
        for index in 0..batches {
            let wanted = batch_size.min(total - accumulated.len());
            let batch_query = perturb_query(query, index);
            let batch = self.client.fetch(&batch_query, category, wanted).await;

            let before = accumulated.len();
            for item in batch.items {
                if !accumulated.iter().any(|seen| seen.name == item.name) {
                    accumulated.push(item);
                }
            }
            debug!(
                %category,
                batch = index + 1,
                added = accumulated.len() - before,
                accumulated = accumulated.len(),
                "batch merged"
            );

            if accumulated.len() >= total {
                break;
            }
            if index + 1 >= self.policy.early_stop_min_batches && accumulated.len() >= total / 2 {
                info!(%category, accumulated = accumulated.len(), total, "stopping early");
                break;
            }
            if index + 1 < batches && !self.policy.inter_batch_delay.is_zero() {
                sleep(self.policy.inter_batch_delay).await;
            }
        }

        CategoryResult::new(category, accumulated).truncated(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::retrieval::MockRetrievalService;
    use crate::application::retrieval::RetryPolicy;
    use crate::domain::foundation::Category;
    use crate::ports::RetrievalError;
    use std::collections::HashSet;
    use tokio::time::Instant;

    fn splitter(service: &MockRetrievalService) -> BatchSplitter {
        let client = RetrievalClient::new(Arc::new(service.clone()), RetryPolicy::default());
        BatchSplitter::new(Arc::new(client), BatchPolicy::default())
    }

    fn item(name: &str) -> RetrievedItem {
        RetrievedItem::new(name, "제주", "")
    }

    #[test]
    fn perturbation_rewrites_recommendation_word() {
        assert_eq!(perturb_query("제주 맛집 추천", 0), "제주 맛집 추천");
        assert_eq!(perturb_query("제주 맛집 추천", 1), "제주 맛집 명소 리스트");
        assert_eq!(perturb_query("제주 맛집 추천", 2), "제주 맛집 베스트 3");
        assert_eq!(perturb_query("제주 맛집", 3), "제주 맛집");
    }

    #[tokio::test]
    async fn small_demand_is_one_call() {
        let service = MockRetrievalService::new();
        let result = splitter(&service)
            .split_fetch(&CategoryRequest::new(Category::Tour, "제주 관광지 추천", 20))
            .await;

        assert_eq!(result.len(), 20);
        assert_eq!(service.call_count(), 1);
        assert_eq!(service.calls()[0].request.top_k, 20);
    }

    #[tokio::test]
    async fn direct_path_removes_duplicates() {
        let service = MockRetrievalService::new()
            .with_catalog_for("맛집", vec![item("a"), item("b"), item("a")]);
        let result = splitter(&service)
            .split_fetch(&CategoryRequest::new(Category::Food, "맛집 추천", 3))
            .await;
        assert_eq!(result.names(), vec!["a", "b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn large_demand_is_batched_with_perturbed_queries() {
        let service = MockRetrievalService::new();
        let result = splitter(&service)
            .split_fetch(&CategoryRequest::new(Category::Tour, "제주 관광지 추천", 21))
            .await;

        let calls = service.calls();
        assert!(calls.len() > 1);
        assert!(calls.iter().all(|c| c.request.top_k == 3));
        assert_eq!(calls[0].request.query, "제주 관광지 추천");
        assert_eq!(calls[1].request.query, "제주 관광지 명소 리스트");
        assert_eq!(calls[2].request.query, "제주 관광지 베스트 3");
        assert_eq!(calls[1].started_at - calls[0].started_at, Duration::from_secs(2));

        let names: HashSet<_> = result.names().into_iter().collect();
        assert_eq!(names.len(), result.len());
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_names_across_batches_are_dropped() {
        let catalog = vec![item("성산일출봉"), item("우도"), item("만장굴")];
        let service = MockRetrievalService::new().with_catalog_for("관광지", catalog);

        let result = splitter(&service)
            .split_fetch(&CategoryRequest::new(Category::Tour, "관광지 추천", 24))
            .await;

        assert_eq!(result.names(), vec!["성산일출봉", "우도", "만장굴"]);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_early_once_half_is_in_after_three_batches() {
        let service = MockRetrievalService::new();

        let result = splitter(&service)
            .split_fetch(&CategoryRequest::new(Category::Food, "제주 맛집 추천", 22))
            .await;

        // 9 items after three batches is short of half; the fourth batch reaches 12.
        assert_eq!(service.call_count(), 4);
        assert_eq!(result.len(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_total_is_reached() {
        let service = MockRetrievalService::new();
        let splitter = BatchSplitter::new(
            Arc::new(RetrievalClient::new(
                Arc::new(service.clone()),
                RetryPolicy::default(),
            )),
            BatchPolicy {
                split_threshold: 4,
                batch_size: 3,
                inter_batch_delay: Duration::ZERO,
                early_stop_min_batches: 10,
            },
        );

        let result = splitter
            .split_fetch(&CategoryRequest::new(Category::Food, "제주 맛집 추천", 5))
            .await;

        assert_eq!(result.len(), 5);
        let calls = service.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].request.top_k, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn degraded_batches_return_fewer_items() {
        let service =
            MockRetrievalService::new().always_failing(RetrievalError::Status { status: 500 });
        let splitter = BatchSplitter::new(
            Arc::new(RetrievalClient::new(
                Arc::new(service.clone()),
                RetryPolicy {
                    max_retries: 1,
                    ..RetryPolicy::default()
                },
            )),
            BatchPolicy::default(),
        );
        let started = Instant::now();

        let result = splitter
            .split_fetch(&CategoryRequest::new(Category::Hotel, "q 추천", 21))
            .await;

        assert!(result.is_empty());
        assert_eq!(service.call_count(), 7);
        assert_eq!(started.elapsed(), Duration::from_secs(12));
    }
}
