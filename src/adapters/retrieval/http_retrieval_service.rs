//! HTTP Retrieval Service - talks to the retrieval server's `/chat` endpoint.
//!
//! One `reqwest::Client` is built up front and shared by every call, so the
//! connection pool is reused across categories, batches and turns. Connect
//! timeout is fixed on the client; each call supplies its own read timeout.
//!
//! # Configuration
//!
//! ```ignore
//! let service = HttpRetrievalService::new(
//!     HttpRetrievalConfig::new("http://localhost:8002/chat")
//!         .with_connect_timeout(Duration::from_secs(10)),
//! )?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::retrieval::RetrievedItem;
use crate::ports::{RetrievalError, RetrievalService, SearchRequest, SearchResponse};

/// Configuration for the HTTP retrieval adapter.
#[derive(Debug, Clone)]
pub struct HttpRetrievalConfig {
    /// Full URL of the search endpoint.
    pub url: String,
    /// Fixed connect timeout.
    pub connect_timeout: Duration,
    /// Idle connections kept per host.
    pub pool_max_idle_per_host: usize,
    /// How long idle pooled connections are kept.
    pub pool_idle_timeout: Duration,
}

impl HttpRetrievalConfig {
    /// Creates a configuration for the given endpoint with short fixed timeouts.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }

    /// Sets the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the idle pool size per host.
    pub fn with_pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }
}

/// Retrieval service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRetrievalService {
    config: HttpRetrievalConfig,
    client: Client,
}

impl HttpRetrievalService {
    /// Builds the shared client.
    pub fn new(config: HttpRetrievalConfig) -> Result<Self, RetrievalError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .build()
            .map_err(|e| RetrievalError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn map_transport_error(&self, err: reqwest::Error, read_timeout: Duration) -> RetrievalError {
        if err.is_connect() {
            if err.is_timeout() {
                RetrievalError::ConnectTimeout
            } else {
                RetrievalError::Network(format!("connection failed: {}", err))
            }
        } else if err.is_timeout() {
            RetrievalError::ReadTimeout {
                timeout_secs: read_timeout.as_secs(),
            }
        } else if err.is_decode() {
            RetrievalError::Parse(err.to_string())
        } else {
            RetrievalError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl RetrievalService for HttpRetrievalService {
    async fn search(
        &self,
        request: &SearchRequest,
        read_timeout: Duration,
    ) -> Result<SearchResponse, RetrievalError> {
        let response = self
            .client
            .post(&self.config.url)
            .timeout(read_timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e, read_timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::Status {
                status: status.as_u16(),
            });
        }

        let body: WireResponse = response
            .json()
            .await
            .map_err(|e| self.map_transport_error(e, read_timeout))?;

        Ok(SearchResponse {
            items: body.sources.into_iter().map(WireSource::into_item).collect(),
            processing_time: body
                .processing_time
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .map(Duration::from_secs_f64),
        })
    }

    fn describe(&self) -> String {
        self.config.url.clone()
    }
}

// ----- Wire Types -----

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    sources: Vec<WireSource>,
    #[serde(default)]
    processing_time: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireSource {
    #[serde(default)]
    name: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    content: String,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl WireSource {
    fn into_item(self) -> RetrievedItem {
        let metadata = if self.extra.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::Value::Object(self.extra)
        };
        RetrievedItem::new(self.name, self.address, self.content).with_metadata(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn service_for(server: &MockServer) -> HttpRetrievalService {
        HttpRetrievalService::new(HttpRetrievalConfig::new(format!("{}/chat", server.uri())))
            .unwrap()
    }

    #[tokio::test]
    async fn parses_sources_and_keeps_extra_fields_as_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sources": [
                    {"name": "협재해수욕장", "address": "제주시 한림읍", "content": "에메랄드빛 바다", "score": 0.91},
                    {"name": "금능해수욕장", "address": "제주시 한림읍", "content": "얕은 수심"}
                ],
                "processing_time": 1.25
            })))
            .mount(&server)
            .await;

        let service = service_for(&server).await;
        let response = service
            .search(&SearchRequest::new("제주 서쪽 해변", 2), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[0].name, "협재해수욕장");
        assert_eq!(response.items[0].description, "에메랄드빛 바다");
        assert_eq!(response.items[0].metadata["score"], 0.91);
        assert!(response.items[1].metadata.is_null());
        assert_eq!(response.processing_time, Some(Duration::from_millis(1250)));
    }

    #[tokio::test]
    async fn sends_mmr_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "query": "제주 맛집 추천",
                "top_k": 7,
                "search_type": "mmr",
                "diversity_lambda": 0.5
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sources": []})))
            .expect(1)
            .mount(&server)
            .await;

        let service = service_for(&server).await;
        let request = SearchRequest::new("제주 맛집 추천", 7).with_diversity(0.5);
        let response = service.search(&request, Duration::from_secs(5)).await.unwrap();
        assert!(response.items.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let service = service_for(&server).await;
        let err = service
            .search(&SearchRequest::new("q", 1), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(err, RetrievalError::Status { status: 503 });
    }

    #[tokio::test]
    async fn slow_response_is_a_read_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"sources": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let service = service_for(&server).await;
        let err = service
            .search(&SearchRequest::new("q", 1), Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::ReadTimeout { .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let service = service_for(&server).await;
        let err = service
            .search(&SearchRequest::new("q", 1), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::Parse(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let service = HttpRetrievalService::new(HttpRetrievalConfig::new("http://127.0.0.1:9/chat"))
            .unwrap();
        let err = service
            .search(&SearchRequest::new("q", 1), Duration::from_secs(2))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RetrievalError::Network(_) | RetrievalError::ConnectTimeout
        ));
    }

    #[test]
    fn describe_is_the_endpoint() {
        let service =
            HttpRetrievalService::new(HttpRetrievalConfig::new("http://rag:8002/chat")).unwrap();
        assert_eq!(service.describe(), "http://rag:8002/chat");
    }
}
