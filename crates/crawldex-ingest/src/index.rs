//! Index service adapter
//!
//! The pipeline only needs one capability from the search index: an
//! idempotent bulk upsert. [`BulkIndex`] abstracts that capability so tests
//! can substitute a fake service, and [`HttpIndexClient`] implements it
//! against an Elasticsearch-compatible `_bulk` endpoint.

use async_trait::async_trait;
use crawldex_common::{CrawldexError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

/// Default timeout for index requests in seconds.
/// Can be overridden via the CRAWLDEX_INDEX_TIMEOUT_SECS environment variable.
pub const DEFAULT_INDEX_TIMEOUT_SECS: u64 = 300;

/// Default index service URL when not specified via environment variable.
pub const DEFAULT_INDEX_URL: &str = "http://localhost:9200";

/// One upsert action: a document payload keyed by its stable identifier.
///
/// Submitting the same id twice overwrites the earlier document, which is
/// what makes pipeline re-runs idempotent.
#[derive(Debug, Clone)]
pub struct UpsertAction {
    pub id: String,
    pub doc: Value,
}

/// Bulk upsert capability of the index service.
///
/// Implementations are injected into the pipeline; the production
/// implementation is [`HttpIndexClient`], tests use in-memory fakes.
#[async_trait]
pub trait BulkIndex: Send + Sync {
    /// Submit one ordered batch of upserts to `index`.
    ///
    /// Returns the number of actions the service reports as successfully
    /// applied. A count lower than `actions.len()` means a partial failure;
    /// the caller decides how to react. Transport-level failures are
    /// returned as errors.
    async fn bulk_upsert(&self, index: &str, actions: &[UpsertAction]) -> Result<usize>;
}

/// HTTP client for an Elasticsearch-compatible index service
pub struct HttpIndexClient {
    client: Client,
    base_url: String,
}

impl HttpIndexClient {
    /// Create a new index client
    pub fn new(base_url: String) -> Result<Self> {
        let timeout_secs = std::env::var("CRAWLDEX_INDEX_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_INDEX_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CrawldexError::config(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("CRAWLDEX_INDEX_URL")
            .unwrap_or_else(|_| DEFAULT_INDEX_URL.to_string());

        Self::new(base_url)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Render a batch as `_bulk` NDJSON: one metadata line and one payload
    /// line per action.
    fn bulk_body(index: &str, actions: &[UpsertAction]) -> Result<String> {
        let mut body = String::new();
        for action in actions {
            let meta = json!({ "index": { "_index": index, "_id": action.id } });
            body.push_str(&meta.to_string());
            body.push('\n');
            body.push_str(&serde_json::to_string(&action.doc)?);
            body.push('\n');
        }
        Ok(body)
    }
}

#[async_trait]
impl BulkIndex for HttpIndexClient {
    async fn bulk_upsert(&self, index: &str, actions: &[UpsertAction]) -> Result<usize> {
        let url = format!("{}/_bulk", self.base_url);
        let body = Self::bulk_body(index, actions)?;

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/x-ndjson")
            .body(body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CrawldexError::network(e.to_string()))?;

        let bulk: BulkResponse = response
            .json()
            .await
            .map_err(|e| CrawldexError::network(e.to_string()))?;

        Ok(bulk.accepted_count())
    }
}

/// `_bulk` response body: per-item outcomes keyed by operation type
#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    items: Vec<HashMap<String, BulkItemOutcome>>,
}

#[derive(Debug, Deserialize)]
struct BulkItemOutcome {
    status: u16,
}

impl BulkResponse {
    fn accepted_count(&self) -> usize {
        self.items
            .iter()
            .filter_map(|item| item.values().next())
            .filter(|outcome| outcome.status < 300)
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpIndexClient::new("http://localhost:9200".to_string()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9200");
    }

    #[test]
    fn test_bulk_body_shape() {
        let actions = vec![
            UpsertAction {
                id: "a".to_string(),
                doc: json!({"title": "x"}),
            },
            UpsertAction {
                id: "b".to_string(),
                doc: json!({"title": "y"}),
            },
        ];

        let body = HttpIndexClient::bulk_body("crawl-index", &actions).unwrap();
        let lines: Vec<_> = body.lines().collect();

        assert_eq!(lines.len(), 4);
        let meta: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(meta["index"]["_index"], "crawl-index");
        assert_eq!(meta["index"]["_id"], "a");
        assert_eq!(lines[1], "{\"title\":\"x\"}");
        assert!(body.ends_with('\n'));
    }

    #[test]
    fn test_accepted_count_from_item_statuses() {
        let bulk: BulkResponse = serde_json::from_value(json!({
            "took": 3,
            "errors": true,
            "items": [
                { "index": { "_id": "a", "status": 201 } },
                { "index": { "_id": "b", "status": 200 } },
                { "index": { "_id": "c", "status": 429 } }
            ]
        }))
        .unwrap();

        assert_eq!(bulk.accepted_count(), 2);
    }

    #[test]
    fn test_accepted_count_empty_response() {
        let bulk: BulkResponse = serde_json::from_value(json!({ "took": 0 })).unwrap();
        assert_eq!(bulk.accepted_count(), 0);
    }
}
