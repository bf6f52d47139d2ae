//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    http::transport::TransportBuilder,
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkOperation, BulkParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::connection_pool::RoundRobinConnectionPool;
use crate::types::{BatchOperationSummary, IndexDocumentRequest};
use crate::utils;

/// OpenSearch provider implementation.
///
/// # Example
///
/// ```ignore
/// use user_indexer_repository::{IndexDocumentRequest, OpenSearchProvider, SearchIndexProvider};
///
/// let provider = OpenSearchProvider::new(&["http://localhost:9200".to_string()]).await?;
/// provider.ping().await?;
///
/// let request = IndexDocumentRequest::new("42", serde_json::json!({ "pnum": 42 }));
/// provider.bulk_index("users", &[request]).await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider for the given node URLs.
    ///
    /// Requests rotate over every node through a round-robin connection pool.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the URLs are invalid or the transport cannot be built
    pub async fn new(urls: &[String]) -> Result<Self, SearchIndexError> {
        let nodes = utils::parse_node_urls(urls)?;
        let node_list: Vec<String> = nodes.iter().map(Url::to_string).collect();

        let conn_pool = RoundRobinConnectionPool::new(nodes)?;
        let node_count = conn_pool.len();
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(nodes = ?node_list, node_count = node_count, "Created OpenSearch provider");

        Ok(Self { client })
    }

    /// Verify that the cluster is reachable.
    pub async fn ping(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            return Err(SearchIndexError::connection(format!(
                "Ping failed with status {}",
                status
            )));
        }

        debug!("OpenSearch cluster is reachable");
        Ok(())
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_check(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => {
                let error_body = response.text().await.unwrap_or_default();
                error!(status = status, body = %error_body, "Index exists request failed");
                Err(SearchIndexError::index_check(format!(
                    "Index exists check failed with status {}: {}",
                    status, error_body
                )))
            }
        }
    }

    async fn create_index(&self, index: &str, body: Value) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Create index request failed");
            return Err(SearchIndexError::index_creation(format!(
                "Create index failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = %index, "Index created");
        Ok(())
    }

    /// Write documents with a single `_bulk` request of index actions.
    ///
    /// Transport failures and non-2xx responses fail the whole call. Per-item failures
    /// are returned in the summary for the caller to act on.
    async fn bulk_index(
        &self,
        index: &str,
        requests: &[IndexDocumentRequest],
    ) -> Result<BatchOperationSummary, SearchIndexError> {
        if requests.is_empty() {
            return Ok(BatchOperationSummary::all_succeeded(requests));
        }

        let body: Vec<BulkOperation<Value>> = requests
            .iter()
            .map(|request| {
                BulkOperation::from(
                    BulkOperation::index(request.document.clone())
                        .id(request.document_id.as_str()),
                )
            })
            .collect();

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchIndexError::bulk_index(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body = response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let summary = utils::summarize_bulk_response(requests, &response_body)?;

        debug!(
            index = %index,
            total = summary.total,
            failed = summary.failed,
            "Bulk request completed"
        );
        Ok(summary)
    }
}
