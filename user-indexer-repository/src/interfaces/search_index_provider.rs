//! Search index provider trait definition.
//!
//! This module defines the abstract interface the bulk indexer writes through,
//! allowing for different backend implementations and for mocks in tests.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::{BatchOperationSummary, IndexDocumentRequest};

/// Abstracts the underlying search index implementation.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// backend implementations.
///
/// # Note on Document Writes
///
/// There is no separate update call. Bulk writes use index actions keyed by document ID,
/// so writing the same record twice replaces the earlier document (upsert semantics).
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Check whether an index with the given name exists.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the index exists
    /// * `Ok(false)` - If the backend reports the index as missing
    /// * `Err(SearchIndexError)` - If the check itself fails
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError>;

    /// Create an index with the given settings and mappings body.
    async fn create_index(&self, index: &str, body: Value) -> Result<(), SearchIndexError>;

    /// Write a batch of documents in a single bulk request.
    ///
    /// The whole request either reaches the backend or fails as one unit. Per-document
    /// outcomes reported by the backend are returned in the summary.
    ///
    /// # Arguments
    ///
    /// * `index` - Target index name
    /// * `requests` - Documents to index, in order
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Aggregate statistics and individual results
    /// * `Err(SearchIndexError)` - If the bulk request fails entirely
    async fn bulk_index(
        &self,
        index: &str,
        requests: &[IndexDocumentRequest],
    ) -> Result<BatchOperationSummary, SearchIndexError>;
}
