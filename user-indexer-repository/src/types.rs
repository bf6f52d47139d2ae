//! Request and response types for search index operations.

use serde_json::Value;

/// Request to index one document, keyed by its document ID.
///
/// Indexing a document whose ID already exists replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDocumentRequest {
    /// The document's unique identifier in the index.
    pub document_id: String,
    /// The document body.
    pub document: Value,
}

impl IndexDocumentRequest {
    pub fn new(document_id: impl Into<String>, document: Value) -> Self {
        Self {
            document_id: document_id.into(),
            document,
        }
    }
}

/// Result of a batch operation for a single document.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOperationResult {
    /// The document's unique identifier.
    pub document_id: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error reported by the backend if the operation failed.
    pub error: Option<String>,
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// A bulk request can be accepted as a whole while individual documents inside it are
/// rejected; callers decide how to treat `failed > 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOperationSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Build a summary in which every request succeeded.
    pub fn all_succeeded(requests: &[IndexDocumentRequest]) -> Self {
        Self {
            total: requests.len(),
            succeeded: requests.len(),
            failed: 0,
            results: requests
                .iter()
                .map(|r| BatchOperationResult {
                    document_id: r.document_id.clone(),
                    success: true,
                    error: None,
                })
                .collect(),
        }
    }

    /// Iterate over the failed results.
    pub fn failures(&self) -> impl Iterator<Item = &BatchOperationResult> {
        self.results.iter().filter(|r| !r.success)
    }
}
