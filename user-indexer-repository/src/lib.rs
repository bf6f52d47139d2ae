//! # User Indexer Repository
//!
//! This crate provides the trait and the OpenSearch implementation used by the user
//! indexer to check and create the target index and to issue bulk writes.

pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;
pub mod utils;

pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchProvider;
pub use types::{BatchOperationResult, BatchOperationSummary, IndexDocumentRequest};
pub use utils::{parse_node_urls, summarize_bulk_response};
