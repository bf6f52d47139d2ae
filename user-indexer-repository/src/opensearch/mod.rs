//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch as the backend, plus the mapping of the users index.

mod connection_pool;
mod index_config;
mod provider;

pub use connection_pool::RoundRobinConnectionPool;
pub use index_config::{get_index_settings, DEFAULT_INDEX_NAME};
pub use provider::OpenSearchProvider;
