//! # User Indexer
//!
//! Consumes user records from a Kafka topic and bulk-indexes them into OpenSearch.
//!
//! ## Architecture
//!
//! The indexer follows the Consumer-Processor-Loader pattern:
//!
//! 1. **Consumer**: Receives messages from Kafka and hands decoded users to the loader
//! 2. **Processor**: Decodes message payloads into users
//! 3. **Loader**: Batches users and writes them with bulk requests
//! 4. **Orchestrator**: Runs consumer and loader as two tasks joined by a bounded channel
//!
//! ## Modules
//!
//! - [`config`]: Configuration and dependency initialization
//! - [`consumer`]: Intake stage and the Kafka subscription
//! - [`processor`]: Decodes and normalizes user records
//! - [`loader`]: Bulk indexer
//! - [`orchestrator`]: Task supervision and shutdown
//! - [`errors`]: Error types for the pipeline

pub mod config;
pub mod consumer;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;

pub use config::{Dependencies, IndexerConfig};
pub use errors::IngestError;

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Could not reach the search cluster or join the consumer group.
    #[error("Connection error: {0}")]
    ConnectError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] IngestError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a connection error.
    pub fn connect(msg: impl Into<String>) -> Self {
        Self::ConnectError(msg.into())
    }
}
