//! Error types for the user indexer pipeline.

use thiserror::Error;

/// Errors that can occur in the user indexer pipeline.
///
/// Every variant except `ConsumerError` is fatal: it is returned up to the orchestrator,
/// which stops the pipeline and hands the error to `main`.
#[derive(Error, Debug)]
pub enum IngestError {
    /// A message payload could not be decoded into a user record.
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Error reported by the message log client.
    #[error("Consumer error: {0}")]
    ConsumerError(String),

    /// A bulk write to the search index failed.
    #[error("Bulk write error: {0}")]
    BulkWriteError(String),

    /// The target index could not be checked or created.
    #[error("Index setup error: {0}")]
    IndexSetupError(String),

    /// Channel communication error.
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// A pipeline task panicked or was cancelled.
    #[error("Task error: {0}")]
    TaskError(String),
}

impl IngestError {
    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }

    /// Create a consumer error.
    pub fn consumer(msg: impl Into<String>) -> Self {
        Self::ConsumerError(msg.into())
    }

    /// Create a bulk write error.
    pub fn bulk_write(msg: impl Into<String>) -> Self {
        Self::BulkWriteError(msg.into())
    }

    /// Create an index setup error.
    pub fn index_setup(msg: impl Into<String>) -> Self {
        Self::IndexSetupError(msg.into())
    }
}

impl From<rdkafka::error::KafkaError> for IngestError {
    fn from(err: rdkafka::error::KafkaError) -> Self {
        Self::ConsumerError(err.to_string())
    }
}
