//! Loader module for the user indexer ingest.
//!
//! Batches users received from the intake stage and writes them into the search index
//! with bulk requests.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use crate::errors::IngestError;
use user_indexer_repository::opensearch::{get_index_settings, DEFAULT_INDEX_NAME};
use user_indexer_repository::{IndexDocumentRequest, SearchIndexProvider};
use user_indexer_shared::User;

/// Configuration for the search loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of users per bulk request.
    pub batch_size: usize,
    /// Index the users are written to.
    pub index_name: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            index_name: DEFAULT_INDEX_NAME.to_string(),
        }
    }
}

/// Counters reported by the loader when it stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoaderStats {
    /// Users received from the handoff channel.
    pub enqueued: usize,
    /// Bulk requests that completed successfully.
    pub bulk_writes: usize,
}

/// Loader that indexes users into the search engine.
///
/// The loader is responsible for:
/// - Creating the target index on startup if it is missing
/// - Batching users into bulk requests of at most `batch_size` documents
/// - Flushing the last partial batch once the handoff channel is closed
///
/// Any failed bulk request is fatal; the loader never retries or drops a batch.
pub struct SearchLoader {
    provider: Arc<dyn SearchIndexProvider>,
    config: LoaderConfig,
    pending: Vec<IndexDocumentRequest>,
    stats: LoaderStats,
}

impl SearchLoader {
    /// Create a new search loader with the given provider.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self::with_config(provider, LoaderConfig::default())
    }

    /// Create a new search loader with custom configuration.
    ///
    /// A `batch_size` of zero is treated as one.
    pub fn with_config(provider: Arc<dyn SearchIndexProvider>, mut config: LoaderConfig) -> Self {
        config.batch_size = config.batch_size.max(1);
        let batch_size = config.batch_size;
        Self {
            provider,
            config,
            pending: Vec::with_capacity(batch_size),
            stats: LoaderStats::default(),
        }
    }

    /// Make sure the target index exists, creating it with the users mapping if absent.
    #[instrument(skip(self), fields(index = %self.config.index_name))]
    pub async fn ensure_index(&self) -> Result<(), IngestError> {
        let index = &self.config.index_name;

        let exists = self.provider.index_exists(index).await.map_err(|e| {
            IngestError::index_setup(format!("Can't check if index {} exists: {}", index, e))
        })?;

        if exists {
            debug!("Index already exists");
            return Ok(());
        }

        info!("Index not found, creating it");
        self.provider
            .create_index(index, get_index_settings())
            .await
            .map_err(|e| IngestError::index_setup(format!("Can't create index {}: {}", index, e)))
    }

    /// Drain the handoff channel into the search index.
    ///
    /// Checks the index first, then loads users until every sender is dropped and the
    /// channel is empty, and finally flushes the partial batch.
    #[instrument(skip_all, fields(index = %self.config.index_name, batch_size = self.config.batch_size))]
    pub async fn run(mut self, mut receiver: mpsc::Receiver<User>) -> Result<LoaderStats, IngestError> {
        self.ensure_index().await?;
        info!("Ready to index users");

        while let Some(user) = receiver.recv().await {
            self.load(user).await?;
        }

        debug!(pending = self.pending.len(), "Handoff channel closed, draining");
        self.flush().await?;

        info!(
            enqueued = self.stats.enqueued,
            bulk_writes = self.stats.bulk_writes,
            "Loader stopped"
        );
        Ok(self.stats)
    }

    /// Add one user to the open batch.
    ///
    /// When the batch already holds `batch_size` users it is written first, so a batch
    /// never exceeds `batch_size` documents.
    pub async fn load(&mut self, user: User) -> Result<(), IngestError> {
        if self.stats.enqueued > 0 && self.stats.enqueued % self.config.batch_size == 0 {
            self.flush().await?;
        }

        let document = serde_json::to_value(&user).map_err(|e| {
            IngestError::bulk_write(format!("Can't serialize user {}: {}", user.pnum, e))
        })?;
        self.pending
            .push(IndexDocumentRequest::new(user.document_id(), document));
        self.stats.enqueued += 1;

        Ok(())
    }

    /// Write the open batch with one bulk request, if it holds any users.
    pub async fn flush(&mut self) -> Result<(), IngestError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let count = self.pending.len();
        let summary = self
            .provider
            .bulk_index(&self.config.index_name, &self.pending)
            .await
            .map_err(|e| {
                error!(error = %e, count = count, "Can't execute bulk");
                IngestError::bulk_write(format!("Failed to bulk index {} users: {}", count, e))
            })?;

        if summary.failed > 0 {
            for failure in summary.failures() {
                error!(
                    document_id = %failure.document_id,
                    error = failure.error.as_deref().unwrap_or("unknown"),
                    "Failed to index user"
                );
            }
            return Err(IngestError::bulk_write(format!(
                "{} of {} users were rejected by the bulk request",
                summary.failed, summary.total
            )));
        }

        self.pending.clear();
        self.stats.bulk_writes += 1;

        info!(
            batch_size = count,
            total_indexed = self.stats.enqueued,
            "Bulk of users indexed"
        );
        Ok(())
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> LoaderStats {
        self.stats
    }
}
