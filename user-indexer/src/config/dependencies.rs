//! Dependency initialization and wiring for the user indexer.

use std::sync::Arc;
use tracing::info;

use crate::config::IndexerConfig;
use crate::consumer::{IntakeStage, KafkaSubscription};
use crate::loader::{LoaderConfig, SearchLoader};
use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::processor::UserProcessor;
use crate::IndexingError;
use user_indexer_repository::OpenSearchProvider;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator<KafkaSubscription>,
}

impl Dependencies {
    /// Connect to OpenSearch and Kafka and wire the pipeline.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError::ConnectError)` - If OpenSearch is unreachable or the consumer
    ///   group cannot be joined
    pub async fn new(config: &IndexerConfig) -> Result<Self, IndexingError> {
        info!(
            kafka_brokers = %config.kafka_brokers,
            kafka_topic = %config.kafka_topic,
            kafka_group_id = %config.kafka_group_id,
            opensearch_urls = ?config.opensearch_urls,
            index_name = %config.index_name,
            bulk_size = config.bulk_size,
            channel_capacity = config.channel_capacity,
            "Initializing dependencies"
        );

        let search_provider = OpenSearchProvider::new(&config.opensearch_urls)
            .await
            .map_err(|e| {
                IndexingError::connect(format!("Failed to create OpenSearch provider: {}", e))
            })?;

        search_provider
            .ping()
            .await
            .map_err(|e| IndexingError::connect(format!("Failed to reach OpenSearch: {}", e)))?;

        info!("OpenSearch connection established");

        let subscription = KafkaSubscription::join(
            &config.kafka_brokers,
            &config.kafka_group_id,
            &config.kafka_topic,
            config.commit_interval,
        )
        .map_err(|e| IndexingError::connect(format!("Failed to join consumer group: {}", e)))?;

        let intake = IntakeStage::new(subscription, UserProcessor::new());

        let loader = SearchLoader::with_config(
            Arc::new(search_provider),
            LoaderConfig {
                batch_size: config.bulk_size,
                index_name: config.index_name.clone(),
            },
        );

        let orchestrator = Orchestrator::with_config(
            intake,
            loader,
            OrchestratorConfig {
                channel_capacity: config.channel_capacity,
            },
        );

        Ok(Self { orchestrator })
    }
}
