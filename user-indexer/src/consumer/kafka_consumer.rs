//! Kafka subscription for the user indexer.
//!
//! Joins the consumer group, yields messages to the intake stage and stores offsets
//! once the intake stage has handed a record off.

use async_trait::async_trait;
use rdkafka::{
    config::ClientConfig,
    consumer::{CommitMode, Consumer, StreamConsumer},
    error::{KafkaError, RDKafkaErrorCode},
    Offset, TopicPartitionList,
};
use std::time::Duration;
use tracing::{debug, info};

use crate::consumer::intake::Subscription;
use crate::consumer::messages::RawMessage;
use crate::errors::IngestError;

/// Consumer-group subscription to a single Kafka topic.
///
/// Offsets are never committed directly by the application. `commit_upto` stores the
/// next offset of a handed-off message and the client's background committer flushes
/// stored offsets every commit interval.
pub struct KafkaSubscription {
    consumer: StreamConsumer,
    topic: String,
}

impl KafkaSubscription {
    /// Join a consumer group and subscribe to `topic`.
    ///
    /// # Arguments
    ///
    /// * `brokers` - Kafka broker addresses (comma-separated)
    /// * `group_id` - Consumer group ID
    /// * `topic` - Topic carrying user records
    /// * `commit_interval` - Interval of the background offset commit
    ///
    /// # Returns
    ///
    /// * `Ok(KafkaSubscription)` - A subscribed consumer
    /// * `Err(IngestError)` - If the consumer cannot be created or subscribed
    pub fn join(
        brokers: &str,
        group_id: &str,
        topic: &str,
        commit_interval: Duration,
    ) -> Result<Self, IngestError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "true")
            .set(
                "auto.commit.interval.ms",
                commit_interval.as_millis().to_string(),
            )
            .set("enable.auto.offset.store", "false")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "6000")
            .create()?;

        consumer.subscribe(&[topic])?;

        info!(
            brokers = %brokers,
            group_id = %group_id,
            topic = %topic,
            commit_interval_ms = commit_interval.as_millis() as u64,
            "Joined Kafka consumer group"
        );

        Ok(Self {
            consumer,
            topic: topic.to_string(),
        })
    }
}

#[async_trait]
impl Subscription for KafkaSubscription {
    async fn recv(&mut self) -> Option<Result<RawMessage, IngestError>> {
        // The stream consumer never ends on its own, so this always yields Some
        match self.consumer.recv().await {
            Ok(msg) => Some(Ok(RawMessage::from(&msg))),
            Err(e) => Some(Err(e.into())),
        }
    }

    fn commit_upto(&mut self, message: &RawMessage) -> Result<(), IngestError> {
        let mut tpl = TopicPartitionList::new();
        tpl.add_partition_offset(
            &message.topic,
            message.partition,
            Offset::Offset(message.offset + 1),
        )?;
        self.consumer.store_offsets(&tpl)?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), IngestError> {
        // Sync commit blocks this runtime worker until the broker answers; only runs once, at shutdown
        let commit_result = match self.consumer.commit_consumer_state(CommitMode::Sync) {
            Ok(()) => {
                debug!(topic = %self.topic, "Committed stored offsets");
                Ok(())
            }
            Err(KafkaError::ConsumerCommit(RDKafkaErrorCode::NoOffset)) => {
                debug!(topic = %self.topic, "No stored offsets to commit");
                Ok(())
            }
            Err(e) => Err(IngestError::from(e)),
        };

        self.consumer.unsubscribe();
        info!(topic = %self.topic, "Unsubscribed from Kafka topic");

        commit_result
    }
}
