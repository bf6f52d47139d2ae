//! Intake stage: reads messages, decodes them and hands users to the loader.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::consumer::messages::RawMessage;
use crate::errors::IngestError;
use crate::processor::UserProcessor;
use user_indexer_shared::User;

/// A consumer-group subscription as seen by the intake stage.
///
/// Implemented by `KafkaSubscription` and by in-memory mocks in tests.
#[async_trait]
pub trait Subscription: Send {
    /// Wait for the next message or client error.
    ///
    /// Returns `None` once the subscription will deliver nothing more.
    async fn recv(&mut self) -> Option<Result<RawMessage, IngestError>>;

    /// Mark `message` and everything before it on its partition as processed.
    fn commit_upto(&mut self, message: &RawMessage) -> Result<(), IngestError>;

    /// Leave the consumer group, flushing any pending commit first.
    async fn close(&mut self) -> Result<(), IngestError>;
}

/// Counters kept by the intake stage for the lifetime of the process.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IntakeStats {
    /// Messages received from the subscription.
    pub received: u64,
    /// Errors reported by the subscription.
    pub errors: u64,
}

/// The intake stage of the pipeline.
///
/// Owns the subscription. Every received message is decoded and sent on the handoff
/// channel; its offset is committed only once that send has completed.
pub struct IntakeStage<S> {
    subscription: S,
    processor: UserProcessor,
    stats: IntakeStats,
}

impl<S: Subscription> IntakeStage<S> {
    /// Create a new intake stage over a joined subscription.
    pub fn new(subscription: S, processor: UserProcessor) -> Self {
        Self {
            subscription,
            processor,
            stats: IntakeStats::default(),
        }
    }

    /// Run until `shutdown` is cancelled or the subscription ends.
    ///
    /// On shutdown the subscription is closed before `sender` is dropped, which closes
    /// the handoff channel and lets the loader drain. A decode failure or a closed
    /// channel returns an error immediately without closing the subscription.
    ///
    /// # Arguments
    ///
    /// * `sender` - Handoff channel to the loader
    /// * `shutdown` - Cancelled when the process receives an interrupt
    #[instrument(skip_all)]
    pub async fn run(
        mut self,
        sender: mpsc::Sender<User>,
        shutdown: CancellationToken,
    ) -> Result<IntakeStats, IngestError> {
        info!("Intake stage started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Intake received shutdown signal");
                    break;
                }
                event = self.subscription.recv() => {
                    match event {
                        Some(Ok(message)) => self.handle_message(message, &sender).await?,
                        Some(Err(e)) => {
                            self.stats.errors += 1;
                            error!(error = %e, "Error reading from topic");
                        }
                        None => {
                            info!("Subscription ended");
                            break;
                        }
                    }
                }
            }
        }

        Ok(self.shutdown(sender).await)
    }

    async fn handle_message(
        &mut self,
        message: RawMessage,
        sender: &mpsc::Sender<User>,
    ) -> Result<(), IngestError> {
        self.stats.received += 1;

        let user = self.processor.decode(message.payload_bytes()).map_err(|e| {
            error!(
                topic = %message.topic,
                partition = message.partition,
                offset = message.offset,
                error = %e,
                "Can't decode message from topic"
            );
            e
        })?;

        // Blocks while the channel is full, holding back the commit below
        sender
            .send(user)
            .await
            .map_err(|e| IngestError::ChannelError(e.to_string()))?;

        if let Err(e) = self.subscription.commit_upto(&message) {
            // The partition may have been revoked; its new owner re-reads from the last commit
            self.stats.errors += 1;
            warn!(
                topic = %message.topic,
                partition = message.partition,
                offset = message.offset,
                error = %e,
                "Failed to store offset"
            );
        } else {
            debug!(
                partition = message.partition,
                offset = message.offset,
                "Stored offset"
            );
        }

        Ok(())
    }

    async fn shutdown(mut self, sender: mpsc::Sender<User>) -> IntakeStats {
        info!("Start consumer closing");
        if let Err(e) = self.subscription.close().await {
            self.stats.errors += 1;
            error!(error = %e, "Failed to close consumer cleanly");
        } else {
            info!("Consumer closed");
        }

        drop(sender);

        info!(
            received = self.stats.received,
            errors = self.stats.errors,
            "Intake stage stopped"
        );
        self.stats
    }
}
