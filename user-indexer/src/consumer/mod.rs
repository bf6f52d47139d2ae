//! Consumer module for the user indexer ingest.
//!
//! Provides the intake stage and the Kafka subscription it reads from.

mod intake;
mod kafka_consumer;
mod messages;

pub use intake::{IntakeStage, IntakeStats, Subscription};
pub use kafka_consumer::KafkaSubscription;
pub use messages::RawMessage;
