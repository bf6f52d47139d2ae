//! Orchestrator module for the user indexer ingest.
//!
//! Runs the intake stage and the loader as two tasks joined by a bounded channel and
//! decides how the pipeline ends.

use std::future::Future;
use std::io;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::consumer::{IntakeStage, IntakeStats, Subscription};
use crate::errors::IngestError;
use crate::loader::{LoaderStats, SearchLoader};
use user_indexer_shared::User;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Capacity of the handoff channel between intake and loader.
    ///
    /// When the channel is full the intake stage waits, which also delays offset commits.
    pub channel_capacity: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

/// Final counters of a pipeline run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSummary {
    pub intake: IntakeStats,
    pub loader: LoaderStats,
}

/// Orchestrator that coordinates the ingest components.
///
/// The orchestrator:
/// - Spawns the intake stage and the loader
/// - Owns the shutdown token observed by the intake stage
/// - Returns the first fatal error, stopping the other task
pub struct Orchestrator<S> {
    intake: IntakeStage<S>,
    loader: SearchLoader,
    config: OrchestratorConfig,
    shutdown: CancellationToken,
}

impl<S: Subscription + 'static> Orchestrator<S> {
    /// Create a new orchestrator with the given components.
    pub fn new(intake: IntakeStage<S>, loader: SearchLoader) -> Self {
        Self::with_config(intake, loader, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        intake: IntakeStage<S>,
        loader: SearchLoader,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            intake,
            loader,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that stops the intake stage when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Cancel the shutdown token on the first interrupt signal (SIGINT / ctrl-c).
    ///
    /// The signal handler is installed before this returns, so an interrupt that arrives
    /// while the pipeline is starting still shuts it down gracefully.
    pub fn listen_for_interrupt(&self) -> io::Result<JoinHandle<()>> {
        cancel_on_interrupt(self.shutdown.clone())
    }

    /// Run the pipeline until the intake stage stops and the loader has drained.
    ///
    /// A graceful run ends with the intake stage closing the handoff channel after the
    /// shutdown token is cancelled. If either task fails, the other one is aborted and
    /// the error is returned.
    #[instrument(skip(self), fields(channel_capacity = self.config.channel_capacity))]
    pub async fn run(self) -> Result<PipelineSummary, IngestError> {
        info!("Starting user indexer orchestrator");

        let (sender, receiver) = mpsc::channel::<User>(self.config.channel_capacity.max(1));

        let mut loader_handle = tokio::spawn(self.loader.run(receiver));
        let mut intake_handle = tokio::spawn(self.intake.run(sender, self.shutdown.clone()));

        let summary = tokio::select! {
            result = &mut intake_handle => {
                match flatten(result) {
                    Ok(intake) => {
                        let loader = flatten(loader_handle.await)?;
                        PipelineSummary { intake, loader }
                    }
                    Err(IngestError::ChannelError(msg)) => {
                        // The loader dropped its receiver; its own error is the cause
                        return match flatten(loader_handle.await) {
                            Err(e) => Err(e),
                            Ok(_) => Err(IngestError::ChannelError(msg)),
                        };
                    }
                    Err(e) => {
                        loader_handle.abort();
                        return Err(e);
                    }
                }
            }
            result = &mut loader_handle => {
                match flatten(result) {
                    Ok(loader) => {
                        let intake = flatten(intake_handle.await)?;
                        PipelineSummary { intake, loader }
                    }
                    Err(e) => {
                        intake_handle.abort();
                        return Err(e);
                    }
                }
            }
        };

        info!(
            received = summary.intake.received,
            errors = summary.intake.errors,
            indexed = summary.loader.enqueued,
            bulk_writes = summary.loader.bulk_writes,
            "Orchestrator shutdown complete"
        );
        Ok(summary)
    }
}

/// Install a SIGINT handler now and cancel `shutdown` when the first signal arrives.
pub fn cancel_on_interrupt(shutdown: CancellationToken) -> io::Result<JoinHandle<()>> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    Ok(cancel_on(shutdown, async move {
        if interrupt.recv().await.is_some() {
            info!("Received shutdown signal");
        }
    }))
}

/// Cancel `shutdown` once `trigger` completes.
///
/// The spawned task ends early if the token is cancelled by someone else.
pub fn cancel_on<F>(shutdown: CancellationToken, trigger: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::select! {
            _ = trigger => shutdown.cancel(),
            _ = shutdown.cancelled() => {}
        }
    })
}

fn flatten<T>(result: Result<Result<T, IngestError>, JoinError>) -> Result<T, IngestError> {
    result.map_err(|e| IngestError::TaskError(e.to_string()))?
}
