//! User Indexer Main Entry Point
//!
//! Consumes user records from Kafka and bulk-indexes them into OpenSearch until
//! interrupted.

use dotenv::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use user_indexer::{Dependencies, IndexerConfig, IndexingError};

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), IndexingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("user_indexer=info,user_indexer_repository=info"));

    let json_logs = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| IndexingError::config(format!("Failed to init tracing: {}", e)))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init()
            .map_err(|e| IndexingError::config(format!("Failed to init tracing: {}", e)))?;
    }

    info!(
        service_name = "user-indexer",
        service_version = env!("CARGO_PKG_VERSION"),
        json = json_logs,
        "Tracing initialized"
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing()?;

    info!("Starting user indexer");

    let config = match IndexerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return Err(e);
        }
    };

    let deps = match Dependencies::new(&config).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let orchestrator = deps.orchestrator;
    if let Err(e) = orchestrator.listen_for_interrupt() {
        error!(error = %e, "Failed to install interrupt handler");
        return Err(IndexingError::config(format!(
            "Failed to install interrupt handler: {}",
            e
        )));
    }

    match orchestrator.run().await {
        Ok(summary) => {
            info!(
                received = summary.intake.received,
                errors = summary.intake.errors,
                "User indexer stopped"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "User indexer failed");
            Err(e.into())
        }
    }
}
