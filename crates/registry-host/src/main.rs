//! # IP Registry Host
//!
//! Runs the record registry against an in-memory store, one invocation per
//! stdin line.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from `IPR_*` environment variables
//! 2. Install the log subscriber (stderr; stdout carries responses only)
//! 3. Start the event logger
//! 4. Serve stdin until EOF
//!
//! ```text
//! stdin ──line──→ Host::handle_line ──→ RecordManager::invoke ──→ stdout
//!                                              │
//!                                              └──events──→ event logger (stderr)
//! ```

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use registry_host::{load_config, spawn_event_logger, Host};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = load_config();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;

    info!("===========================================");
    info!("  IP Registry Host v{}", ip_registry::VERSION);
    info!("===========================================");

    let host = Host::new(&config);
    let logger = spawn_event_logger(host.subscribe());

    host.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    let stats = host.stats();
    info!(
        invocations = stats.invocations,
        succeeded = stats.succeeded,
        failed = stats.failed,
        events = stats.events_emitted,
        "Shutting down"
    );

    // Dropping the host closes the bus, which ends the logger.
    drop(host);
    let logged = logger.await.context("Event logger panicked")?;
    info!(logged, "Event logger stopped");

    Ok(())
}
