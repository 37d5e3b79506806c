//! Collector entry point.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging and metrics
//! 2. Load configuration (defaults + environment) and validate it
//! 3. Bind the listener
//! 4. Serve until Ctrl+C

use anyhow::{Context, Result};
use collector_runtime::config::CollectorConfig;
use collector_runtime::CollectorRuntime;
use tracing::{error, info};
use wa_telemetry::TelemetryConfig;

#[tokio::main]
async fn main() -> Result<()> {
    wa_telemetry::init_telemetry(&TelemetryConfig::for_service("wa-collector"))
        .context("failed to initialize telemetry")?;

    let config = CollectorConfig::from_env();
    config.validate().context("invalid collector configuration")?;
    info!(
        window_secs = config.rate_limit.window_secs,
        max_submissions = config.rate_limit.max_submissions,
        device_binding = config.enforce_device_binding,
        "Configuration loaded"
    );

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let runtime = CollectorRuntime::new(config);
    info!("Collector is running. Press Ctrl+C to stop.");
    runtime
        .serve(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        })
        .await
}
