//! WA-Device: sign and submit weather readings from a sensor station.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use shared_types::{DeviceRegistration, SignedSubmission};
use tracing::{error, info, warn};

use wa_01_device_identity::{load_or_create, DeviceIdentity};
use wa_device::{load_reading, ApiError, CollectorClient};
use wa_telemetry::TelemetryConfig;

/// WA-Device: Weather-Attest device CLI
#[derive(Parser, Debug)]
#[command(name = "wa-device")]
#[command(about = "Manage a station identity and submit signed weather readings")]
struct Args {
    /// Collector base URL
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:8080")]
    backend: String,

    /// Key file, created on first use
    #[arg(long, env = "KEYS_PATH", default_value = "./device_keys.json")]
    keys: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load or create the station identity and print it
    Keygen,

    /// Register the station's public key with the collector
    Register {
        /// Location label sent with the registration
        #[arg(long, env = "DEVICE_LOCATION", default_value = "Unknown")]
        location: String,
    },

    /// Sign a reading and print the submission JSON
    Sign {
        /// Reading JSON file, or `-` for stdin
        #[arg(long)]
        reading: PathBuf,
    },

    /// Sign a reading and submit it
    Submit {
        /// Reading JSON file, or `-` for stdin
        #[arg(long)]
        reading: PathBuf,
    },

    /// Re-sign and submit a reading file on a fixed interval
    Run {
        /// Seconds between submissions
        #[arg(long, default_value = "300")]
        interval: u64,

        /// Reading JSON file, re-read on every tick
        #[arg(long)]
        reading: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    wa_telemetry::init_logging(&TelemetryConfig::for_service("wa-device"))
        .context("failed to initialize logging")?;

    let identity = load_or_create(&args.keys)
        .with_context(|| format!("failed to load identity from {}", args.keys.display()))?;

    match args.command {
        Command::Keygen => {
            let out = serde_json::json!({
                "device_id": identity.device_id().to_hex(),
                "public_key": identity.public_key().to_hex(),
                "keys_path": args.keys.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Register { location } => {
            let client = CollectorClient::new(&args.backend)?;
            let registration = DeviceRegistration {
                device_id: identity.device_id().to_hex(),
                public_key: identity.public_key().to_hex(),
                location,
            };
            let response = client
                .register(&registration)
                .await
                .context("registration failed")?;
            info!(device_id = %response.device_id, status = %response.status, "Registered");
        }
        Command::Sign { reading } => {
            let submission = sign_file(&identity, &reading, false)?;
            println!("{}", serde_json::to_string_pretty(&submission)?);
        }
        Command::Submit { reading } => {
            let client = CollectorClient::new(&args.backend)?;
            let submission = sign_file(&identity, &reading, false)?;
            let response = client.submit(&submission).await.context("submission failed")?;
            info!(
                content_address = %response.content_address,
                data_hash = %response.data_hash,
                "Reading accepted"
            );
        }
        Command::Run { interval, reading } => {
            anyhow::ensure!(interval > 0, "interval must be at least 1 second");
            let client = CollectorClient::new(&args.backend)?;
            run_loop(&identity, &client, &reading, Duration::from_secs(interval)).await;
        }
    }

    Ok(())
}

/// Sign the reading at `path`. With `fresh_timestamp` the file's timestamp is
/// replaced by the current time.
fn sign_file(identity: &DeviceIdentity, path: &Path, fresh_timestamp: bool) -> Result<SignedSubmission> {
    let now = Utc::now();
    let mut reading = load_reading(path, &identity.device_id(), now)?;
    if fresh_timestamp {
        reading.timestamp = now;
    }
    identity.sign(reading).context("signing failed")
}

async fn run_loop(identity: &DeviceIdentity, client: &CollectorClient, path: &Path, period: Duration) {
    info!(
        device_id = %identity,
        backend = client.base_url(),
        period_secs = period.as_secs(),
        "Submitting readings. Press Ctrl+C to stop."
    );

    let mut ticker = tokio::time::interval(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let submission = match sign_file(identity, path, true) {
                    Ok(submission) => submission,
                    Err(e) => {
                        error!(error = %e, "Could not prepare reading");
                        continue;
                    }
                };
                match client.submit(&submission).await {
                    Ok(response) => {
                        info!(content_address = %response.content_address, "Reading accepted");
                    }
                    Err(e @ ApiError::Rejected { .. }) if !e.is_retryable() => {
                        error!(error = %e, reason = ?e.reason(), "Reading rejected");
                    }
                    Err(e) => warn!(error = %e, "Submission failed, will retry next tick"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping");
                break;
            }
        }
    }
}
