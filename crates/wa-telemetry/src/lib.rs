//! # Weather-Attest Telemetry
//!
//! Structured logging and Prometheus metrics shared by the collector and the
//! device CLI.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wa_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::for_service("collector"))?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `weather-attest` | Service name in logs |
//! | `WA_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `WA_CONSOLE_OUTPUT` | `true` | Write logs to stderr |
//! | `WA_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |

mod config;
mod logging;
pub mod metrics;

pub use config::{parse_flag, TelemetryConfig};
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, BLOB_STORE_FAILURES,
    RATE_LIMIT_TRACKED_DEVICES, REGISTERED_DEVICES, SIGNATURE_VERIFICATION_DURATION,
    SUBMISSIONS_TOTAL,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install the global log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}
