//! # WA-Device: Weather-Attest Device CLI
//!
//! Runs on a sensor station. Manages the station's P-256 identity, signs
//! readings and pushes them to the collector.
//!
//! ```text
//! reading.json ──→ parse + defaults ──→ DeviceIdentity::sign ──→ POST /api/submit
//!                                            ▲
//!                          KEYS_PATH ──→ load_or_create
//! ```

pub mod api;
pub mod domain;

pub use api::{ApiError, CollectorClient};
pub use domain::{load_reading, parse_reading, ReadingError};
