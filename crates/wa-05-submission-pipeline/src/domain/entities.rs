//! # Pipeline Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{DeviceId, SensorReading};
use std::fmt;

/// Address under which the blob store keeps a reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentAddress(String);

impl ContentAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reading that passed every check and was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedSubmission {
    /// Identity proven by the signature.
    pub device_id: DeviceId,
    pub content_address: ContentAddress,
    /// Lowercase hex of the verified data hash.
    pub data_hash: String,
    pub accepted_at: DateTime<Utc>,
}

/// A reading as held by a blob store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReading {
    pub content_address: ContentAddress,
    #[serde(flatten)]
    pub reading: SensorReading,
    pub stored_at: DateTime<Utc>,
}

/// Registration lifecycle.
///
/// A device is `PendingConfirmation` until its first accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    PendingConfirmation,
    Active,
}

/// A registered device as listed by the collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub device_id: DeviceId,
    pub public_key: String,
    pub location: String,
    pub status: DeviceStatus,
    pub registered_at: DateTime<Utc>,
    pub total_submissions: u64,
    pub last_submission: Option<DateTime<Utc>>,
}
