//! # Core Domain Entities
//!
//! Defines the entities that cross the device/collector boundary.
//!
//! ## Clusters
//!
//! - **Identity**: `DeviceId`
//! - **Payload**: `SensorReading`, `SignedSubmission`
//! - **Registration**: `DeviceRegistration`

use crate::errors::TypesError;
use crate::hashing::{decode_fixed_hex, sha256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// Length of a device identifier in bytes.
pub const DEVICE_ID_LEN: usize = 16;

/// Wind directions a reading may report.
pub const WIND_DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

// =============================================================================
// IDENTITY
// =============================================================================

/// Device identifier: the first 16 bytes of SHA-256 over the device's
/// uncompressed SEC1 public key.
///
/// Serialized as 32 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId([u8; DEVICE_ID_LEN]);

impl DeviceId {
    /// Derive the identifier from serialized public key bytes.
    pub fn from_public_key_bytes(public_key: &[u8]) -> Self {
        let digest = sha256(public_key);
        let mut id = [0u8; DEVICE_ID_LEN];
        id.copy_from_slice(&digest[..DEVICE_ID_LEN]);
        Self(id)
    }

    /// Wrap raw identifier bytes.
    pub fn from_bytes(bytes: [u8; DEVICE_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from hex (either case).
    pub fn from_hex(input: &str) -> Result<Self, TypesError> {
        decode_fixed_hex::<DEVICE_ID_LEN>(input).map(Self)
    }

    /// Raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; DEVICE_ID_LEN] {
        &self.0
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.to_hex())
    }
}

impl Serialize for DeviceId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DeviceId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DeviceId::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// PAYLOAD
// =============================================================================

/// A single weather observation reported by a device.
///
/// Field declaration order IS the canonical field order. Do not reorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Hex device identifier of the reporting device.
    pub device_id: String,
    /// Free-form location label.
    pub location: String,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Hectopascals.
    pub pressure: f64,
    /// Kilometres per hour.
    pub wind_speed: f64,
    /// One of [`WIND_DIRECTIONS`].
    pub wind_direction: String,
    /// Observation time.
    #[serde(with = "rfc3339")]
    pub timestamp: DateTime<Utc>,
}

impl SensorReading {
    /// The exact bytes that get hashed and signed.
    ///
    /// Compact JSON, fields in declaration order, floats in shortest
    /// round-trip form, timestamp as RFC 3339 UTC with `Z` and 0/3/6/9
    /// fractional digits.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, TypesError> {
        serde_json::to_vec(self).map_err(|e| TypesError::Serialization(e.to_string()))
    }

    /// SHA-256 over [`Self::canonical_bytes`].
    pub fn data_hash(&self) -> Result<Hash, TypesError> {
        Ok(sha256(&self.canonical_bytes()?))
    }
}

/// A reading together with the proof that a device produced it.
///
/// Wire format: `{weather_data, data_hash, signature, public_key}`, all but
/// the reading hex-encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedSubmission {
    /// The signed reading.
    #[serde(rename = "weather_data")]
    pub reading: SensorReading,
    /// Hex SHA-256 of the reading's canonical bytes.
    pub data_hash: String,
    /// Hex `r || s`, 64 bytes.
    pub signature: String,
    /// Hex uncompressed SEC1 public key, 65 bytes.
    pub public_key: String,
}

impl SignedSubmission {
    /// The device reference claimed by the reading.
    pub fn device_ref(&self) -> &str {
        &self.reading.device_id
    }
}

// =============================================================================
// REGISTRATION
// =============================================================================

/// Registration request a device sends once before submitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRegistration {
    /// Hex device identifier.
    #[serde(default)]
    pub device_id: String,
    /// Hex uncompressed public key.
    #[serde(default)]
    pub public_key: String,
    /// Free-form location label.
    #[serde(default)]
    pub location: String,
}

/// Fixed RFC 3339 encoding for timestamps inside canonical bytes.
pub mod rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
