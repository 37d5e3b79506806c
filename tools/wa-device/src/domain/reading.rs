//! Reading input for `sign`, `submit` and `run`.
//!
//! Readings come from a JSON file or stdin. Two fields may be left out:
//! an empty or missing `device_id` is filled from the local identity, and a
//! missing `timestamp` becomes the current time.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use shared_types::{DeviceId, SensorReading};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadingError {
    #[error("Failed to read {source_name}: {reason}")]
    Io { source_name: String, reason: String },

    #[error("Reading must be a JSON object")]
    NotAnObject,

    #[error("Invalid reading: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Read a reading from `path`, or stdin when `path` is `-`.
pub fn load_reading(
    path: &Path,
    device_id: &DeviceId,
    now: DateTime<Utc>,
) -> Result<SensorReading, ReadingError> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| ReadingError::Io {
                source_name: "stdin".into(),
                reason: e.to_string(),
            })?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| ReadingError::Io {
            source_name: path.display().to_string(),
            reason: e.to_string(),
        })?
    };
    parse_reading(&raw, device_id, now)
}

/// Parse a reading, filling defaults for `device_id` and `timestamp`.
pub fn parse_reading(
    raw: &str,
    device_id: &DeviceId,
    now: DateTime<Utc>,
) -> Result<SensorReading, ReadingError> {
    let mut object: Map<String, Value> = match serde_json::from_str(raw)? {
        Value::Object(map) => map,
        _ => return Err(ReadingError::NotAnObject),
    };

    let needs_id = match object.get("device_id") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };
    if needs_id {
        object.insert("device_id".into(), Value::String(device_id.to_hex()));
    }

    if matches!(object.get("timestamp"), None | Some(Value::Null)) {
        object.insert(
            "timestamp".into(),
            Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
    }

    Ok(serde_json::from_value(Value::Object(object))?)
}
