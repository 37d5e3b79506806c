//! Payload rejection reasons.

use thiserror::Error;

/// The first rule a reading broke.
///
/// Clients only ever see `invalid_payload`; the variant is for logs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PayloadViolation {
    #[error("temperature {0} outside physical bounds")]
    Temperature(f64),

    #[error("humidity {0} outside physical bounds")]
    Humidity(f64),

    #[error("pressure {0} outside physical bounds")]
    Pressure(f64),

    #[error("wind speed {0} outside physical bounds")]
    WindSpeed(f64),

    #[error("unknown wind direction {0:?}")]
    WindDirection(String),

    #[error("reading is {age_secs}s old")]
    Stale { age_secs: i64 },

    #[error("reading is {ahead_secs}s in the future")]
    FromFuture { ahead_secs: i64 },
}
