//! Accepted ranges for each reading field. All ranges are inclusive.

use chrono::Duration;
use std::ops::RangeInclusive;

/// Accepted values for a reading.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadBounds {
    /// Degrees Celsius.
    pub temperature: RangeInclusive<f64>,
    /// Percent.
    pub humidity: RangeInclusive<f64>,
    /// Hectopascals.
    pub pressure: RangeInclusive<f64>,
    /// km/h.
    pub wind_speed: RangeInclusive<f64>,
    /// Oldest accepted reading, relative to validation time.
    pub max_age: Duration,
    /// Furthest a reading may be ahead of validation time (clock skew).
    pub max_future_skew: Duration,
}

impl Default for PayloadBounds {
    fn default() -> Self {
        Self {
            temperature: -100.0..=70.0,
            humidity: 0.0..=100.0,
            pressure: 800.0..=1200.0,
            wind_speed: 0.0..=200.0,
            max_age: Duration::hours(1),
            max_future_skew: Duration::minutes(5),
        }
    }
}
