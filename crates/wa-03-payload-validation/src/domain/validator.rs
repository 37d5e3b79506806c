//! # Payload Validator
//!
//! Checks run in a fixed order: temperature, humidity, pressure, wind speed,
//! wind direction, timestamp. The first violation is returned.
//!
//! `RangeInclusive::contains` is false for NaN, so non-finite values are
//! rejected without a separate check.

use super::bounds::PayloadBounds;
use super::errors::PayloadViolation;
use chrono::{DateTime, Utc};
use shared_types::{SensorReading, WIND_DIRECTIONS};

/// Semantic validator for decoded readings.
#[derive(Debug, Clone, Default)]
pub struct PayloadValidator {
    bounds: PayloadBounds,
}

impl PayloadValidator {
    pub fn new(bounds: PayloadBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &PayloadBounds {
        &self.bounds
    }

    /// Validate `reading` as of `now`.
    pub fn validate(
        &self,
        reading: &SensorReading,
        now: DateTime<Utc>,
    ) -> Result<(), PayloadViolation> {
        let b = &self.bounds;

        if !b.temperature.contains(&reading.temperature) {
            return Err(PayloadViolation::Temperature(reading.temperature));
        }
        if !b.humidity.contains(&reading.humidity) {
            return Err(PayloadViolation::Humidity(reading.humidity));
        }
        if !b.pressure.contains(&reading.pressure) {
            return Err(PayloadViolation::Pressure(reading.pressure));
        }
        if !b.wind_speed.contains(&reading.wind_speed) {
            return Err(PayloadViolation::WindSpeed(reading.wind_speed));
        }
        if !WIND_DIRECTIONS.contains(&reading.wind_direction.as_str()) {
            return Err(PayloadViolation::WindDirection(
                reading.wind_direction.clone(),
            ));
        }

        let age = now.signed_duration_since(reading.timestamp);
        if age > b.max_age {
            return Err(PayloadViolation::Stale {
                age_secs: age.num_seconds(),
            });
        }
        if -age > b.max_future_skew {
            return Err(PayloadViolation::FromFuture {
                ahead_secs: (-age).num_seconds(),
            });
        }

        Ok(())
    }
}
