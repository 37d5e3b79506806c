//! # Payload Validation Subsystem (WA-03)
//!
//! Rejects readings a real weather station could not have produced, and
//! readings too old or too far in the future to be current.
//!
//! | Field | Accepted |
//! |-------|----------|
//! | temperature | -100 ..= 70 °C |
//! | humidity | 0 ..= 100 % |
//! | pressure | 800 ..= 1200 hPa |
//! | wind_speed | 0 ..= 200 km/h |
//! | wind_direction | N, NE, E, SE, S, SW, W, NW |
//! | timestamp | at most 1h old, at most 5 min ahead |

pub mod domain;

pub use domain::bounds::PayloadBounds;
pub use domain::errors::PayloadViolation;
pub use domain::validator::PayloadValidator;
