//! Device-side domain logic.

pub mod reading;

pub use reading::{load_reading, parse_reading, ReadingError};
