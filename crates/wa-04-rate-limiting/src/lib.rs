//! # Rate Limiting Subsystem (WA-04)
//!
//! Caps how often a device may submit: at most `max_submissions` accepted
//! submissions in any rolling `window_secs` span (default 12 per hour).
//!
//! The limiter runs first in the pipeline, so it keys on the device id the
//! submission *claims*. A rejected attempt does not consume a slot; an
//! accepted one stays consumed whatever happens downstream.

pub mod domain;
pub mod ports;

pub use domain::config::{RateLimitConfig, RateLimitConfigError};
pub use domain::limiter::RateLimiter;
pub use ports::outbound::{ManualTimeSource, Millis, SystemTimeSource, TimeSource};
