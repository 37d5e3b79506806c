//! Collector API client.

pub mod client;
pub mod types;

pub use client::{ApiError, CollectorClient};
pub use types::*;
