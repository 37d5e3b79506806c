//! # Ports Layer
//!
//! - **Outbound (Driven)**: the clock the limiter reads

pub mod outbound;
