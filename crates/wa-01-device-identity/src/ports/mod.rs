//! # Ports Layer
//!
//! - **Outbound (Driven)**: where key material is persisted

pub mod outbound;
