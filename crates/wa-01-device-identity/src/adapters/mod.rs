//! # Adapters
//!
//! Implementations of the outbound persistence port.

pub mod key_file;
