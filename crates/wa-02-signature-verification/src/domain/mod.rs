//! # Domain Layer
//!
//! Pure verification logic with no I/O dependencies.

pub mod errors;
pub mod verifier;
