//! # Domain Layer
//!
//! Pure identity and signing logic with no I/O dependencies.

pub mod errors;
pub mod identity;
pub mod signer;
