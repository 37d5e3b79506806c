//! # Shared Types Crate
//!
//! This crate contains the entities exchanged between devices and the
//! collector, and the canonical byte encoding both sides hash.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `SensorReading` field order and formatting are
//!   defined once, here. Signer and verifier both call
//!   [`SensorReading::canonical_bytes`].
//! - **Hex on the wire**: hashes, signatures, keys and device ids travel as
//!   lowercase hex strings.
//! - **No hidden defaults**: decoding helpers return `TypesError`, never panic.

pub mod entities;
pub mod errors;
pub mod hashing;

pub use entities::*;
pub use errors::*;
pub use hashing::{decode_fixed_hex, sha256};
