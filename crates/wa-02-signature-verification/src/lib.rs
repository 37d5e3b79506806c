//! # Signature Verification Subsystem (WA-02)
//!
//! Collector-side proof that a submission was produced by the holder of the
//! private key for its `public_key`, over exactly the reading it carries.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): ordered fail-closed checks, no I/O
//! - **Ports Layer** (`ports/`): `SignatureVerificationApi`
//! - **Service Layer** (`service.rs`): adds the device-binding rule
//!
//! ## Security Notes
//!
//! - Hash comparison is constant time (`subtle`)
//! - Only 65-byte uncompressed public keys and 64-byte `r || s` signatures are
//!   accepted; `r` and `s` must lie in `[1, n-1]`
//! - High-S signatures are valid; P-256 ECDSA has no low-S rule
//! - Verification is stateless and needs no locking

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::errors::SignatureFailure;
pub use domain::verifier::{check, check_device_binding, verify};
pub use ports::inbound::SignatureVerificationApi;
pub use service::SignatureVerificationService;
