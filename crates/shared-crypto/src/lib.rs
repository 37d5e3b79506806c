//! # Shared Crypto
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `ecdsa` | NIST P-256 | Device identity, reading signatures |
//!
//! ## Security Properties
//!
//! - **P-256**: RFC 6979 deterministic nonces, fixed-width `r || s` encoding
//! - Secret scalars are exported only inside `Zeroizing` buffers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;

// Re-exports
pub use ecdsa::{
    P256KeyPair, P256PublicKey, P256Signature, P256_PUBLIC_KEY_LEN, P256_SCALAR_LEN,
    P256_SIGNATURE_LEN,
};
pub use errors::CryptoError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
