//! # Identity Errors

use shared_crypto::CryptoError;
use shared_types::TypesError;
use thiserror::Error;

/// Errors from key handling and signing on the device.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Persisted key material could not be decoded or is inconsistent.
    ///
    /// `KeyStore` treats this like an absent file and regenerates.
    #[error("Corrupt key material: {0}")]
    CorruptKeys(String),

    /// Key file could not be read or written.
    #[error("Key persistence failed: {0}")]
    Persistence(#[from] std::io::Error),

    /// Key file could not be encoded.
    #[error("Key encoding failed: {0}")]
    Encoding(String),

    /// Reading could not be canonicalized.
    #[error("Reading serialization failed: {0}")]
    Serialization(#[from] TypesError),

    /// Signature could not be produced.
    #[error("Signing failed: {0}")]
    Crypto(#[from] CryptoError),
}
