//! # Verification Failures
//!
//! Every reason a submission can fail the signature stage. Callers outside
//! the collector only ever see `bad_signature`; the variants exist for logs.

use thiserror::Error;

/// Why a submission failed signature verification.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SignatureFailure {
    /// `public_key` is not valid hex.
    #[error("public key is not valid hex")]
    InvalidPublicKeyHex,

    /// `public_key` is not a 65-byte uncompressed P-256 point.
    #[error("public key is not an uncompressed P-256 point")]
    InvalidCurvePoint,

    /// The reading could not be canonically serialized.
    #[error("reading could not be canonicalized")]
    Canonicalization,

    /// `data_hash` is not 32 bytes of hex.
    #[error("data hash is not a 32-byte hex digest")]
    InvalidDataHash,

    /// `data_hash` differs from the hash of the reading.
    #[error("data hash does not match reading")]
    HashMismatch,

    /// `signature` is not valid hex.
    #[error("signature is not valid hex")]
    InvalidSignatureHex,

    /// `signature` decoded to the wrong number of bytes.
    #[error("signature must be 64 bytes, got {0}")]
    InvalidSignatureLength(usize),

    /// `r` or `s` is zero or not below the curve order.
    #[error("signature scalars out of range")]
    InvalidSignatureScalars,

    /// The signature does not verify under the public key.
    #[error("signature does not verify")]
    SignatureMismatch,

    /// `reading.device_id` is not the identity derived from `public_key`.
    #[error("reading device id does not match public key")]
    DeviceMismatch,
}
