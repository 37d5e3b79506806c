//! # Submission Verifier (P-256)
//!
//! Ordered, fail-closed checks over a `SignedSubmission`:
//!
//! 1. `public_key` decodes to an uncompressed P-256 point
//! 2. recompute `SHA-256(canonical_bytes(reading))`
//! 3. claimed `data_hash` equals the recomputed hash (constant time)
//! 4. `signature` decodes to exactly 64 bytes
//! 5. split into `r`, `s` and range-check both scalars
//! 6. ECDSA verify with the recomputed hash as digest
//!
//! The first failing step short-circuits. Nothing here panics on
//! attacker-controlled input.

use super::errors::SignatureFailure;
use shared_crypto::{CryptoError, P256PublicKey, P256Signature};
use shared_types::{decode_fixed_hex, DeviceId, Hash, SensorReading, SignedSubmission};
use subtle::ConstantTimeEq;

/// Run every verification step, returning the identity derived from the
/// submission's public key on success.
pub fn check(submission: &SignedSubmission) -> Result<DeviceId, SignatureFailure> {
    // Step 1
    let key_bytes =
        hex::decode(submission.public_key.trim()).map_err(|_| SignatureFailure::InvalidPublicKeyHex)?;
    let public_key = P256PublicKey::from_sec1_uncompressed(&key_bytes)
        .map_err(|_| SignatureFailure::InvalidCurvePoint)?;

    // Steps 2-3
    let expected_hash = submission
        .reading
        .data_hash()
        .map_err(|_| SignatureFailure::Canonicalization)?;
    let claimed_hash: Hash = decode_fixed_hex(submission.data_hash.trim())
        .map_err(|_| SignatureFailure::InvalidDataHash)?;
    if !bool::from(expected_hash[..].ct_eq(&claimed_hash[..])) {
        return Err(SignatureFailure::HashMismatch);
    }

    // Step 4
    let sig_bytes =
        hex::decode(submission.signature.trim()).map_err(|_| SignatureFailure::InvalidSignatureHex)?;
    let signature = P256Signature::from_slice(&sig_bytes)
        .map_err(|_| SignatureFailure::InvalidSignatureLength(sig_bytes.len()))?;

    // Steps 5-6
    public_key
        .verify_prehash(&expected_hash, &signature)
        .map_err(|e| match e {
            CryptoError::InvalidSignature => SignatureFailure::InvalidSignatureScalars,
            _ => SignatureFailure::SignatureMismatch,
        })?;

    Ok(public_key.device_id())
}

/// Boolean form of [`check`].
pub fn verify(submission: &SignedSubmission) -> bool {
    check(submission).is_ok()
}

/// Require the reading's claimed device id to be the verified identity.
///
/// Comparison is on decoded bytes, so hex case does not matter.
pub fn check_device_binding(
    reading: &SensorReading,
    verified: &DeviceId,
) -> Result<(), SignatureFailure> {
    match DeviceId::from_hex(reading.device_id.trim()) {
        Ok(claimed) if claimed == *verified => Ok(()),
        _ => Err(SignatureFailure::DeviceMismatch),
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================
