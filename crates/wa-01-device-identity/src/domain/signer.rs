//! # Reading Signer
//!
//! `data_hash = SHA-256(canonical_bytes(reading))`; the ECDSA digest is
//! `data_hash` itself. The collector recomputes the same digest, so the two
//! sides only ever disagree if the canonical bytes differ.

use super::errors::IdentityError;
use shared_crypto::P256KeyPair;
use shared_types::{SensorReading, SignedSubmission};

/// Sign `reading` and package it for submission.
pub fn sign(
    reading: SensorReading,
    keypair: &P256KeyPair,
) -> Result<SignedSubmission, IdentityError> {
    let data_hash = reading.data_hash()?;
    let signature = keypair.sign_prehash(&data_hash)?;

    Ok(SignedSubmission {
        reading,
        data_hash: hex::encode(data_hash),
        signature: signature.to_hex(),
        public_key: keypair.public_key().to_hex(),
    })
}
