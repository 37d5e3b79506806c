//! # Device Identity
//!
//! A keypair plus the `DeviceId` derived from its public key, and the
//! persisted hex form of both.

use super::errors::IdentityError;
use super::signer;
use serde::{Deserialize, Serialize};
use shared_crypto::{P256KeyPair, P256PublicKey};
use shared_types::{DeviceId, SensorReading, SignedSubmission};

/// Persisted key material.
///
/// File format: `{"private_key": hex, "public_key": hex, "device_id": hex}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredKeys {
    pub private_key: String,
    pub public_key: String,
    pub device_id: String,
}

impl std::fmt::Debug for StoredKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredKeys")
            .field("public_key", &self.public_key)
            .field("device_id", &self.device_id)
            .finish_non_exhaustive()
    }
}

/// The active identity of this device.
#[derive(Debug)]
pub struct DeviceIdentity {
    keypair: P256KeyPair,
    public_key: P256PublicKey,
    device_id: DeviceId,
}

impl DeviceIdentity {
    /// Generate a fresh P-256 identity.
    pub fn generate() -> Self {
        Self::from_keypair(P256KeyPair::generate())
    }

    /// Wrap an existing keypair; the device id is derived, never supplied.
    pub fn from_keypair(keypair: P256KeyPair) -> Self {
        let public_key = keypair.public_key();
        let device_id = public_key.device_id();
        Self {
            keypair,
            public_key,
            device_id,
        }
    }

    /// Decode persisted key material.
    ///
    /// The stored public key and device id must match what the private key
    /// derives; anything else is `CorruptKeys`.
    pub fn from_stored(stored: &StoredKeys) -> Result<Self, IdentityError> {
        let scalar = hex::decode(stored.private_key.trim())
            .map_err(|e| IdentityError::CorruptKeys(format!("private_key: {e}")))?;
        let keypair = P256KeyPair::from_scalar_bytes(&scalar)
            .map_err(|e| IdentityError::CorruptKeys(format!("private_key: {e}")))?;
        let identity = Self::from_keypair(keypair);

        let stored_public = P256PublicKey::from_hex(stored.public_key.trim())
            .map_err(|e| IdentityError::CorruptKeys(format!("public_key: {e}")))?;
        if stored_public != identity.public_key {
            return Err(IdentityError::CorruptKeys(
                "public_key does not match private_key".into(),
            ));
        }

        let stored_id = DeviceId::from_hex(stored.device_id.trim())
            .map_err(|e| IdentityError::CorruptKeys(format!("device_id: {e}")))?;
        if stored_id != identity.device_id {
            return Err(IdentityError::CorruptKeys(
                "device_id does not match public_key".into(),
            ));
        }

        Ok(identity)
    }

    /// Hex form for persistence. The scalar is always 64 hex chars.
    pub fn to_stored(&self) -> StoredKeys {
        StoredKeys {
            private_key: hex::encode(&self.keypair.to_scalar_bytes()[..]),
            public_key: self.public_key.to_hex(),
            device_id: self.device_id.to_hex(),
        }
    }

    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    pub fn public_key(&self) -> &P256PublicKey {
        &self.public_key
    }

    pub fn keypair(&self) -> &P256KeyPair {
        &self.keypair
    }

    /// Sign a reading with this identity's key.
    pub fn sign(&self, reading: SensorReading) -> Result<SignedSubmission, IdentityError> {
        signer::sign(reading, &self.keypair)
    }
}

impl std::fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.device_id, f)
    }
}
