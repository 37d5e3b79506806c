//! # Key Store Service
//!
//! Loads the device identity, regenerating it when the stored material is
//! missing or unusable.

use crate::adapters::key_file::JsonKeyFile;
use crate::domain::errors::IdentityError;
use crate::domain::identity::DeviceIdentity;
use crate::ports::outbound::KeyPersistence;
use std::path::Path;
use tracing::{info, warn};

/// Device key store over any persistence backend.
pub struct KeyStore<P: KeyPersistence> {
    persistence: P,
}

impl<P: KeyPersistence> KeyStore<P> {
    pub fn new(persistence: P) -> Self {
        Self { persistence }
    }

    /// Return the persisted identity, or generate and persist a new one.
    ///
    /// Any failure to obtain usable key material leads to regeneration.
    /// Only a failure to persist the new identity is returned as an error.
    pub fn load_or_create(&self) -> Result<DeviceIdentity, IdentityError> {
        match self.persistence.load() {
            Ok(Some(stored)) => match DeviceIdentity::from_stored(&stored) {
                Ok(identity) => {
                    info!(device_id = %identity.device_id(), "Loaded existing device keys");
                    return Ok(identity);
                }
                Err(e) => warn!(error = %e, "Stored device keys unusable, regenerating"),
            },
            Ok(None) => info!("No device keys found, creating new identity"),
            Err(IdentityError::CorruptKeys(reason)) => {
                warn!(%reason, "Device key file corrupt, regenerating")
            }
            Err(e) => warn!(error = %e, "Device key file unreadable, regenerating"),
        }

        let identity = DeviceIdentity::generate();
        self.persistence.save(&identity.to_stored())?;
        info!(device_id = %identity.device_id(), "Created and persisted new device keys");
        Ok(identity)
    }
}

/// `load_or_create` against a JSON key file at `path`.
pub fn load_or_create(path: impl AsRef<Path>) -> Result<DeviceIdentity, IdentityError> {
    KeyStore::new(JsonKeyFile::new(path.as_ref())).load_or_create()
}
