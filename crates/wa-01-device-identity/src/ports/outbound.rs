//! # Outbound Ports (Driven Ports / SPI)
//!
//! Where the device's key material lives between restarts.

use crate::domain::errors::IdentityError;
use crate::domain::identity::StoredKeys;

/// Storage for persisted key material.
pub trait KeyPersistence: Send + Sync {
    /// Load stored keys.
    ///
    /// # Returns
    /// - `Ok(Some(keys))`: material was found and parsed
    /// - `Ok(None)`: nothing stored yet
    /// - `Err(CorruptKeys)`: something is stored but unparseable
    /// - `Err(Persistence)`: the store could not be read
    fn load(&self) -> Result<Option<StoredKeys>, IdentityError>;

    /// Replace stored keys. Implementations must restrict access to the owner.
    fn save(&self, keys: &StoredKeys) -> Result<(), IdentityError>;
}
