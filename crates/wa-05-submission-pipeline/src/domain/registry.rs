//! # Device Registry
//!
//! In-memory record of devices that announced themselves. Registration is
//! not required to submit; it only feeds the device listing.

use super::entities::{DeviceRecord, DeviceStatus};
use super::errors::RegistrationError;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared_crypto::P256PublicKey;
use shared_types::{DeviceId, DeviceRegistration};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: RwLock<HashMap<DeviceId, DeviceRecord>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and record a registration.
    ///
    /// The public key must be an uncompressed P-256 point and `device_id`
    /// must be the identity it derives. Re-registering keeps the submission
    /// history and updates the location.
    pub fn register(
        &self,
        registration: &DeviceRegistration,
        now: DateTime<Utc>,
    ) -> Result<DeviceRecord, RegistrationError> {
        let device_hex = registration.device_id.trim();
        let key_hex = registration.public_key.trim();
        if device_hex.is_empty() || key_hex.is_empty() {
            return Err(RegistrationError::MissingField);
        }

        let claimed = DeviceId::from_hex(device_hex).map_err(|_| RegistrationError::InvalidDeviceId)?;
        let public_key =
            P256PublicKey::from_hex(key_hex).map_err(|_| RegistrationError::InvalidPublicKey)?;
        if public_key.device_id() != claimed {
            return Err(RegistrationError::DeviceIdMismatch);
        }

        let mut devices = self.devices.write();
        let record = devices
            .entry(claimed)
            .and_modify(|r| r.location = registration.location.clone())
            .or_insert_with(|| DeviceRecord {
                device_id: claimed,
                public_key: public_key.to_hex(),
                location: registration.location.clone(),
                status: DeviceStatus::PendingConfirmation,
                registered_at: now,
                total_submissions: 0,
                last_submission: None,
            });
        Ok(record.clone())
    }

    /// Count an accepted submission. Unregistered devices are ignored.
    pub fn record_submission(&self, device_id: &DeviceId, at: DateTime<Utc>) {
        if let Some(record) = self.devices.write().get_mut(device_id) {
            record.total_submissions += 1;
            record.last_submission = Some(at);
            record.status = DeviceStatus::Active;
        }
    }

    pub fn get(&self, device_id: &DeviceId) -> Option<DeviceRecord> {
        self.devices.read().get(device_id).cloned()
    }

    /// All devices, oldest registration first.
    pub fn list(&self) -> Vec<DeviceRecord> {
        let mut records: Vec<_> = self.devices.read().values().cloned().collect();
        records.sort_by(|a, b| {
            a.registered_at
                .cmp(&b.registered_at)
                .then_with(|| a.device_id.cmp(&b.device_id))
        });
        records
    }

    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
