//! In-memory blob store.
//!
//! Addresses are `sha256-<hex>` over the reading's canonical bytes, so the
//! same reading always lands at the same address. Holds at most `capacity`
//! readings, evicting the oldest.

use crate::domain::entities::{ContentAddress, StoredReading};
use crate::domain::errors::BlobStoreError;
use crate::ports::outbound::BlobStore;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use shared_types::{sha256, SensorReading};
use std::collections::VecDeque;

/// Default number of readings retained.
pub const DEFAULT_CAPACITY: usize = 10_000;

#[derive(Debug)]
pub struct InMemoryBlobStore {
    readings: RwLock<VecDeque<StoredReading>>,
    capacity: usize,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            readings: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.readings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Address a reading would be stored under.
    pub fn address_for(reading: &SensorReading) -> Result<ContentAddress, BlobStoreError> {
        let bytes = reading
            .canonical_bytes()
            .map_err(|e| BlobStoreError::Encoding(e.to_string()))?;
        Ok(ContentAddress::new(format!(
            "sha256-{}",
            hex::encode(sha256(&bytes))
        )))
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn store(&self, reading: &SensorReading) -> Result<ContentAddress, BlobStoreError> {
        let content_address = Self::address_for(reading)?;

        let mut readings = self.readings.write();
        if readings.len() >= self.capacity {
            readings.pop_front();
        }
        readings.push_back(StoredReading {
            content_address: content_address.clone(),
            reading: reading.clone(),
            stored_at: Utc::now(),
        });

        Ok(content_address)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<StoredReading>, BlobStoreError> {
        Ok(self
            .readings
            .read()
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}
