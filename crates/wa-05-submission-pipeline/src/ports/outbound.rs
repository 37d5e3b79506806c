//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::entities::{ContentAddress, StoredReading};
use crate::domain::errors::BlobStoreError;
use async_trait::async_trait;
use shared_types::SensorReading;

/// Content-addressed storage for accepted readings.
///
/// The pipeline bounds every `store` call with a timeout; implementations
/// need not time out themselves.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a verified, validated reading and return its address.
    async fn store(&self, reading: &SensorReading) -> Result<ContentAddress, BlobStoreError>;

    /// Most recent readings, newest first. Stores that cannot list return an
    /// empty vector.
    async fn recent(&self, limit: usize) -> Result<Vec<StoredReading>, BlobStoreError>;
}
