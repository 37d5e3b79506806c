//! # Submission Pipeline Subsystem (WA-05)
//!
//! Decides, for each inbound `SignedSubmission`, whether it is accepted and
//! stored or rejected with a specific reason.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): outcomes, reason codes, device registry
//! - **Ports Layer** (`ports/`): `SubmissionApi` in, `BlobStore` out
//! - **Adapters** (`adapters/`): content-addressed in-memory blob store
//! - **Service Layer** (`service.rs`): `SubmissionPipeline`
//!
//! ## Stage Order
//!
//! | # | Stage | Rejection |
//! |---|-------|-----------|
//! | 1 | rate limit (claimed device id) | `rate_limited` |
//! | 2 | signature + device binding | `bad_signature` |
//! | 3 | physical bounds + freshness | `invalid_payload` |
//! | 4 | blob store (bounded by timeout) | `storage_unavailable` |

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::memory_store::InMemoryBlobStore;
pub use domain::entities::{
    AcceptedSubmission, ContentAddress, DeviceRecord, DeviceStatus, StoredReading,
};
pub use domain::errors::{BlobStoreError, ReasonCode, RegistrationError, SubmissionError};
pub use domain::registry::DeviceRegistry;
pub use ports::inbound::SubmissionApi;
pub use ports::outbound::BlobStore;
pub use service::{PipelineConfig, SubmissionPipeline};
