//! # Submission Pipeline Service
//!
//! ```text
//! received → rate_limit → signature → payload → store → accepted
//!               │            │           │        │
//!               ▼            ▼           ▼        ▼
//!         rate_limited  bad_signature  invalid  storage_unavailable
//!                                      _payload
//! ```
//!
//! The rate-limit slot is taken before anything else and is never given
//! back, whatever happens downstream.

use crate::domain::entities::AcceptedSubmission;
use crate::domain::errors::{BlobStoreError, SubmissionError};
use crate::domain::registry::DeviceRegistry;
use crate::ports::inbound::SubmissionApi;
use crate::ports::outbound::BlobStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{sha256, DeviceId, SignedSubmission};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use wa_02_signature_verification::{SignatureVerificationApi, SignatureVerificationService};
use wa_03_payload_validation::{PayloadBounds, PayloadValidator};
use wa_04_rate_limiting::{RateLimitConfig, RateLimiter, SystemTimeSource, TimeSource};
use wa_telemetry::metrics::{
    HistogramTimer, BLOB_STORE_FAILURES, RATE_LIMIT_TRACKED_DEVICES,
    SIGNATURE_VERIFICATION_DURATION, SUBMISSIONS_TOTAL,
};

/// Pipeline settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub rate_limit: RateLimitConfig,
    pub bounds: PayloadBounds,
    /// Require `reading.device_id` to match the signing key.
    pub enforce_device_binding: bool,
    /// Upper bound on a single blob store call.
    pub store_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitConfig::default(),
            bounds: PayloadBounds::default(),
            enforce_device_binding: true,
            store_timeout: Duration::from_secs(30),
        }
    }
}

/// Orchestrates rate limiting, verification, validation and storage.
pub struct SubmissionPipeline {
    limiter: Arc<RateLimiter>,
    verifier: SignatureVerificationService,
    validator: PayloadValidator,
    store: Arc<dyn BlobStore>,
    registry: Arc<DeviceRegistry>,
    clock: Arc<dyn TimeSource>,
    store_timeout: Duration,
}

impl SubmissionPipeline {
    /// Pipeline on the system clock.
    pub fn new(
        config: PipelineConfig,
        store: Arc<dyn BlobStore>,
        registry: Arc<DeviceRegistry>,
    ) -> Self {
        Self::with_time_source(config, store, registry, Arc::new(SystemTimeSource))
    }

    /// The rate limiter and the freshness check both read `clock`.
    pub fn with_time_source(
        config: PipelineConfig,
        store: Arc<dyn BlobStore>,
        registry: Arc<DeviceRegistry>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::with_time_source(
                config.rate_limit,
                Arc::clone(&clock),
            )),
            verifier: SignatureVerificationService::new(config.enforce_device_binding),
            validator: PayloadValidator::new(config.bounds),
            store,
            registry,
            clock,
            store_timeout: config.store_timeout,
        }
    }

    pub fn rate_limiter(&self) -> Arc<RateLimiter> {
        Arc::clone(&self.limiter)
    }

    pub fn registry(&self) -> Arc<DeviceRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn blob_store(&self) -> Arc<dyn BlobStore> {
        Arc::clone(&self.store)
    }

    /// Drop idle rate-limit state. Returns the number of devices removed.
    pub fn sweep(&self) -> usize {
        let removed = self.limiter.sweep();
        RATE_LIMIT_TRACKED_DEVICES.set(self.limiter.tracked_devices() as i64);
        removed
    }

    fn now(&self) -> DateTime<Utc> {
        i64::try_from(self.clock.now_millis())
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or_else(Utc::now)
    }

    async fn run(
        &self,
        submission: SignedSubmission,
    ) -> Result<AcceptedSubmission, SubmissionError> {
        // 1. Rate limit, keyed on the claimed device id
        let key = rate_limit_key(submission.device_ref());
        let within_quota = self.limiter.check_and_record(&key);
        RATE_LIMIT_TRACKED_DEVICES.set(self.limiter.tracked_devices() as i64);
        if !within_quota {
            return Err(SubmissionError::RateLimited);
        }

        // 2. Signature (and device binding)
        let device_id = {
            let _timer = HistogramTimer::new(&SIGNATURE_VERIFICATION_DURATION);
            self.verifier.check(&submission)?
        };
        debug!(device_id = %device_id, "Signature verified");

        // 3. Payload bounds and freshness
        let now = self.now();
        self.validator.validate(&submission.reading, now)?;

        // 4. Storage
        let content_address =
            match tokio::time::timeout(self.store_timeout, self.store.store(&submission.reading))
                .await
            {
                Ok(Ok(address)) => address,
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err(BlobStoreError::Timeout(self.store_timeout).into()),
            };

        self.registry.record_submission(&device_id, now);

        Ok(AcceptedSubmission {
            device_id,
            content_address,
            data_hash: submission.data_hash.trim().to_lowercase(),
            accepted_at: now,
        })
    }
}

/// Limiter bucket for a claimed device id.
///
/// Every spelling that decodes to the same `DeviceId` (case, surrounding
/// whitespace) shares one bucket. Claims that are not a device id are
/// hashed so the key length stays fixed.
fn rate_limit_key(claimed: &str) -> String {
    match DeviceId::from_hex(claimed.trim()) {
        Ok(id) => id.to_hex(),
        Err(_) => format!("unbound-{}", hex::encode(sha256(claimed.as_bytes()))),
    }
}

#[async_trait]
impl SubmissionApi for SubmissionPipeline {
    async fn process(
        &self,
        submission: SignedSubmission,
    ) -> Result<AcceptedSubmission, SubmissionError> {
        let claimed = submission.device_ref().to_owned();
        let result = self.run(submission).await;

        match &result {
            Ok(accepted) => {
                SUBMISSIONS_TOTAL.with_label_values(&["accepted"]).inc();
                info!(
                    device_id = %accepted.device_id,
                    content_address = %accepted.content_address,
                    "Submission accepted"
                );
            }
            Err(e) => {
                let reason = e.reason_code();
                SUBMISSIONS_TOTAL.with_label_values(&[reason.as_str()]).inc();
                if matches!(e, SubmissionError::StorageUnavailable(_)) {
                    BLOB_STORE_FAILURES.inc();
                }
                warn!(
                    claimed_device = %claimed,
                    reason = %reason,
                    cause = %e,
                    "Submission rejected"
                );
            }
        }

        result
    }
}
