//! # Submission Flow
//!
//! A device identity (wa-01) produces submissions that travel through the
//! full collector pipeline (wa-02 → wa-05) in process.
//!
//! ## Flows Tested
//!
//! 1. **Persisted identity → accepted**: keys written to disk sign a reading
//!    the pipeline accepts and stores
//! 2. **Quota**: 12 accepted, the 13th `rate_limited`, then accepted again
//!    once the window has passed
//! 3. **Rejections**: tampering, identity spoofing and bounds violations map
//!    to their reason codes
//! 4. **Collaborator failure**: a failing blob store yields
//!    `storage_unavailable` and still consumes quota

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use shared_types::{SensorReading, SignedSubmission};
    use wa_01_device_identity::{load_or_create, DeviceIdentity};
    use wa_04_rate_limiting::{ManualTimeSource, RateLimitConfig, TimeSource};
    use wa_05_submission_pipeline::{
        BlobStore, BlobStoreError, ContentAddress, DeviceRegistry, DeviceStatus,
        InMemoryBlobStore, PipelineConfig, ReasonCode, StoredReading, SubmissionApi,
        SubmissionPipeline,
    };

    const HOUR_MS: u64 = 3_600_000;
    const T0: u64 = 1_767_225_600_000;

    // =========================================================================
    // FIXTURES
    // =========================================================================

    fn reading_at(identity: &DeviceIdentity, at: DateTime<Utc>) -> SensorReading {
        SensorReading {
            device_id: identity.device_id().to_hex(),
            location: "Lighthouse".into(),
            temperature: 20.0,
            humidity: 50.0,
            pressure: 1000.0,
            wind_speed: 5.0,
            wind_direction: "N".into(),
            timestamp: at,
        }
    }

    fn clock_time(clock: &ManualTimeSource) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(clock.now_millis() as i64).unwrap()
    }

    struct Collector {
        pipeline: SubmissionPipeline,
        clock: Arc<ManualTimeSource>,
    }

    impl Collector {
        fn new(store: Arc<dyn BlobStore>, config: PipelineConfig) -> Self {
            let clock = Arc::new(ManualTimeSource::new(T0));
            let pipeline = SubmissionPipeline::with_time_source(
                config,
                store,
                Arc::new(DeviceRegistry::new()),
                clock.clone(),
            );
            Self { pipeline, clock }
        }

        fn default_config() -> Self {
            Self::new(Arc::new(InMemoryBlobStore::new()), PipelineConfig::default())
        }

        fn signed(&self, identity: &DeviceIdentity) -> SignedSubmission {
            identity
                .sign(reading_at(identity, clock_time(&self.clock)))
                .unwrap()
        }
    }

    /// Blob store that fails while `down` is set.
    #[derive(Default)]
    struct SwitchableStore {
        inner: InMemoryBlobStore,
        down: AtomicBool,
    }

    #[async_trait]
    impl BlobStore for SwitchableStore {
        async fn store(&self, reading: &SensorReading) -> Result<ContentAddress, BlobStoreError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(BlobStoreError::Unavailable("pinning service offline".into()));
            }
            self.inner.store(reading).await
        }

        async fn recent(&self, limit: usize) -> Result<Vec<StoredReading>, BlobStoreError> {
            self.inner.recent(limit).await
        }
    }

    // =========================================================================
    // END-TO-END
    // =========================================================================

    #[tokio::test]
    async fn test_end_to_end_thirteenth_submission_rate_limited() {
        let pipeline = SubmissionPipeline::new(
            PipelineConfig::default(),
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(DeviceRegistry::new()),
        );
        let identity = DeviceIdentity::generate();

        let first = identity.sign(reading_at(&identity, Utc::now())).unwrap();
        assert!(wa_02_signature_verification::verify(&first));

        let mut outcomes = Vec::new();
        outcomes.push(pipeline.process(first).await);
        for _ in 1..13 {
            let submission = identity.sign(reading_at(&identity, Utc::now())).unwrap();
            outcomes.push(pipeline.process(submission).await);
        }

        assert!(outcomes[..12].iter().all(Result::is_ok));
        let last = outcomes[12].as_ref().unwrap_err();
        assert_eq!(last.reason_code(), ReasonCode::RateLimited);

        let stored = pipeline.blob_store().recent(100).await.unwrap();
        assert_eq!(stored.len(), 12);
    }

    #[tokio::test]
    async fn test_persisted_identity_signs_accepted_readings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("device_keys.json");

        let identity = load_or_create(&path).unwrap();
        let reloaded = load_or_create(&path).unwrap();
        assert_eq!(identity.device_id(), reloaded.device_id());

        let collector = Collector::default_config();
        let accepted = collector
            .pipeline
            .process(collector.signed(&reloaded))
            .await
            .unwrap();
        assert_eq!(accepted.device_id, identity.device_id());
    }

    #[tokio::test]
    async fn test_quota_recovers_after_window() {
        let collector = Collector::default_config();
        let identity = DeviceIdentity::generate();

        for _ in 0..12 {
            collector
                .pipeline
                .process(collector.signed(&identity))
                .await
                .unwrap();
            collector.clock.advance(1_000);
        }
        let err = collector
            .pipeline
            .process(collector.signed(&identity))
            .await
            .unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::RateLimited);

        // First submission was at T0; one hour later it has left the window.
        collector.clock.set(T0 + HOUR_MS + 1);
        assert!(collector
            .pipeline
            .process(collector.signed(&identity))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_devices_have_independent_quotas() {
        let config = PipelineConfig {
            rate_limit: RateLimitConfig {
                window_secs: 3600,
                max_submissions: 2,
            },
            ..PipelineConfig::default()
        };
        let collector = Collector::new(Arc::new(InMemoryBlobStore::new()), config);
        let a = DeviceIdentity::generate();
        let b = DeviceIdentity::generate();

        for _ in 0..2 {
            collector.pipeline.process(collector.signed(&a)).await.unwrap();
            collector.clock.advance(10);
        }
        assert!(collector.pipeline.process(collector.signed(&a)).await.is_err());
        assert!(collector.pipeline.process(collector.signed(&b)).await.is_ok());
    }

    // =========================================================================
    // REJECTIONS
    // =========================================================================

    #[tokio::test]
    async fn test_rejection_reasons() {
        let collector = Collector::default_config();
        let identity = DeviceIdentity::generate();

        let mut tampered = collector.signed(&identity);
        tampered.reading.temperature = 21.0;
        let err = collector.pipeline.process(tampered).await.unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::BadSignature);

        // Correctly signed by a key that is not the claimed device.
        let impostor = DeviceIdentity::generate();
        let spoofed = impostor
            .sign(reading_at(&identity, clock_time(&collector.clock)))
            .unwrap();
        let err = collector.pipeline.process(spoofed).await.unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::BadSignature);

        let mut hot = reading_at(&identity, clock_time(&collector.clock));
        hot.temperature = 71.0;
        let err = collector
            .pipeline
            .process(identity.sign(hot).unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::InvalidPayload);

        let mut edge = reading_at(&identity, clock_time(&collector.clock));
        edge.temperature = 70.0;
        assert!(collector
            .pipeline
            .process(identity.sign(edge).unwrap())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_unbound_mode_accepts_foreign_device_claim() {
        let config = PipelineConfig {
            enforce_device_binding: false,
            ..PipelineConfig::default()
        };
        let collector = Collector::new(Arc::new(InMemoryBlobStore::new()), config);
        let signer = DeviceIdentity::generate();

        let mut reading = reading_at(&signer, clock_time(&collector.clock));
        reading.device_id = "station-7".into();
        let accepted = collector
            .pipeline
            .process(signer.sign(reading).unwrap())
            .await
            .unwrap();

        assert_eq!(accepted.device_id, signer.device_id());
    }

    // =========================================================================
    // COLLABORATOR FAILURE
    // =========================================================================

    #[tokio::test]
    async fn test_storage_outage_consumes_quota() {
        let store = Arc::new(SwitchableStore::default());
        let config = PipelineConfig {
            rate_limit: RateLimitConfig {
                window_secs: 3600,
                max_submissions: 2,
            },
            ..PipelineConfig::default()
        };
        let collector = Collector::new(store.clone(), config);
        let identity = DeviceIdentity::generate();

        store.down.store(true, Ordering::SeqCst);
        let err = collector
            .pipeline
            .process(collector.signed(&identity))
            .await
            .unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::StorageUnavailable);
        assert!(err.reason_code().is_retryable());

        store.down.store(false, Ordering::SeqCst);
        collector.clock.advance(10);
        collector
            .pipeline
            .process(collector.signed(&identity))
            .await
            .unwrap();

        collector.clock.advance(10);
        let err = collector
            .pipeline
            .process(collector.signed(&identity))
            .await
            .unwrap_err();
        assert_eq!(err.reason_code(), ReasonCode::RateLimited);
    }

    #[tokio::test]
    async fn test_registered_device_becomes_active() {
        let collector = Collector::default_config();
        let identity = DeviceIdentity::generate();
        let registry = collector.pipeline.registry();

        registry
            .register(
                &shared_types::DeviceRegistration {
                    device_id: identity.device_id().to_hex(),
                    public_key: identity.public_key().to_hex(),
                    location: "Lighthouse".into(),
                },
                clock_time(&collector.clock),
            )
            .unwrap();
        assert_eq!(
            registry.get(&identity.device_id()).unwrap().status,
            DeviceStatus::PendingConfirmation
        );

        collector
            .pipeline
            .process(collector.signed(&identity))
            .await
            .unwrap();

        let record = registry.get(&identity.device_id()).unwrap();
        assert_eq!(record.status, DeviceStatus::Active);
        assert_eq!(record.total_submissions, 1);
    }
}
