//! # HTTP Flow
//!
//! The `wa-device` client talks to a live collector bound to an ephemeral
//! port, exercising JSON encoding on both sides of the wire.

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use chrono::Utc;
    use collector_runtime::config::CollectorConfig;
    use collector_runtime::CollectorRuntime;
    use shared_types::DeviceRegistration;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;
    use wa_01_device_identity::DeviceIdentity;
    use wa_device::{parse_reading, ApiError, CollectorClient};

    struct LiveCollector {
        addr: SocketAddr,
        stop: oneshot::Sender<()>,
        task: JoinHandle<Result<(), String>>,
    }

    impl LiveCollector {
        async fn start(max_submissions: u32) -> Self {
            let mut config = CollectorConfig::default();
            config.rate_limit.max_submissions = max_submissions;

            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let (stop, stopped) = oneshot::channel::<()>();

            let runtime = CollectorRuntime::new(config);
            let task = tokio::spawn(async move {
                runtime
                    .serve(listener, async move {
                        let _ = stopped.await;
                    })
                    .await
                    .map_err(|e| e.to_string())
            });

            Self { addr, stop, task }
        }

        fn client(&self) -> CollectorClient {
            CollectorClient::new(format!("http://{}", self.addr)).unwrap()
        }

        async fn shutdown(self) {
            self.stop.send(()).unwrap();
            self.task.await.unwrap().unwrap();
        }
    }

    const READING: &str = r#"{
        "location": "Summit",
        "temperature": -4.5,
        "humidity": 91,
        "pressure": 962.3,
        "wind_speed": 48.2,
        "wind_direction": "NW"
    }"#;

    fn signed(identity: &DeviceIdentity) -> shared_types::SignedSubmission {
        let reading = parse_reading(READING, &identity.device_id(), Utc::now()).unwrap();
        identity.sign(reading).unwrap()
    }

    #[tokio::test]
    async fn test_register_and_submit_over_http() {
        let collector = LiveCollector::start(12).await;
        let client = collector.client();
        let identity = DeviceIdentity::generate();

        let health = client.health().await.unwrap();
        assert_eq!(health.status, "healthy");

        let registered = client
            .register(&DeviceRegistration {
                device_id: identity.device_id().to_hex(),
                public_key: identity.public_key().to_hex(),
                location: "Summit".into(),
            })
            .await
            .unwrap();
        assert_eq!(registered.status, "pending_confirmation");

        let submission = signed(&identity);
        let accepted = client.submit(&submission).await.unwrap();
        assert_eq!(accepted.device_id, identity.device_id().to_hex());
        assert_eq!(accepted.data_hash, submission.data_hash);
        assert!(accepted.content_address.starts_with("sha256-"));

        drop(client);
        collector.shutdown().await;
    }

    #[tokio::test]
    async fn test_rejections_carry_reason_codes() {
        let collector = LiveCollector::start(2).await;
        let client = collector.client();
        let identity = DeviceIdentity::generate();

        let mut tampered = signed(&identity);
        tampered.reading.humidity = 90.0;
        let err = client.submit(&tampered).await.unwrap_err();
        assert_eq!(err.reason(), Some("bad_signature"));
        assert!(!err.is_retryable());

        // The tampered attempt used one of two slots.
        client.submit(&signed(&identity)).await.unwrap();
        let err = client.submit(&signed(&identity)).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected { .. }));
        assert_eq!(err.reason(), Some("rate_limited"));
        assert!(err.is_retryable());

        drop(client);
        collector.shutdown().await;
    }

    #[tokio::test]
    async fn test_registration_with_foreign_key_rejected() {
        let collector = LiveCollector::start(12).await;
        let client = collector.client();

        let err = client
            .register(&DeviceRegistration {
                device_id: DeviceIdentity::generate().device_id().to_hex(),
                public_key: DeviceIdentity::generate().public_key().to_hex(),
                location: "Summit".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.reason(), Some("invalid_registration"));

        drop(client);
        collector.shutdown().await;
    }

    #[tokio::test]
    async fn test_unreachable_collector_is_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = CollectorClient::new(format!("http://{addr}")).unwrap();
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, ApiError::Connection(_)));
        assert!(err.is_retryable());
    }
}
