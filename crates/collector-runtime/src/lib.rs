//! # Weather-Attest Collector Runtime
//!
//! Accepts signed readings over HTTP and runs each through the submission
//! pipeline.
//!
//! ## Modules
//!
//! - `config` - `CollectorConfig`, env overrides, validation
//! - `handlers` - axum handlers and error mapping
//! - `router` - route table and middleware
//! - `sweeper` - periodic rate-limit eviction
//!
//! ## Request Flow
//!
//! ```text
//! POST /api/submit
//!        │
//!        ▼
//!   JSON decode ──fail──→ 400 malformed
//!        │
//!        ▼
//!   SubmissionPipeline ──rate_limited──→ 429
//!        │            ──bad_signature / invalid_payload──→ 400
//!        │            ──storage_unavailable──→ 503
//!        ▼
//!       200 {content_address, device_id, data_hash, timestamp}
//! ```

pub mod config;
pub mod handlers;
pub mod router;
pub mod sweeper;

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::config::CollectorConfig;
use crate::handlers::AppState;
use wa_05_submission_pipeline::{DeviceRegistry, InMemoryBlobStore, SubmissionPipeline};

/// The collector: pipeline, HTTP surface and background sweeper.
pub struct CollectorRuntime {
    config: CollectorConfig,
    state: AppState,
    shutdown_tx: watch::Sender<bool>,
}

impl CollectorRuntime {
    /// Wire the pipeline over an in-memory blob store.
    pub fn new(config: CollectorConfig) -> Self {
        let store = Arc::new(InMemoryBlobStore::with_capacity(config.blob_store.capacity));
        let pipeline = Arc::new(SubmissionPipeline::new(
            config.pipeline_config(),
            store,
            Arc::new(DeviceRegistry::new()),
        ));
        Self::with_pipeline(config, pipeline)
    }

    pub fn with_pipeline(config: CollectorConfig, pipeline: Arc<SubmissionPipeline>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            config,
            state: AppState::new(pipeline),
            shutdown_tx,
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn router(&self) -> Router {
        router::build_router(self.state.clone())
    }

    /// Serve on `listener` until `signal` resolves, then stop the sweeper.
    pub async fn serve<F>(&self, listener: TcpListener, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let sweeper = sweeper::spawn_sweeper(
            Arc::clone(&self.state.pipeline),
            self.config.sweep_interval(),
            self.shutdown_tx.subscribe(),
        );

        let addr = listener.local_addr().context("listener has no local address")?;
        info!(%addr, "Collector listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await
            .context("HTTP server failed")?;

        info!("Initiating graceful shutdown...");
        self.shutdown_tx.send_replace(true);
        sweeper.await.context("sweeper task panicked")?;
        info!("Shutdown complete");
        Ok(())
    }
}
