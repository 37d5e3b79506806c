//! Periodic eviction of idle rate-limit state.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use wa_05_submission_pipeline::SubmissionPipeline;

/// Sweep every `period` until `shutdown` flips.
pub fn spawn_sweeper(
    pipeline: Arc<SubmissionPipeline>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately; nothing to sweep yet.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = pipeline.sweep();
                    debug!(removed, "Rate limit sweep");
                }
                _ = shutdown.changed() => {
                    info!("Sweeper shutting down");
                    break;
                }
            }
        }
    })
}
