//! Prometheus metrics for the collector.
//!
//! All metrics follow the naming convention: `wa_<area>_<metric>_<unit>`.
//! Metrics can be recorded before [`register_metrics`] runs; registration
//! only makes them visible to [`encode_metrics`].

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge,
    Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Collector metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Submissions by terminal outcome
    pub static ref SUBMISSIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("wa_submissions_total", "Submissions processed, by outcome"),
        &["outcome"]  // accepted/rate_limited/bad_signature/invalid_payload/storage_unavailable
    ).expect("metric creation failed");

    /// Signature stage latency
    pub static ref SIGNATURE_VERIFICATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "wa_signature_verification_duration_seconds",
            "Time spent verifying submission signatures"
        ).buckets(exponential_buckets(0.00005, 2.0, 12).expect("valid bucket layout"))
    ).expect("metric creation failed");

    /// Devices with rate limit state held
    pub static ref RATE_LIMIT_TRACKED_DEVICES: IntGauge = IntGauge::new(
        "wa_rate_limit_tracked_devices",
        "Devices with submissions inside the current rate limit window"
    ).expect("metric creation failed");

    /// Blob store errors and timeouts
    pub static ref BLOB_STORE_FAILURES: IntCounter = IntCounter::new(
        "wa_blob_store_failures_total",
        "Accepted readings the blob store failed to store"
    ).expect("metric creation failed");

    /// Registered devices
    pub static ref REGISTERED_DEVICES: IntGauge = IntGauge::new(
        "wa_registered_devices",
        "Devices known to the registry"
    ).expect("metric creation failed");
}

/// Register all collector metrics. Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(SUBMISSIONS_TOTAL.clone()),
        Box::new(SIGNATURE_VERIFICATION_DURATION.clone()),
        Box::new(RATE_LIMIT_TRACKED_DEVICES.clone()),
        Box::new(BLOB_STORE_FAILURES.clone()),
        Box::new(REGISTERED_DEVICES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Render the registry in Prometheus text exposition format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Observes elapsed time into a histogram when dropped.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_twice_is_ok() {
        assert!(register_metrics().is_ok());
        assert!(register_metrics().is_ok());
    }

    #[test]
    fn test_encoded_output_names_metrics() {
        register_metrics().unwrap();
        SUBMISSIONS_TOTAL.with_label_values(&["accepted"]).inc();
        BLOB_STORE_FAILURES.inc();

        let text = encode_metrics().unwrap();
        assert!(text.contains("wa_submissions_total"));
        assert!(text.contains("outcome=\"accepted\""));
        assert!(text.contains("wa_blob_store_failures_total"));
    }

    #[test]
    fn test_histogram_timer_observes_on_drop() {
        let before = SIGNATURE_VERIFICATION_DURATION.get_sample_count();
        {
            let _timer = HistogramTimer::new(&SIGNATURE_VERIFICATION_DURATION);
        }
        assert!(SIGNATURE_VERIFICATION_DURATION.get_sample_count() > before);
    }
}
