//! # Sliding-Window Rate Limiter
//!
//! Each device keeps the exact timestamps of its accepted submissions.
//! Timestamps at or before `now - window` are pruned lazily on every check.
//!
//! Per-device state lives in a `DashMap`; `entry()` holds the shard's write
//! lock for the whole prune-check-append sequence, so two concurrent
//! submissions from the same device can never both take the last slot.

use super::config::RateLimitConfig;
use crate::ports::outbound::{Millis, SystemTimeSource, TimeSource};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

/// Per-device sliding-window limiter.
pub struct RateLimiter {
    windows: DashMap<String, VecDeque<Millis>>,
    config: RateLimitConfig,
    clock: Arc<dyn TimeSource>,
}

impl RateLimiter {
    /// Limiter on the system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_time_source(config, Arc::new(SystemTimeSource))
    }

    pub fn with_time_source(config: RateLimitConfig, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            windows: DashMap::new(),
            config,
            clock,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn window_start(&self, now: Millis) -> Millis {
        now.saturating_sub(self.config.window_secs.saturating_mul(1000))
    }

    /// Record a submission for `device` if it is within quota.
    ///
    /// Returns `false` without recording when the device already has
    /// `max_submissions` entries inside the window.
    pub fn check_and_record(&self, device: &str) -> bool {
        let now = self.clock.now_millis();
        let window_start = self.window_start(now);
        let max = self.config.max_submissions as usize;

        let mut entry = self.windows.entry(device.to_owned()).or_default();
        let history = entry.value_mut();

        while history.front().is_some_and(|&t| t <= window_start) {
            history.pop_front();
        }

        if history.len() >= max {
            debug!(device, in_window = history.len(), "Submission quota exhausted");
            return false;
        }

        history.push_back(now);
        true
    }

    /// Drop devices with no submissions left inside the window.
    ///
    /// Returns the number of devices removed.
    pub fn sweep(&self) -> usize {
        let window_start = self.window_start(self.clock.now_millis());
        let before = self.windows.len();

        self.windows.retain(|_, history| {
            while history.front().is_some_and(|&t| t <= window_start) {
                history.pop_front();
            }
            !history.is_empty()
        });

        let removed = before.saturating_sub(self.windows.len());
        if removed > 0 {
            debug!(removed, "Swept idle rate limit windows");
        }
        removed
    }

    /// Number of devices with state held.
    pub fn tracked_devices(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::ManualTimeSource;

    const T0: Millis = 1_700_000_000_000;

    fn limiter(window_secs: u64, max: u32) -> (RateLimiter, Arc<ManualTimeSource>) {
        let clock = Arc::new(ManualTimeSource::new(T0));
        let limiter = RateLimiter::with_time_source(
            RateLimitConfig {
                window_secs,
                max_submissions: max,
            },
            clock.clone(),
        );
        (limiter, clock)
    }

    #[test]
    fn test_default_quota_rejects_thirteenth() {
        let (limiter, clock) = limiter(3600, 12);

        for i in 0..12 {
            assert!(limiter.check_and_record("dev-a"), "submission {i}");
            clock.advance(50);
        }
        assert!(!limiter.check_and_record("dev-a"));
    }

    #[test]
    fn test_rejection_is_not_recorded() {
        let (limiter, clock) = limiter(10, 1);

        assert!(limiter.check_and_record("dev"));
        clock.advance(5_000);
        assert!(!limiter.check_and_record("dev"));

        // Only the first submission occupies the window, so it frees up
        // 10s after the first, not after the rejected attempt.
        clock.advance(5_000);
        assert!(limiter.check_and_record("dev"));
    }

    #[test]
    fn test_entry_on_window_start_is_expired() {
        let (limiter, clock) = limiter(10, 1);

        assert!(limiter.check_and_record("dev"));
        clock.advance(9_999);
        assert!(!limiter.check_and_record("dev"));
        clock.advance(1);
        assert!(limiter.check_and_record("dev"));
    }

    #[test]
    fn test_window_slides() {
        let (limiter, clock) = limiter(60, 3);

        assert!(limiter.check_and_record("dev")); // t=0
        clock.advance(20_000);
        assert!(limiter.check_and_record("dev")); // t=20
        clock.advance(20_000);
        assert!(limiter.check_and_record("dev")); // t=40
        assert!(!limiter.check_and_record("dev"));

        clock.advance(20_001); // t=60.001, first entry expired
        assert!(limiter.check_and_record("dev"));
        assert!(!limiter.check_and_record("dev"));
    }

    #[test]
    fn test_devices_are_independent() {
        let (limiter, _) = limiter(3600, 1);

        assert!(limiter.check_and_record("dev-a"));
        assert!(!limiter.check_and_record("dev-a"));
        assert!(limiter.check_and_record("dev-b"));
        assert_eq!(limiter.tracked_devices(), 2);
    }

    #[test]
    fn test_sweep_drops_idle_devices() {
        let (limiter, clock) = limiter(60, 5);

        limiter.check_and_record("idle");
        clock.advance(30_000);
        limiter.check_and_record("active");
        clock.advance(31_000);

        assert_eq!(limiter.sweep(), 1);
        assert_eq!(limiter.tracked_devices(), 1);

        // "active" still holds one slot; "idle" starts from a full quota.
        assert_eq!((0..5).filter(|_| limiter.check_and_record("active")).count(), 4);
        assert_eq!((0..6).filter(|_| limiter.check_and_record("idle")).count(), 5);
    }

    #[test]
    fn test_concurrent_submissions_never_exceed_quota() {
        let (limiter, _) = limiter(3600, 12);
        let limiter = Arc::new(limiter);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || {
                    (0..10).filter(|_| limiter.check_and_record("shared")).count()
                })
            })
            .collect();

        let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(accepted, 12);
    }
}
