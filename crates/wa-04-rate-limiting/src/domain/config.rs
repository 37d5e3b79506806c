//! Rate limit configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sliding-window quota: at most `max_submissions` per device within any
/// `window_secs` span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window length in seconds
    pub window_secs: u64,
    /// Submissions allowed per device per window
    pub max_submissions: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 3600,
            max_submissions: 12,
        }
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> Result<(), RateLimitConfigError> {
        if self.window_secs == 0 {
            return Err(RateLimitConfigError::ZeroWindow);
        }
        if self.max_submissions == 0 {
            return Err(RateLimitConfigError::ZeroQuota);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitConfigError {
    #[error("rate limit window cannot be 0")]
    ZeroWindow,
    #[error("max submissions per window cannot be 0")]
    ZeroQuota,
}
