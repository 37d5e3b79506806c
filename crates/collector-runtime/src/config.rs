//! Collector configuration with validation.
//!
//! Every field has a default and can be overridden from the environment.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;
use wa_04_rate_limiting::{RateLimitConfig, RateLimitConfigError};
use wa_05_submission_pipeline::PipelineConfig;

/// Main collector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// HTTP listener
    pub server: ServerConfig,
    /// Per-device submission quota
    pub rate_limit: RateLimitConfig,
    /// Blob store settings
    pub blob_store: BlobStoreConfig,
    /// Seconds between sweeps of idle rate-limit state
    pub sweep_interval_secs: u64,
    /// Require `reading.device_id` to match the signing key
    pub enforce_device_binding: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            rate_limit: RateLimitConfig::default(),
            blob_store: BlobStoreConfig::default(),
            sweep_interval_secs: 300,
            enforce_device_binding: true,
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
        }
    }
}

/// Blob store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobStoreConfig {
    /// Upper bound on a single store call, seconds
    pub timeout_secs: u64,
    /// Readings kept by the in-memory store
    pub capacity: usize,
}

impl Default for BlobStoreConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            capacity: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid rate limit: {0}")]
    InvalidRateLimit(#[from] RateLimitConfigError),

    #[error("blob store timeout cannot be 0")]
    ZeroStoreTimeout,

    #[error("sweep interval cannot be 0")]
    ZeroSweepInterval,

    #[error("blob store capacity cannot be 0")]
    ZeroCapacity,
}

impl CollectorConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rate_limit.validate()?;
        if self.blob_store.timeout_secs == 0 {
            return Err(ConfigError::ZeroStoreTimeout);
        }
        if self.blob_store.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::ZeroSweepInterval);
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            rate_limit: self.rate_limit.clone(),
            enforce_device_binding: self.enforce_device_binding,
            store_timeout: Duration::from_secs(self.blob_store.timeout_secs),
            ..PipelineConfig::default()
        }
    }

    /// Defaults overridden by process environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply overrides from `lookup`. Unparseable values are logged and
    /// ignored.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `RATE_LIMIT_WINDOW` | `rate_limit.window_secs` |
    /// | `MAX_SUBMISSIONS_PER_WINDOW` | `rate_limit.max_submissions` |
    /// | `PORT` | `server.port` |
    /// | `WA_BIND_HOST` | `server.host` |
    /// | `WA_BLOB_STORE_TIMEOUT_SECS` | `blob_store.timeout_secs` |
    /// | `WA_BLOB_STORE_CAPACITY` | `blob_store.capacity` |
    /// | `WA_SWEEP_INTERVAL_SECS` | `sweep_interval_secs` |
    /// | `WA_ENFORCE_DEVICE_BINDING` | `enforce_device_binding` |
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        override_parsed(&lookup, "RATE_LIMIT_WINDOW", &mut self.rate_limit.window_secs);
        override_parsed(
            &lookup,
            "MAX_SUBMISSIONS_PER_WINDOW",
            &mut self.rate_limit.max_submissions,
        );
        override_parsed(&lookup, "PORT", &mut self.server.port);
        override_parsed(&lookup, "WA_BIND_HOST", &mut self.server.host);
        override_parsed(
            &lookup,
            "WA_BLOB_STORE_TIMEOUT_SECS",
            &mut self.blob_store.timeout_secs,
        );
        override_parsed(&lookup, "WA_BLOB_STORE_CAPACITY", &mut self.blob_store.capacity);
        override_parsed(&lookup, "WA_SWEEP_INTERVAL_SECS", &mut self.sweep_interval_secs);

        if let Some(value) = lookup("WA_ENFORCE_DEVICE_BINDING") {
            self.enforce_device_binding =
                wa_telemetry::parse_flag(&value, self.enforce_device_binding);
        }
    }
}

fn override_parsed<T, F>(lookup: &F, key: &str, target: &mut T)
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => warn!(key, value = %raw, "Ignoring unparseable environment override"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with_env(vars: &[(&str, &str)]) -> CollectorConfig {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = CollectorConfig::default();
        config.apply_overrides(|key| env.get(key).cloned());
        config
    }

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rate_limit.window_secs, 3600);
        assert_eq!(config.rate_limit.max_submissions, 12);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.blob_store.timeout_secs, 30);
        assert!(config.enforce_device_binding);
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_env_overrides() {
        let config = with_env(&[
            ("RATE_LIMIT_WINDOW", "60"),
            ("MAX_SUBMISSIONS_PER_WINDOW", "3"),
            ("PORT", "9000"),
            ("WA_BIND_HOST", "127.0.0.1"),
            ("WA_ENFORCE_DEVICE_BINDING", "false"),
        ]);

        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.rate_limit.max_submissions, 3);
        assert_eq!(config.listen_addr().to_string(), "127.0.0.1:9000");
        assert!(!config.enforce_device_binding);
    }

    #[test]
    fn test_unparseable_override_keeps_default() {
        let config = with_env(&[("PORT", "eighty"), ("RATE_LIMIT_WINDOW", "-5")]);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.rate_limit.window_secs, 3600);
    }

    #[test]
    fn test_zero_values_rejected() {
        let config = with_env(&[("MAX_SUBMISSIONS_PER_WINDOW", "0")]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidRateLimit(RateLimitConfigError::ZeroQuota))
        );

        let config = with_env(&[("RATE_LIMIT_WINDOW", "0")]);
        assert!(config.validate().is_err());

        let config = with_env(&[("WA_BLOB_STORE_TIMEOUT_SECS", "0")]);
        assert_eq!(config.validate(), Err(ConfigError::ZeroStoreTimeout));
    }

    #[test]
    fn test_pipeline_config_carries_settings() {
        let config = with_env(&[("WA_BLOB_STORE_TIMEOUT_SECS", "5")]);
        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.store_timeout, Duration::from_secs(5));
        assert_eq!(pipeline.rate_limit, config.rate_limit);
    }
}
