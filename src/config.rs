//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::time::Duration;

use chrono::TimeDelta;

/// Default TTL in milliseconds
const DEFAULT_TTL_MS: i64 = 300_000;
/// Default cleanup period in milliseconds
const DEFAULT_CLEANUP_PERIOD_MS: u64 = 1_000;

/// Cache construction parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL applied by `add`; zero means entries never expire
    pub default_ttl: TimeDelta,
    /// Interval between background sweeps; zero disables the sweeper
    pub cleanup_period: Duration,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds, may be zero or negative (default: 300000)
    /// - `CACHE_CLEANUP_PERIOD_MS` - Sweep period in milliseconds, 0 disables sweeping (default: 1000)
    pub fn from_env() -> Self {
        let default_ttl = env::var("CACHE_DEFAULT_TTL_MS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or_else(|| TimeDelta::milliseconds(DEFAULT_TTL_MS));
        let cleanup_period_ms = env::var("CACHE_CLEANUP_PERIOD_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CLEANUP_PERIOD_MS);

        Self {
            default_ttl,
            cleanup_period: Duration::from_millis(cleanup_period_ms),
        }
    }

    /// Sets the TTL applied by `add`.
    pub fn with_default_ttl(mut self, ttl: TimeDelta) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Sets the interval between background sweeps.
    pub fn with_cleanup_period(mut self, period: Duration) -> Self {
        self.cleanup_period = period;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: TimeDelta::milliseconds(DEFAULT_TTL_MS),
            cleanup_period: Duration::from_millis(DEFAULT_CLEANUP_PERIOD_MS),
        }
    }
}
