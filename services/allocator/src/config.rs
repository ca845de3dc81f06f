//! Configuration for the allocator service.

use std::time::Duration;

use anyhow::Result;
use droidfarm_retry::RetryPolicy;

/// Allocator configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the forced-teardown ledger file.
    pub cleanup_ledger_path: String,

    /// Readiness wait: retries after the first poll.
    pub readiness_retries: u32,

    /// Readiness wait: base delay between polls, in milliseconds.
    pub readiness_interval_ms: u64,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let cleanup_ledger_path = std::env::var("DROIDFARM_CLEANUP_LEDGER")
            .unwrap_or_else(|_| "/var/lib/droidfarm/cleanup.json".to_string());

        let readiness_retries = std::env::var("DROIDFARM_READINESS_RETRIES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(24);

        let readiness_interval_ms = std::env::var("DROIDFARM_READINESS_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(2000);

        let log_level = std::env::var("DROIDFARM_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            cleanup_ledger_path,
            readiness_retries,
            readiness_interval_ms,
            log_level,
        })
    }

    /// The retry policy driving the readiness wait.
    pub fn readiness_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.readiness_retries,
            interval: Duration::from_millis(self.readiness_interval_ms),
            ..RetryPolicy::default()
        }
    }
}
