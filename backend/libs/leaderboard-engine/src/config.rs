//! Engine configuration.
//!
//! Loaded from environment variables, like every Tally service.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Ranking store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Redis URL (redis://host:port)
    pub url: String,
    /// Per-command deadline in milliseconds
    pub operation_timeout_ms: u64,
}

impl StoreConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(StoreConfig {
            url: std::env::var("REDIS_URL").context("REDIS_URL environment variable not set")?,
            operation_timeout_ms: std::env::var("REDIS_COMMAND_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3_000),
        })
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}
