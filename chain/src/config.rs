//! Chain client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ChainError;

/// Connection settings for [`HttpChainClient`](crate::HttpChainClient).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Base URL of the node's RPC endpoint.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first attempt for transient failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First backoff delay in milliseconds; doubles on each retry.
    #[serde(default = "default_retry_wait_min_ms")]
    pub retry_wait_min_ms: u64,

    /// Upper bound on the backoff delay in milliseconds.
    #[serde(default = "default_retry_wait_max_ms")]
    pub retry_wait_max_ms: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_rpc_url() -> String {
    "https://main.rpc.agoric.net:443".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    4
}

fn default_retry_wait_min_ms() -> u64 {
    1_000
}

fn default_retry_wait_max_ms() -> u64 {
    30_000
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ChainConfig {
    pub fn with_url(rpc_url: &str) -> Self {
        Self {
            rpc_url: rpc_url.to_string(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_wait_min(&self) -> Duration {
        Duration::from_millis(self.retry_wait_min_ms)
    }

    pub fn retry_wait_max(&self) -> Duration {
        Duration::from_millis(self.retry_wait_max_ms)
    }

    pub fn validate(&self) -> Result<(), ChainError> {
        if self.rpc_url.trim().is_empty() {
            return Err(ChainError::Config("rpc_url must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ChainError::Config("timeout_secs must be positive".into()));
        }
        if self.retry_wait_min_ms > self.retry_wait_max_ms {
            return Err(ChainError::Config(format!(
                "retry_wait_min_ms ({}) exceeds retry_wait_max_ms ({})",
                self.retry_wait_min_ms, self.retry_wait_max_ms
            )));
        }
        Ok(())
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_wait_min_ms: default_retry_wait_min_ms(),
            retry_wait_max_ms: default_retry_wait_max_ms(),
        }
    }
}
