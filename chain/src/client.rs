//! HTTP client for a Tendermint-style chain node.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::time::Duration;

use blocktime_types::Height;

use crate::response::{BlockResponse, StatusResponse};
use crate::{ChainConfig, ChainError, ChainQuery};

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for querying a chain node's RPC endpoint.
///
/// Sends `GET /status` for the tip height and `GET /block?height=N` for block
/// timestamps. Transient failures are retried with exponential backoff; the
/// underlying `reqwest::Client` keeps a connection pool and is cheap to share.
pub struct HttpChainClient {
    /// Base URL without a trailing slash.
    base_url: String,
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    max_retries: u32,
    retry_wait_min: Duration,
    retry_wait_max: Duration,
}

impl HttpChainClient {
    pub fn new(config: &ChainConfig) -> Result<Self, ChainError> {
        config.validate()?;
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(config.timeout()))
            .build()
            .map_err(|e| ChainError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: config.rpc_url.trim_end_matches('/').to_string(),
            http_client,
            max_retries: config.max_retries,
            retry_wait_min: config.retry_wait_min(),
            retry_wait_max: config.retry_wait_max(),
        })
    }

    /// Create a client for `rpc_url` with default timeouts and retries.
    pub fn with_url(rpc_url: &str) -> Result<Self, ChainError> {
        Self::new(&ChainConfig::with_url(rpc_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}{path}` and decode the JSON body, retrying transient failures.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ChainError> {
        let url = format!("{}{}", self.base_url, path);
        let mut wait = self.retry_wait_min;
        let mut attempt = 0;
        loop {
            match self.get_json_once(&url).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        url = %url,
                        attempt,
                        max_retries = self.max_retries,
                        "chain query failed ({e}), retrying in {wait:?}"
                    );
                    tokio::time::sleep(wait).await;
                    // Exponential backoff
                    wait = (wait * 2).min(self.retry_wait_max);
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_json_once<T: DeserializeOwned>(&self, url: &str) -> Result<T, ChainError> {
        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ChainError::Transport(format!("request timed out: {e}"))
            } else if e.is_connect() {
                ChainError::Transport(format!("connection failed: {e}"))
            } else {
                ChainError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChainError::BadStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ChainError::Transport(format!("failed to read body: {e}")))?;
        serde_json::from_slice(&body).map_err(|e| ChainError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ChainQuery for HttpChainClient {
    async fn current_height(&self) -> Result<Height, ChainError> {
        let status: StatusResponse = self.get_json("/status").await?;
        status.latest_height()
    }

    async fn block_time(&self, height: Height) -> Result<DateTime<Utc>, ChainError> {
        let block: BlockResponse = self.get_json(&format!("/block?height={height}")).await?;
        Ok(block.time())
    }
}
