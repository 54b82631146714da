//! Access to a remote chain node.
//!
//! The estimator only ever needs two things from a chain: the current tip
//! height and the timestamp of a given block. [`ChainQuery`] is that port;
//! [`HttpChainClient`] implements it against a Tendermint-style RPC node.

pub mod client;
pub mod config;
pub mod error;
pub mod response;

pub use client::HttpChainClient;
pub use config::ChainConfig;
pub use error::ChainError;

use async_trait::async_trait;
use blocktime_types::Height;
use chrono::{DateTime, Utc};

/// Read-only queries against a chain node.
///
/// Implementations must be safe to share between concurrent sampling workers.
#[async_trait]
pub trait ChainQuery: Send + Sync {
    /// Height of the latest block known to the node.
    async fn current_height(&self) -> Result<Height, ChainError>;

    /// Header timestamp of the block at `height`.
    async fn block_time(&self, height: Height) -> Result<DateTime<Utc>, ChainError>;
}
