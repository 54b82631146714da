//! Wire types for the Tendermint/CometBFT RPC endpoints used by the client.
//!
//! Only the fields the estimator reads are modelled; everything else in the
//! payload is ignored. Heights are transmitted as decimal strings.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use blocktime_types::Height;

use crate::ChainError;

/// `GET /status`
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub result: StatusResult,
}

#[derive(Debug, Deserialize)]
pub struct StatusResult {
    pub sync_info: SyncInfo,
}

#[derive(Debug, Deserialize)]
pub struct SyncInfo {
    pub latest_block_height: String,
}

impl StatusResponse {
    pub fn latest_height(&self) -> Result<Height, ChainError> {
        parse_height(&self.result.sync_info.latest_block_height)
    }
}

/// `GET /block?height=N`
#[derive(Debug, Deserialize)]
pub struct BlockResponse {
    pub result: BlockResult,
}

#[derive(Debug, Deserialize)]
pub struct BlockResult {
    pub block: Block,
}

#[derive(Debug, Deserialize)]
pub struct Block {
    pub header: Header,
}

#[derive(Debug, Deserialize)]
pub struct Header {
    pub height: String,
    pub time: DateTime<Utc>,
}

impl BlockResponse {
    pub fn time(&self) -> DateTime<Utc> {
        self.result.block.header.time
    }
}

fn parse_height(raw: &str) -> Result<Height, ChainError> {
    raw.trim()
        .parse()
        .map_err(|e| ChainError::Decode(format!("invalid height {raw:?}: {e}")))
}
