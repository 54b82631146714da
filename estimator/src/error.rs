use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

use blocktime_chain::ChainError;
use blocktime_types::{Height, TypesError};

#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid configuration: {0}")]
    Types(#[from] TypesError),

    #[error("chain query failed: {0}")]
    Chain(#[from] ChainError),

    #[error("height must be greater than current height (requested {requested}, current {current})")]
    HeightNotInFuture { requested: Height, current: Height },

    #[error("date must be in the future (requested {requested}, now {now})")]
    DateNotInFuture {
        requested: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("sample window of {window} blocks reaches past the start of a chain at height {current}")]
    WindowExceedsChain { window: u64, current: Height },

    #[error("not enough block timestamps sampled: {present} present, {required} required")]
    InsufficientSamples { present: usize, required: usize },

    #[error("estimated block duration {0} is not positive")]
    NonPositiveDuration(TimeDelta),

    #[error("projection overflowed")]
    Overflow,
}
