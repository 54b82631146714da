//! Block-time estimation.
//!
//! Samples historical block timestamps from a chain node, reduces them to a
//! representative block duration and projects heights to dates (and back).
//!
//! Pipeline for every estimate:
//! 1. [`Estimator`] resolves the current height through a
//!    [`ChainQuery`](blocktime_chain::ChainQuery).
//! 2. The active [`SamplingStrategy`] turns it into a [`SamplePlan`].
//! 3. The [`Sampler`] runs the plan on a bounded worker pool into [`TimestampSlots`].
//! 4. The [`aggregator`] reduces the slots to a [`BlockDuration`].
//! 5. The estimator re-reads the height and projects linearly.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod estimator;
pub mod sampler;
pub mod strategy;

pub use aggregator::BlockDuration;
pub use config::EstimatorConfig;
pub use error::EstimatorError;
pub use estimator::Estimator;
pub use sampler::{SamplePlan, Sampler, SlotFetch, TimestampSlots};
pub use strategy::{strategy_for, MeanStrategy, MedianStrategy, SamplingStrategy};
