//! Statistical modes as sampling strategies.
//!
//! A mode decides both which heights are fetched and how the fetched
//! timestamps are reduced, so each variant owns its plan and its reduction.

use chrono::TimeDelta;

use blocktime_types::{Height, SampleWindow, StatMode};

use crate::aggregator::{median, nanos, per_block_deltas};
use crate::{EstimatorError, SamplePlan, SlotFetch, TimestampSlots};

pub trait SamplingStrategy: Send + Sync {
    fn mode(&self) -> StatMode;

    /// Heights to fetch for a chain whose tip is `current`.
    ///
    /// Callers guarantee `window < current`.
    fn plan(&self, current: Height, window: SampleWindow) -> SamplePlan;

    /// Reduce the slots filled from [`SamplingStrategy::plan`] to one block duration.
    fn reduce(
        &self,
        slots: &TimestampSlots,
        window: SampleWindow,
    ) -> Result<TimeDelta, EstimatorError>;

    /// Whether sampling takes long enough to be worth a progress bar.
    fn shows_progress(&self) -> bool {
        false
    }
}

/// The strategy implementing `mode`.
pub fn strategy_for(mode: StatMode) -> Box<dyn SamplingStrategy> {
    match mode {
        StatMode::Mean => Box::new(MeanStrategy),
        StatMode::Median => Box::new(MedianStrategy),
    }
}

/// Two fetches: the oldest block of the window (slot 0) and the tip (slot 1).
/// The span between them divided by the window is the mean block time.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeanStrategy;

impl SamplingStrategy for MeanStrategy {
    fn mode(&self) -> StatMode {
        StatMode::Mean
    }

    fn plan(&self, current: Height, window: SampleWindow) -> SamplePlan {
        SamplePlan::new(
            2,
            vec![
                SlotFetch {
                    slot: 0,
                    height: current.saturating_sub(window.get()),
                },
                SlotFetch {
                    slot: 1,
                    height: current,
                },
            ],
        )
    }

    fn reduce(
        &self,
        slots: &TimestampSlots,
        window: SampleWindow,
    ) -> Result<TimeDelta, EstimatorError> {
        let (Some(oldest), Some(newest)) = (slots.get(0), slots.get(1)) else {
            return Err(EstimatorError::InsufficientSamples {
                present: slots.len() - slots.missing(),
                required: 2,
            });
        };
        let blocks = i64::try_from(window.get()).map_err(|_| EstimatorError::Overflow)?;
        Ok(TimeDelta::nanoseconds(nanos(newest - oldest)? / blocks))
    }
}

/// One fetch per height from the tip (slot 0) down to `tip - window`
/// (slot `window`); the median per-block delta is the block time.
#[derive(Clone, Copy, Debug, Default)]
pub struct MedianStrategy;

impl SamplingStrategy for MedianStrategy {
    fn mode(&self) -> StatMode {
        StatMode::Median
    }

    fn plan(&self, current: Height, window: SampleWindow) -> SamplePlan {
        let fetches = (0..=window.get().min(current))
            .map(|offset| SlotFetch {
                slot: offset as usize,
                height: current - offset,
            })
            .collect();
        SamplePlan::new(window.get() as usize + 1, fetches)
    }

    fn reduce(
        &self,
        slots: &TimestampSlots,
        _window: SampleWindow,
    ) -> Result<TimeDelta, EstimatorError> {
        let deltas = per_block_deltas(slots)?;
        median(&deltas).ok_or(EstimatorError::InsufficientSamples {
            present: slots.len() - slots.missing(),
            required: 2,
        })
    }

    fn shows_progress(&self) -> bool {
        true
    }
}
