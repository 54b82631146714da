//! Reduction of sampled timestamps to a single block duration.

use chrono::TimeDelta;

use blocktime_types::{SampleWindow, StatMode};

use crate::strategy::SamplingStrategy;
use crate::{EstimatorError, TimestampSlots};

/// The outcome of one sampling pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockDuration {
    /// Estimated time between consecutive blocks.
    pub duration: TimeDelta,
    /// Mode that produced the estimate.
    pub mode: StatMode,
    /// Sample window the estimate covers.
    pub window: SampleWindow,
    /// Slots whose timestamp could not be fetched.
    pub missing: usize,
}

impl BlockDuration {
    pub fn as_secs_f64(&self) -> f64 {
        blocktime_utils::seconds_f64(self.duration)
    }
}

/// Reduce `slots` with `strategy` and log a one-line summary.
pub fn aggregate(
    strategy: &dyn SamplingStrategy,
    slots: &TimestampSlots,
    window: SampleWindow,
) -> Result<BlockDuration, EstimatorError> {
    let duration = strategy.reduce(slots, window)?;
    let estimate = BlockDuration {
        duration,
        mode: strategy.mode(),
        window,
        missing: slots.missing(),
    };
    tracing::info!(
        mode = %estimate.mode,
        missing = estimate.missing,
        "{} block time: {:.3}s ({} samples)",
        estimate.mode,
        estimate.as_secs_f64(),
        window
    );
    Ok(estimate)
}

/// Per-block deltas between consecutive filled slots, newest first.
///
/// Slot `i` is expected to hold the block `i` heights below the newest one.
/// Unset slots are skipped: a gap of `g` heights between two filled slots
/// contributes one delta of `(newer - older) / g`.
pub fn per_block_deltas(slots: &TimestampSlots) -> Result<Vec<TimeDelta>, EstimatorError> {
    let present: Vec<_> = slots.present().collect();
    present
        .windows(2)
        .map(|pair| {
            let (newer_slot, newer) = pair[0];
            let (older_slot, older) = pair[1];
            let gap = (older_slot - newer_slot) as i64;
            Ok(TimeDelta::nanoseconds(nanos(newer - older)? / gap))
        })
        .collect()
}

/// Median of `deltas`, or `None` when empty.
///
/// Even counts average the two central values.
pub fn median(deltas: &[TimeDelta]) -> Option<TimeDelta> {
    if deltas.is_empty() {
        return None;
    }
    let mut sorted = deltas.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        return Some(sorted[mid]);
    }
    let (low, high) = (sorted[mid - 1], sorted[mid]);
    Some(low + (high - low) / 2)
}

/// `delta` in whole nanoseconds.
pub(crate) fn nanos(delta: TimeDelta) -> Result<i64, EstimatorError> {
    delta.num_nanoseconds().ok_or(EstimatorError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn secs(v: &[i64]) -> Vec<TimeDelta> {
        v.iter().map(|s| TimeDelta::seconds(*s)).collect()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn median_of_even_count_averages_central_pair() {
        assert_eq!(
            median(&secs(&[10, 12, 11, 13])),
            Some(TimeDelta::milliseconds(11_500))
        );
    }

    #[test]
    fn median_of_odd_count_is_central_value() {
        assert_eq!(median(&secs(&[10, 12, 11])), Some(TimeDelta::seconds(11)));
    }

    #[test]
    fn median_of_single_and_empty() {
        assert_eq!(median(&secs(&[7])), Some(TimeDelta::seconds(7)));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn median_ignores_outliers() {
        assert_eq!(
            median(&secs(&[6, 6, 600, 5, 7])),
            Some(TimeDelta::seconds(6))
        );
    }

    #[test]
    fn deltas_run_newest_to_oldest() {
        let slots = TimestampSlots::from_vec(vec![Some(at(130)), Some(at(118)), Some(at(100))]);
        assert_eq!(per_block_deltas(&slots).unwrap(), secs(&[12, 18]));
    }

    #[test]
    fn unset_slot_is_bridged_by_the_gap() {
        let slots = TimestampSlots::from_vec(vec![
            Some(at(130)),
            None,
            Some(at(110)),
            Some(at(104)),
        ]);
        assert_eq!(per_block_deltas(&slots).unwrap(), secs(&[10, 6]));
    }

    #[test]
    fn fewer_than_two_filled_slots_yield_no_deltas() {
        let slots = TimestampSlots::from_vec(vec![None, Some(at(100)), None]);
        assert!(per_block_deltas(&slots).unwrap().is_empty());
    }

    #[test]
    fn negative_deltas_are_kept() {
        let slots = TimestampSlots::from_vec(vec![Some(at(100)), Some(at(106))]);
        assert_eq!(per_block_deltas(&slots).unwrap(), secs(&[-6]));
    }
}
