//! Height/date projection on top of a sampled block duration.

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;

use blocktime_chain::ChainQuery;
use blocktime_types::{Clock, Height, SampleWindow, StatMode};

use crate::aggregator::{self, nanos, BlockDuration};
use crate::strategy::{strategy_for, SamplingStrategy};
use crate::{EstimatorConfig, EstimatorError, Sampler};

/// Projects block heights to dates and dates to heights.
///
/// Nothing is cached between calls: every estimate reads the tip, samples a
/// fresh window and reads the tip again afterwards so blocks produced while
/// sampling are accounted for.
pub struct Estimator {
    chain: Arc<dyn ChainQuery>,
    clock: Arc<dyn Clock>,
    window: SampleWindow,
    strategy: Box<dyn SamplingStrategy>,
    sampler: Sampler,
    show_progress: bool,
}

impl Estimator {
    /// Build an estimator, rejecting invalid settings before any network activity.
    pub fn new(
        config: &EstimatorConfig,
        chain: Arc<dyn ChainQuery>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, EstimatorError> {
        config.validate()?;
        Ok(Self {
            sampler: Sampler::new(Arc::clone(&chain), config.workers),
            chain,
            clock,
            window: config.window()?,
            strategy: strategy_for(config.stat_mode),
            show_progress: config.show_progress,
        })
    }

    pub fn mode(&self) -> StatMode {
        self.strategy.mode()
    }

    pub fn window(&self) -> SampleWindow {
        self.window
    }

    /// Sample the window below the current tip and reduce it.
    pub async fn estimate_block_duration(&self) -> Result<BlockDuration, EstimatorError> {
        let current = self.chain.current_height().await?;
        self.block_duration_below(current).await
    }

    /// Estimated wall-clock time at which `height` will be produced.
    pub async fn estimate_date_for_height(
        &self,
        height: Height,
    ) -> Result<DateTime<Utc>, EstimatorError> {
        let current = self.chain.current_height().await?;
        if height <= current {
            return Err(EstimatorError::HeightNotInFuture {
                requested: height,
                current,
            });
        }

        let estimate = self.block_duration_below(current).await?;
        let current = self.chain.current_height().await?;

        let remaining_blocks = height as i128 - current as i128;
        let gap = i64::try_from(nanos(estimate.duration)? as i128 * remaining_blocks)
            .map_err(|_| EstimatorError::Overflow)?;
        let date = self
            .clock
            .now()
            .checked_add_signed(TimeDelta::nanoseconds(gap))
            .ok_or(EstimatorError::Overflow)?;

        tracing::debug!(
            height,
            current,
            remaining_blocks = %remaining_blocks,
            %date,
            "projected date"
        );
        Ok(date)
    }

    /// Estimated height of the chain at `date`.
    pub async fn estimate_height_for_date(
        &self,
        date: DateTime<Utc>,
    ) -> Result<Height, EstimatorError> {
        let now = self.clock.now();
        if date <= now {
            return Err(EstimatorError::DateNotInFuture {
                requested: date,
                now,
            });
        }

        let estimate = self.estimate_block_duration().await?;
        let current = self.chain.current_height().await?;

        let per_block = nanos(estimate.duration)?;
        if per_block <= 0 {
            return Err(EstimatorError::NonPositiveDuration(estimate.duration));
        }
        let remaining = nanos(date - self.clock.now())?;
        // Floor division; a date already passed while sampling projects no blocks.
        let blocks = u64::try_from(remaining.max(0) / per_block)
            .map_err(|_| EstimatorError::Overflow)?;
        let height = current.checked_add(blocks).ok_or(EstimatorError::Overflow)?;

        tracing::debug!(%date, current, blocks, height, "projected height");
        Ok(height)
    }

    async fn block_duration_below(
        &self,
        current: Height,
    ) -> Result<BlockDuration, EstimatorError> {
        if self.window.get() >= current {
            return Err(EstimatorError::WindowExceedsChain {
                window: self.window.get(),
                current,
            });
        }
        let plan = self.strategy.plan(current, self.window);
        let show_progress = self.show_progress && self.strategy.shows_progress();
        let slots = self.sampler.sample(&plan, show_progress).await;
        aggregator::aggregate(self.strategy.as_ref(), &slots, self.window)
    }
}
