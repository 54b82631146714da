//! Concurrent block-timestamp sampling.
//!
//! A [`SamplePlan`] assigns each fetch its own slot, so workers never write
//! the same position. Fetches run on a fixed pool of tokio tasks draining a
//! shared queue; [`Sampler::sample`] returns only after every worker exits.

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

use blocktime_chain::ChainQuery;
use blocktime_types::Height;

/// One scheduled lookup: the block at `height` goes into slot `slot`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotFetch {
    pub slot: usize,
    pub height: Height,
}

/// The fetches a strategy needs, plus the shape of the slot array they fill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SamplePlan {
    slot_count: usize,
    fetches: Vec<SlotFetch>,
}

impl SamplePlan {
    /// Fetches whose slot is `>= slot_count` are still made, but their
    /// result is dropped by the sampler.
    pub fn new(slot_count: usize, fetches: Vec<SlotFetch>) -> Self {
        Self {
            slot_count,
            fetches,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn fetches(&self) -> &[SlotFetch] {
        &self.fetches
    }
}

/// Ordered block timestamps, one optional value per slot.
///
/// `None` marks a fetch that failed; it is never silently replaced by a
/// placeholder time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimestampSlots(Vec<Option<DateTime<Utc>>>);

impl TimestampSlots {
    /// `len` unset slots.
    pub fn empty(len: usize) -> Self {
        Self(vec![None; len])
    }

    pub fn from_vec(slots: Vec<Option<DateTime<Utc>>>) -> Self {
        Self(slots)
    }

    /// Store `time` in `slot`; `false` if the slot does not exist.
    fn fill(&mut self, slot: usize, time: DateTime<Utc>) -> bool {
        match self.0.get_mut(slot) {
            Some(entry) => {
                *entry = Some(time);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<DateTime<Utc>> {
        self.0.get(slot).copied().flatten()
    }

    /// `(slot, time)` for every filled slot, in slot order.
    pub fn present(&self) -> impl Iterator<Item = (usize, DateTime<Utc>)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|t| (i, t)))
    }

    /// Number of slots whose fetch failed.
    pub fn missing(&self) -> usize {
        self.0.iter().filter(|t| t.is_none()).count()
    }

    pub fn as_slice(&self) -> &[Option<DateTime<Utc>>] {
        &self.0
    }
}

/// Runs sample plans against a chain with a bounded number of workers.
pub struct Sampler {
    chain: Arc<dyn ChainQuery>,
    workers: usize,
}

impl Sampler {
    /// A sampler running at most `workers` fetches at a time (minimum 1).
    pub fn new(chain: Arc<dyn ChainQuery>, workers: usize) -> Self {
        Self {
            chain,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Execute `plan` and return the filled slots.
    ///
    /// Failed fetches are logged and leave their slot unset; they never abort
    /// the batch.
    pub async fn sample(&self, plan: &SamplePlan, show_progress: bool) -> TimestampSlots {
        let total = plan.fetches().len();
        let queue = Arc::new(Mutex::new(
            plan.fetches().iter().copied().collect::<VecDeque<_>>(),
        ));
        let slots = Arc::new(Mutex::new(TimestampSlots::empty(plan.slot_count())));
        let bar = progress_bar(total, show_progress);

        let worker_count = self.workers.min(total);
        let mut handles = Vec::with_capacity(worker_count);
        for worker in 0..worker_count {
            let queue = Arc::clone(&queue);
            let slots = Arc::clone(&slots);
            let chain = Arc::clone(&self.chain);
            let bar = bar.clone();
            handles.push(tokio::spawn(async move {
                loop {
                    let next = queue.lock().await.pop_front();
                    let Some(fetch) = next else { break };
                    match chain.block_time(fetch.height).await {
                        Ok(time) => {
                            tracing::debug!(worker, height = fetch.height, %time, "sampled block");
                            if !slots.lock().await.fill(fetch.slot, time) {
                                tracing::warn!(
                                    worker,
                                    height = fetch.height,
                                    slot = fetch.slot,
                                    "sample slot out of range, dropping timestamp"
                                );
                            }
                        }
                        Err(e) => {
                            tracing::warn!(
                                worker,
                                height = fetch.height,
                                slot = fetch.slot,
                                "failed to fetch block time: {e}"
                            );
                        }
                    }
                    bar.inc(1);
                }
            }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!("sampling worker failed: {e}");
            }
        }
        bar.finish_and_clear();

        let slots = slots.lock().await.clone();
        if slots.missing() > 0 {
            tracing::warn!(
                missing = slots.missing(),
                slots = slots.len(),
                "some block timestamps could not be fetched"
            );
        }
        slots
    }
}

fn progress_bar(total: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} blocks ({eta})") {
        bar.set_style(style);
    }
    bar
}
