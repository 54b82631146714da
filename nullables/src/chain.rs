//! Nullable chain node — a scripted [`ChainQuery`] for testing.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use blocktime_chain::{ChainError, ChainQuery};
use blocktime_types::Height;

/// A deterministic chain for testing.
///
/// Block `h` is stamped `genesis + h * spacing` (millisecond precision)
/// unless overridden. The tip
/// height follows a script: each `current_height` call pops the next scripted
/// tip, and the last one repeats once the script runs out.
pub struct NullChain {
    genesis: DateTime<Utc>,
    spacing: TimeDelta,
    tips: Mutex<TipScript>,
    overrides: Mutex<HashMap<Height, DateTime<Utc>>>,
    failing_heights: Mutex<HashSet<Height>>,
    fail_tip: AtomicBool,
    fetch_delay: Option<Duration>,
    queried_heights: Mutex<Vec<Height>>,
    height_queries: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

struct TipScript {
    upcoming: VecDeque<Height>,
    last: Height,
}

impl NullChain {
    pub fn new(tip: Height, genesis: DateTime<Utc>, spacing: TimeDelta) -> Self {
        Self {
            genesis,
            spacing,
            tips: Mutex::new(TipScript {
                upcoming: VecDeque::new(),
                last: tip,
            }),
            overrides: Mutex::new(HashMap::new()),
            failing_heights: Mutex::new(HashSet::new()),
            fail_tip: AtomicBool::new(false),
            fetch_delay: None,
            queried_heights: Mutex::new(Vec::new()),
            height_queries: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Script the tips returned by successive `current_height` calls.
    pub fn with_tips(self, tips: impl IntoIterator<Item = Height>) -> Self {
        {
            let mut script = lock(&self.tips);
            script.upcoming = tips.into_iter().collect();
        }
        self
    }

    /// Hold every timestamp fetch for `delay` so overlapping fetches are observable.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    /// Make every timestamp fetch for `height` fail with a transport error.
    pub fn fail_height(&self, height: Height) {
        lock(&self.failing_heights).insert(height);
    }

    /// Make `current_height` fail (or succeed again).
    pub fn fail_tip(&self, fail: bool) {
        self.fail_tip.store(fail, Ordering::SeqCst);
    }

    /// Override the timestamp of a single block.
    pub fn set_block_time(&self, height: Height, time: DateTime<Utc>) {
        lock(&self.overrides).insert(height, time);
    }

    /// The timestamp `block_time` reports for `height`.
    pub fn expected_time(&self, height: Height) -> DateTime<Utc> {
        if let Some(time) = lock(&self.overrides).get(&height) {
            return *time;
        }
        self.genesis + TimeDelta::milliseconds(self.spacing.num_milliseconds() * height as i64)
    }

    /// Number of `current_height` calls so far.
    pub fn height_queries(&self) -> usize {
        self.height_queries.load(Ordering::SeqCst)
    }

    /// Number of `block_time` calls so far.
    pub fn time_queries(&self) -> usize {
        lock(&self.queried_heights).len()
    }

    /// Heights passed to `block_time`, in call order.
    pub fn queried_heights(&self) -> Vec<Height> {
        lock(&self.queried_heights).clone()
    }

    /// Most `block_time` calls that were in progress at the same moment.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainQuery for NullChain {
    async fn current_height(&self) -> Result<Height, ChainError> {
        self.height_queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_tip.load(Ordering::SeqCst) {
            return Err(ChainError::Transport("null chain: tip unavailable".into()));
        }
        let mut script = lock(&self.tips);
        if let Some(next) = script.upcoming.pop_front() {
            script.last = next;
        }
        Ok(script.last)
    }

    async fn block_time(&self, height: Height) -> Result<DateTime<Utc>, ChainError> {
        lock(&self.queried_heights).push(height);
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        match self.fetch_delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if lock(&self.failing_heights).contains(&height) {
            return Err(ChainError::Transport(format!(
                "null chain: block {height} unavailable"
            )));
        }
        Ok(self.expected_time(height))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
