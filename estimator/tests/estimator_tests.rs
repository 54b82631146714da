//! End-to-end tests of the estimator against the nullable chain and clock.

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;

use blocktime_estimator::{Estimator, EstimatorConfig, EstimatorError};
use blocktime_nullables::{NullChain, NullClock};
use blocktime_types::{Height, StatMode};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TIP: Height = 10_000;
const SPACING_SECS: i64 = 6;

fn genesis() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn chain() -> Arc<NullChain> {
    Arc::new(NullChain::new(TIP, genesis(), TimeDelta::seconds(SPACING_SECS)))
}

fn clock_at_tip(chain: &NullChain) -> Arc<NullClock> {
    Arc::new(NullClock::new(chain.expected_time(TIP)))
}

fn config(samples: u64, workers: usize, stat_mode: StatMode) -> EstimatorConfig {
    EstimatorConfig {
        samples,
        workers,
        stat_mode,
        show_progress: false,
        ..EstimatorConfig::default()
    }
}

fn estimator(chain: &Arc<NullChain>, clock: &Arc<NullClock>, config: EstimatorConfig) -> Estimator {
    Estimator::new(&config, chain.clone(), clock.clone()).expect("valid config")
}

// ---------------------------------------------------------------------------
// Validation happens before sampling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn height_at_or_below_tip_is_rejected_without_sampling() {
    let chain = chain();
    let clock = clock_at_tip(&chain);
    let est = estimator(&chain, &clock, config(100, 6, StatMode::Median));

    for height in [TIP, TIP - 1, 1] {
        let err = est.estimate_date_for_height(height).await.unwrap_err();
        assert!(matches!(
            err,
            EstimatorError::HeightNotInFuture { requested, current: TIP } if requested == height
        ));
    }
    assert_eq!(chain.time_queries(), 0);
}

#[tokio::test]
async fn date_not_in_future_is_rejected_without_sampling() {
    let chain = chain();
    let clock = clock_at_tip(&chain);
    let est = estimator(&chain, &clock, config(100, 6, StatMode::Mean));

    for date in [clock_now(&clock), clock_now(&clock) - TimeDelta::days(1)] {
        let err = est.estimate_height_for_date(date).await.unwrap_err();
        assert!(matches!(err, EstimatorError::DateNotInFuture { .. }));
    }
    assert_eq!(chain.height_queries(), 0);
    assert_eq!(chain.time_queries(), 0);
}

fn clock_now(clock: &NullClock) -> DateTime<Utc> {
    use blocktime_types::Clock;
    clock.now()
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let chain = chain();
    let clock = clock_at_tip(&chain);

    let zero_samples = Estimator::new(&config(0, 6, StatMode::Mean), chain.clone(), clock.clone());
    assert!(matches!(zero_samples, Err(EstimatorError::Types(_))));

    let zero_workers = Estimator::new(&config(10, 0, StatMode::Mean), chain.clone(), clock.clone());
    assert!(matches!(zero_workers, Err(EstimatorError::Config(_))));

    assert_eq!(chain.height_queries(), 0);
}

#[tokio::test]
async fn window_longer_than_chain_is_rejected() {
    let chain = Arc::new(NullChain::new(50, genesis(), TimeDelta::seconds(6)));
    let clock = Arc::new(NullClock::new(chain.expected_time(50)));
    let est = estimator(&chain, &clock, config(100, 6, StatMode::Median));

    let err = est.estimate_block_duration().await.unwrap_err();
    assert!(matches!(
        err,
        EstimatorError::WindowExceedsChain { window: 100, current: 50 }
    ));
    assert_eq!(chain.time_queries(), 0);
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn date_projects_from_tip_read_after_sampling() {
    // First read sees TIP; the chain advances 10 blocks while sampling.
    let chain = Arc::new(
        NullChain::new(TIP, genesis(), TimeDelta::seconds(SPACING_SECS)).with_tips([TIP, TIP + 10]),
    );
    let clock = clock_at_tip(&chain);
    let est = estimator(&chain, &clock, config(100, 6, StatMode::Mean));

    let date = est.estimate_date_for_height(TIP + 110).await.unwrap();

    assert_eq!(date, clock_now(&clock) + TimeDelta::seconds(100 * SPACING_SECS));
    assert_eq!(chain.height_queries(), 2);
    assert_eq!(chain.queried_heights().len(), 2);
}

#[tokio::test]
async fn height_projects_with_floor_division() {
    let chain = Arc::new(
        NullChain::new(TIP, genesis(), TimeDelta::seconds(SPACING_SECS)).with_tips([TIP, TIP + 5]),
    );
    let clock = clock_at_tip(&chain);
    let est = estimator(&chain, &clock, config(100, 6, StatMode::Median));

    // 603s ahead at 6s per block -> 100 whole blocks.
    let target = clock_now(&clock) + TimeDelta::seconds(603);
    let height = est.estimate_height_for_date(target).await.unwrap();

    assert_eq!(height, TIP + 5 + 100);
    assert_eq!(chain.height_queries(), 2);
    assert_eq!(chain.time_queries(), 101);
}

#[tokio::test]
async fn zero_block_duration_cannot_project_height() {
    let chain = chain();
    chain.set_block_time(TIP - 100, chain.expected_time(TIP));
    let clock = clock_at_tip(&chain);
    let est = estimator(&chain, &clock, config(100, 6, StatMode::Mean));

    let err = est
        .estimate_height_for_date(clock_now(&clock) + TimeDelta::hours(1))
        .await
        .unwrap_err();
    assert!(matches!(err, EstimatorError::NonPositiveDuration(d) if d == TimeDelta::zero()));
}

// ---------------------------------------------------------------------------
// Sampling modes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mean_and_median_agree_on_regular_chain() {
    let chain = chain();
    let clock = clock_at_tip(&chain);

    let mean = estimator(&chain, &clock, config(50, 6, StatMode::Mean))
        .estimate_block_duration()
        .await
        .unwrap();
    let median = estimator(&chain, &clock, config(50, 6, StatMode::Median))
        .estimate_block_duration()
        .await
        .unwrap();

    assert_eq!(mean.duration, TimeDelta::seconds(SPACING_SECS));
    assert_eq!(median.duration, mean.duration);
    assert_eq!(mean.mode, StatMode::Mean);
    assert_eq!(median.mode, StatMode::Median);
}

#[tokio::test]
async fn mean_samples_only_window_endpoints() {
    let chain = chain();
    let clock = clock_at_tip(&chain);
    estimator(&chain, &clock, config(100, 6, StatMode::Mean))
        .estimate_block_duration()
        .await
        .unwrap();

    let mut heights = chain.queried_heights();
    heights.sort_unstable();
    assert_eq!(heights, vec![TIP - 100, TIP]);
}

#[tokio::test]
async fn median_tolerates_a_failing_height() {
    let chain = chain();
    let base = genesis();
    // Newest-first deltas 13s, 12s, 11s, 10s; block TIP-2 never answers.
    chain.set_block_time(TIP, base + TimeDelta::seconds(46));
    chain.set_block_time(TIP - 1, base + TimeDelta::seconds(33));
    chain.set_block_time(TIP - 2, base + TimeDelta::seconds(21));
    chain.set_block_time(TIP - 3, base + TimeDelta::seconds(10));
    chain.set_block_time(TIP - 4, base);
    chain.fail_height(TIP - 2);
    let clock = clock_at_tip(&chain);

    let estimate = estimator(&chain, &clock, config(4, 3, StatMode::Median))
        .estimate_block_duration()
        .await
        .unwrap();

    // The gap is bridged: deltas 13s, (33-10)/2 = 11.5s, 10s -> median 11.5s.
    assert_eq!(estimate.duration, TimeDelta::milliseconds(11_500));
    assert_eq!(estimate.missing, 1);
}

#[tokio::test]
async fn mean_fails_when_an_endpoint_is_missing() {
    let chain = chain();
    chain.fail_height(TIP - 100);
    let clock = clock_at_tip(&chain);

    let err = estimator(&chain, &clock, config(100, 6, StatMode::Mean))
        .estimate_block_duration()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EstimatorError::InsufficientSamples { present: 1, required: 2 }
    ));
}

#[tokio::test]
async fn worker_limit_does_not_change_estimate() {
    let chain = chain();
    for h in (TIP - 30..=TIP).step_by(4) {
        chain.set_block_time(h, chain.expected_time(h) + TimeDelta::seconds(2));
    }
    let clock = clock_at_tip(&chain);

    let serial = estimator(&chain, &clock, config(30, 1, StatMode::Median))
        .estimate_block_duration()
        .await
        .unwrap();
    let wide = estimator(&chain, &clock, config(30, 64, StatMode::Median))
        .estimate_block_duration()
        .await
        .unwrap();

    assert_eq!(serial, wide);
}

// ---------------------------------------------------------------------------
// Chain failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tip_lookup_failure_aborts_estimate() {
    let chain = chain();
    chain.fail_tip(true);
    let clock = clock_at_tip(&chain);
    let est = estimator(&chain, &clock, config(10, 2, StatMode::Median));

    assert!(matches!(
        est.estimate_date_for_height(TIP + 1).await,
        Err(EstimatorError::Chain(_))
    ));
    assert!(matches!(
        est.estimate_height_for_date(clock_now(&clock) + TimeDelta::hours(1)).await,
        Err(EstimatorError::Chain(_))
    ));
    assert_eq!(chain.time_queries(), 0);
}
