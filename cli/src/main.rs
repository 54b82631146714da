//! blocktime — estimate when a block height will be reached, or which height
//! the chain will be at on a given date.

mod date;
mod zones;

use anyhow::Context;
use blocktime_chain::HttpChainClient;
use blocktime_estimator::{Estimator, EstimatorConfig};
use blocktime_types::{StatMode, SystemClock};
use blocktime_utils::LogFormat;
use chrono::{DateTime, Local, TimeDelta, Utc};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "blocktime", about = "Estimate block heights and dates from sampled block times")]
#[command(group(ArgGroup::new("target").required(true).args(["height", "date"])))]
struct Cli {
    /// Specific height to estimate the time of.
    #[arg(long)]
    height: Option<u64>,

    /// Specific date to estimate the height at, e.g. "2025-06-01 15:04",
    /// RFC 3339, RFC 2822 or "@<unix seconds>". Offset-less dates are local time.
    #[arg(long)]
    date: Option<String>,

    /// Number of historical blocks to sample.
    #[arg(long, env = "BLOCKTIME_SAMPLES")]
    samples: Option<u64>,

    /// RPC endpoint to sample from.
    #[arg(long, env = "BLOCKTIME_RPC")]
    rpc: Option<String>,

    /// Number of concurrent fetches.
    #[arg(long, env = "BLOCKTIME_THREADS")]
    threads: Option<usize>,

    /// Statistical mode: "mean" or "median".
    #[arg(long, env = "BLOCKTIME_STATMODE")]
    statmode: Option<StatMode>,

    /// Voting period of the destination chain, e.g. "72h" or "3days".
    #[arg(long, default_value = "72h", value_parser = humantime::parse_duration)]
    voting_period: Duration,

    /// Comma-separated timezones: "Local", "UTC", IANA names like "Asia/Tokyo"
    /// or offsets like "+09:00".
    #[arg(long, default_value = zones::DEFAULT_ZONES, value_delimiter = ',')]
    timezones: Vec<String>,

    /// Disable the sampling progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "BLOCKTIME_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "BLOCKTIME_LOG_FORMAT")]
    log_format: LogFormat,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "BLOCKTIME_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    blocktime_utils::init_logging(cli.log_format, &cli.log_level);

    let config = build_config(&cli)?;
    let chain = Arc::new(HttpChainClient::new(&config.chain)?);
    let estimator = Estimator::new(&config, chain, Arc::new(SystemClock))?;
    let voting_period =
        TimeDelta::from_std(cli.voting_period).context("voting period is too long")?;

    tracing::info!(
        "sampling {} blocks from {} ({} mode, {} workers)",
        config.samples,
        config.chain.rpc_url,
        config.stat_mode,
        config.workers
    );

    if let Some(height) = cli.height {
        let date = estimator.estimate_date_for_height(height).await?;
        let warning = voting_warning(date, Utc::now(), voting_period);
        for line in date_report(height, date, &cli.timezones, warning) {
            println!("{line}");
        }
    } else if let Some(raw) = cli.date.as_deref() {
        let date = date::parse_date(raw, &Local)?;
        let height = estimator.estimate_height_for_date(date).await?;
        let warning = voting_warning(date, Utc::now(), voting_period);
        for line in height_report(date, height, &zones::Zone::Local, warning) {
            println!("{line}");
        }
    }

    Ok(())
}

/// File config (or defaults) with CLI flags and env vars layered on top.
fn build_config(cli: &Cli) -> anyhow::Result<EstimatorConfig> {
    let mut config = match cli.config {
        Some(ref path) => {
            let config = EstimatorConfig::from_toml_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            tracing::info!("Loaded config from {}", path.display());
            config
        }
        None => EstimatorConfig::default(),
    };

    if let Some(samples) = cli.samples {
        config.samples = samples;
    }
    if let Some(ref rpc) = cli.rpc {
        config.chain.rpc_url = rpc.clone();
    }
    if let Some(threads) = cli.threads {
        config.workers = threads;
    }
    if let Some(mode) = cli.statmode {
        config.stat_mode = mode;
    }
    if cli.no_progress {
        config.show_progress = false;
    }

    config.validate()?;
    Ok(config)
}

/// Warning banner when `target` falls before a voting period (plus an hour
/// of slack) started now would end.
fn voting_warning(
    target: DateTime<Utc>,
    now: DateTime<Utc>,
    voting_period: TimeDelta,
) -> Option<String> {
    let remaining = target - now;
    if remaining >= voting_period + TimeDelta::hours(1) {
        return None;
    }
    Some(format!(
        "****** WARNING ******\n\
         The date above is before the voting period ends\n\
         {}\n\
         ****** WARNING ******",
        blocktime_utils::format_duration(remaining)
    ))
}

/// Output for `--height`: the warning banner, if any, then one line per zone.
fn date_report(
    height: u64,
    date: DateTime<Utc>,
    timezones: &[String],
    warning: Option<String>,
) -> Vec<String> {
    let mut lines: Vec<String> = warning.into_iter().collect();
    lines.push(format!("Estimated time for height {height}:"));
    lines.extend(zones::render(date, timezones));
    lines
}

/// Output for `--date`: the warning banner, if any, then the height.
fn height_report(
    date: DateTime<Utc>,
    height: u64,
    zone: &zones::Zone,
    warning: Option<String>,
) -> Vec<String> {
    let mut lines: Vec<String> = warning.into_iter().collect();
    lines.push(format!(
        "Estimated block height at {} is {height}",
        zone.format(date)
    ));
    lines
}
