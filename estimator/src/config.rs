//! Estimator configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use blocktime_chain::ChainConfig;
use blocktime_types::{SampleWindow, StatMode};

use crate::EstimatorError;

/// Configuration for an [`Estimator`](crate::Estimator).
///
/// Can be loaded from a TOML file via [`EstimatorConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Number of historical blocks to sample.
    #[serde(default = "default_samples")]
    pub samples: u64,

    /// Maximum concurrent timestamp fetches.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// How sampled timestamps are reduced.
    #[serde(default)]
    pub stat_mode: StatMode,

    /// Whether multi-block sampling draws a progress bar on stderr.
    #[serde(default = "default_true")]
    pub show_progress: bool,

    /// Chain node connection settings.
    #[serde(default)]
    pub chain: ChainConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_samples() -> u64 {
    100
}

fn default_workers() -> usize {
    6
}

fn default_true() -> bool {
    true
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EstimatorConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, EstimatorError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EstimatorError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, EstimatorError> {
        toml::from_str(s).map_err(|e| EstimatorError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, EstimatorError> {
        toml::to_string_pretty(self).map_err(|e| EstimatorError::Config(e.to_string()))
    }

    /// The sample window, rejecting a zero sample count.
    pub fn window(&self) -> Result<SampleWindow, EstimatorError> {
        Ok(SampleWindow::new(self.samples)?)
    }

    /// Check every setting before any network activity happens.
    pub fn validate(&self) -> Result<(), EstimatorError> {
        self.window()?;
        if self.workers == 0 {
            return Err(EstimatorError::Config("workers must be positive".into()));
        }
        self.chain
            .validate()
            .map_err(|e| EstimatorError::Config(e.to_string()))
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            workers: default_workers(),
            stat_mode: StatMode::default(),
            show_progress: default_true(),
            chain: ChainConfig::default(),
        }
    }
}
