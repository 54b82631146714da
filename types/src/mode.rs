//! Statistical mode used to reduce sampled block times.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// How sampled block timestamps are reduced to a single block duration.
///
/// The mode also decides *what* is sampled: [`StatMode::Mean`] only needs the
/// two ends of the window, while [`StatMode::Median`] needs every block in it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatMode {
    /// Total span of the window divided by its length.
    #[default]
    Mean,
    /// Median of the per-block deltas inside the window.
    Median,
}

impl StatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatMode::Mean => "mean",
            StatMode::Median => "median",
        }
    }
}

impl fmt::Display for StatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatMode {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" => Ok(StatMode::Mean),
            "median" => Ok(StatMode::Median),
            _ => Err(TypesError::UnknownMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_modes_case_insensitively() {
        assert_eq!("mean".parse::<StatMode>(), Ok(StatMode::Mean));
        assert_eq!("MEDIAN".parse::<StatMode>(), Ok(StatMode::Median));
        assert_eq!(" Median ".parse::<StatMode>(), Ok(StatMode::Median));
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = "mode".parse::<StatMode>().unwrap_err();
        assert_eq!(err, TypesError::UnknownMode("mode".into()));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&StatMode::Median).unwrap();
        assert_eq!(json, "\"median\"");
        let parsed: StatMode = serde_json::from_str("\"mean\"").unwrap();
        assert_eq!(parsed, StatMode::Mean);
    }

    #[test]
    fn default_is_mean() {
        assert_eq!(StatMode::default(), StatMode::Mean);
    }
}
