//! The sample window: how many historical blocks are examined.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

use crate::TypesError;

/// A strictly positive number of historical blocks to sample.
///
/// Zero is unrepresentable, so neither the mean division nor the median
/// delta sequence can be empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct SampleWindow(NonZeroU64);

impl SampleWindow {
    pub fn new(blocks: u64) -> Result<Self, TypesError> {
        NonZeroU64::new(blocks)
            .map(Self)
            .ok_or(TypesError::ZeroWindow)
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<u64> for SampleWindow {
    type Error = TypesError;

    fn try_from(blocks: u64) -> Result<Self, Self::Error> {
        Self::new(blocks)
    }
}

impl From<SampleWindow> for u64 {
    fn from(window: SampleWindow) -> Self {
        window.get()
    }
}

impl fmt::Display for SampleWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_window_rejected() {
        assert_eq!(SampleWindow::new(0), Err(TypesError::ZeroWindow));
    }

    #[test]
    fn positive_window_accepted() {
        assert_eq!(SampleWindow::new(100).unwrap().get(), 100);
    }

    #[test]
    fn deserialize_rejects_zero() {
        assert!(serde_json::from_str::<SampleWindow>("0").is_err());
        let window: SampleWindow = serde_json::from_str("7").unwrap();
        assert_eq!(window.get(), 7);
    }
}
