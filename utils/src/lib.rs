//! Shared utilities for block-time estimation.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use time::{format_duration, seconds_f64};
