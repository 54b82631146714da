//! Fundamental types for block-time estimation.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! heights, the sample window, the statistical mode and the wall clock.

pub mod clock;
pub mod error;
pub mod mode;
pub mod window;

pub use clock::{Clock, SystemClock};
pub use error::TypesError;
pub use mode::StatMode;
pub use window::SampleWindow;

/// A block's position in the chain.
pub type Height = u64;
