//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies of the estimator (the chain node and the wall
//! clock) are abstracted behind traits. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the network
//!
//! Usage: inject these in place of `HttpChainClient` and `SystemClock`.

pub mod chain;
pub mod clock;

pub use chain::NullChain;
pub use clock::NullClock;
