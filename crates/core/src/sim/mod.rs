//! Host-side simulation drivers.
//!
//! The predictor core has no notion of time or fetch order; this module
//! supplies one: a replay driver that feeds a branch trace through any
//! [`SpeculativePredictor`](crate::bru::SpeculativePredictor) with a bounded
//! speculation window per thread.

/// Speculative trace replay driver.
pub mod replay;

pub use replay::Replay;
