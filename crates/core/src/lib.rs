//! Path-based perceptron branch direction predictor.
//!
//! This crate implements a speculative, multi-threaded perceptron predictor with the following:
//! 1. **Branch prediction unit:** History registers, path table, weight store, and the
//!    predict / commit-history / train / rollback protocol.
//! 2. **Configuration:** Serde-backed predictor and replay parameters with defaults.
//! 3. **Traces:** A line-oriented branch trace reader.
//! 4. **Simulation:** A speculative trace replay driver and prediction statistics.

/// Common types (bit helpers and error types).
pub mod common;
/// Predictor and replay configuration (defaults, validation, JSON loading).
pub mod config;
/// Branch prediction unit (history, path, weights, snapshots, perceptron engine).
pub mod bru;
/// Speculative trace replay.
pub mod sim;
/// Prediction statistics collection and reporting.
pub mod stats;
/// Branch trace records and parsing.
pub mod trace;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// The path-based perceptron engine.
pub use crate::bru::PathPerceptron;
/// Per-prediction speculative state owned by the caller.
pub use crate::bru::Snapshot;
