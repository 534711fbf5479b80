//! Branch prediction unit (BRU).
//!
//! This module contains the path-based perceptron direction predictor and
//! the structures it is built from: history registers, the per-thread path
//! table, the weight tables, and the speculative snapshot handed to callers.

pub use self::branch_predictor::{SpeculativePredictor, ThreadId};
pub use self::perceptron::PathPerceptron;
pub use self::snapshot::Snapshot;

/// Speculative predictor trait and thread identifiers.
pub mod branch_predictor;

/// Global and local branch outcome history registers.
pub mod history;

/// Per-thread path of recent branch addresses.
pub mod path;

/// Path-based perceptron predictor engine.
pub mod perceptron;

/// Per-prediction speculative state.
pub mod snapshot;

/// Perceptron weight tables.
pub mod weights;
