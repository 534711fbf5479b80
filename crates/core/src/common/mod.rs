//! Common utilities shared by the predictor and its host-side drivers.
//!
//! This module provides:
//! 1. **Bit helpers:** Register masks and bit extraction for history and address registers.
//! 2. **Error Handling:** Configuration and trace error types.

/// Register mask and bit extraction helpers.
pub mod bits;

/// Error types.
pub mod error;

pub use bits::{bit, mask, shift_in};
pub use error::{ConfigError, TraceError};
