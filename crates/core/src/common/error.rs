//! Error definitions.
//!
//! The predictor operations themselves cannot fail at runtime; contract
//! violations (bad thread ids, out-of-order rollback) panic. The fallible
//! surfaces are:
//! 1. **Construction:** Table sizing parameters rejected before any allocation.
//! 2. **Trace input:** File access and line parsing for host-side replay.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::defaults::MAX_BRANCH_ADDR_BITS;

/// Invalid predictor or replay parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The predictor must serve at least one hardware thread.
    #[error("num_threads must be at least 1")]
    NoThreads,

    /// The concatenated global and local history must fit a 64-bit register.
    #[error("global ({global}) + local ({local}) history bits exceed 64")]
    HistoryTooWide {
        /// Configured global history bits.
        global: u32,
        /// Configured local history bits.
        local: u32,
    },

    /// Too many address bits; each weight table has `2^bits` rows.
    #[error("branch_addr_bits {bits} exceeds the maximum of {max}")]
    AddressTooWide {
        /// Configured address bits.
        bits: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// All widths are zero, leaving nothing to index the path table with.
    #[error("path length max(branch_addr_bits, global + local) is zero")]
    EmptyPath,

    /// The training threshold is compared against a magnitude.
    #[error("training_threshold must be non-negative, got {0}")]
    NegativeThreshold(i64),

    /// The replay driver needs room for at least one in-flight branch.
    #[error("replay window must be at least 1")]
    ZeroWindow,

    /// Malformed JSON configuration document.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Builds an [`ConfigError::AddressTooWide`] against the crate limit.
    pub(crate) const fn address_too_wide(bits: u32) -> Self {
        Self::AddressTooWide {
            bits,
            max: MAX_BRANCH_ADDR_BITS,
        }
    }
}

/// Failure to read or parse a branch trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be read.
    #[error("could not read trace '{}': {source}", .path.display())]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A line did not follow `<pc> <T|N|J> [thread]`.
    #[error("line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}
