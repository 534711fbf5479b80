//! Configuration system for the predictor.
//!
//! This module defines the configuration structures used to size the
//! predictor and to drive trace replay. It provides:
//! 1. **Defaults:** Baseline table widths, thread count, threshold, and replay window.
//! 2. **Structures:** `PredictorConfig` for table sizing and `ReplayConfig` for the driver.
//! 3. **Validation:** Rejects widths the predictor cannot represent before allocating.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or via `Config::default()`.

use serde::{Deserialize, Serialize};

use crate::common::error::ConfigError;

/// Default configuration constants.
pub mod defaults {
    /// Default global history length in bits (`G`).
    pub const GLOBAL_HISTORY_BITS: u32 = 12;

    /// Default local history length in bits (`L`).
    pub const LOCAL_HISTORY_BITS: u32 = 8;

    /// Default number of low-order branch address bits used as table index (`A`).
    ///
    /// Both weight tables and the local history table have `2^A` rows.
    pub const BRANCH_ADDR_BITS: u32 = 10;

    /// Default number of hardware threads.
    pub const NUM_THREADS: usize = 1;

    /// Training threshold (theta).
    ///
    /// Predictions whose magnitude is at most this value are trained even
    /// when the prediction turns out correct.
    pub const TRAINING_THRESHOLD: i64 = 64;

    /// Default number of unresolved branches a replay thread may hold.
    pub const REPLAY_WINDOW: usize = 8;

    /// Largest accepted `branch_addr_bits` (16M rows per table).
    pub const MAX_BRANCH_ADDR_BITS: u32 = 24;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use pathperc_core::config::Config;
///
/// let json = r#"{
///     "predictor": {
///         "global_history_bits": 16,
///         "num_threads": 2
///     },
///     "replay": { "window": 4 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.predictor.global_history_bits, 16);
/// assert_eq!(config.predictor.local_history_bits, 8);
/// assert_eq!(config.replay.window, 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Predictor table sizing
    #[serde(default)]
    pub predictor: PredictorConfig,
    /// Trace replay settings
    #[serde(default)]
    pub replay: ReplayConfig,
}

impl Config {
    /// Parses a JSON configuration document and validates it.
    ///
    /// Missing sections and fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed input, or the first
    /// validation failure of either section.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates both sections.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.predictor.validate()?;
        self.replay.validate()
    }
}

/// Path-based perceptron predictor configuration.
///
/// All table sizes and masks are derived from these values at construction
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PredictorConfig {
    /// Global history bits per thread (`G`)
    #[serde(default = "PredictorConfig::default_global_history_bits")]
    pub global_history_bits: u32,

    /// Local history bits per address (`L`)
    #[serde(default = "PredictorConfig::default_local_history_bits")]
    pub local_history_bits: u32,

    /// Low-order branch address bits used for indexing (`A`)
    #[serde(default = "PredictorConfig::default_branch_addr_bits")]
    pub branch_addr_bits: u32,

    /// Number of hardware threads
    #[serde(default = "PredictorConfig::default_num_threads")]
    pub num_threads: usize,

    /// Training threshold (theta)
    #[serde(default = "PredictorConfig::default_training_threshold")]
    pub training_threshold: i64,
}

impl PredictorConfig {
    /// Returns the default global history length.
    fn default_global_history_bits() -> u32 {
        defaults::GLOBAL_HISTORY_BITS
    }

    /// Returns the default local history length.
    fn default_local_history_bits() -> u32 {
        defaults::LOCAL_HISTORY_BITS
    }

    /// Returns the default number of address bits.
    fn default_branch_addr_bits() -> u32 {
        defaults::BRANCH_ADDR_BITS
    }

    /// Returns the default thread count.
    fn default_num_threads() -> usize {
        defaults::NUM_THREADS
    }

    /// Returns the default training threshold.
    fn default_training_threshold() -> i64 {
        defaults::TRAINING_THRESHOLD
    }

    /// Creates a configuration with the given widths and the default
    /// thread count and threshold.
    pub fn with_widths(global_history_bits: u32, local_history_bits: u32, branch_addr_bits: u32) -> Self {
        Self {
            global_history_bits,
            local_history_bits,
            branch_addr_bits,
            ..Self::default()
        }
    }

    /// Length of the combined history context, `N = G + L`.
    pub const fn history_length(&self) -> usize {
        self.global_history_bits.saturating_add(self.local_history_bits) as usize
    }

    /// Path table length per thread, `W = max(A, G + L)`.
    pub const fn path_length(&self) -> usize {
        let addr = self.branch_addr_bits as usize;
        let hist = self.history_length();
        if addr > hist { addr } else { hist }
    }

    /// Checks that the widths are representable.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoThreads`] if `num_threads == 0`
    /// - [`ConfigError::HistoryTooWide`] if `G + L > 64`
    /// - [`ConfigError::AddressTooWide`] if `A` exceeds [`defaults::MAX_BRANCH_ADDR_BITS`]
    /// - [`ConfigError::EmptyPath`] if every width is zero
    /// - [`ConfigError::NegativeThreshold`] if theta is negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_threads == 0 {
            return Err(ConfigError::NoThreads);
        }
        if self.global_history_bits.saturating_add(self.local_history_bits) > u64::BITS {
            return Err(ConfigError::HistoryTooWide {
                global: self.global_history_bits,
                local: self.local_history_bits,
            });
        }
        if self.branch_addr_bits > defaults::MAX_BRANCH_ADDR_BITS {
            return Err(ConfigError::address_too_wide(self.branch_addr_bits));
        }
        if self.path_length() == 0 {
            return Err(ConfigError::EmptyPath);
        }
        if self.training_threshold < 0 {
            return Err(ConfigError::NegativeThreshold(self.training_threshold));
        }
        Ok(())
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            global_history_bits: defaults::GLOBAL_HISTORY_BITS,
            local_history_bits: defaults::LOCAL_HISTORY_BITS,
            branch_addr_bits: defaults::BRANCH_ADDR_BITS,
            num_threads: defaults::NUM_THREADS,
            training_threshold: defaults::TRAINING_THRESHOLD,
        }
    }
}

/// Trace replay driver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReplayConfig {
    /// Maximum unresolved branches per thread before the oldest resolves
    #[serde(default = "ReplayConfig::default_window")]
    pub window: usize,
}

impl ReplayConfig {
    /// Returns the default replay window.
    fn default_window() -> usize {
        defaults::REPLAY_WINDOW
    }

    /// Checks the window size.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroWindow`] if `window == 0`.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            window: defaults::REPLAY_WINDOW,
        }
    }
}
