//! Prediction statistics collection and reporting.
//!
//! This module tracks what the replay driver observed. It provides:
//! 1. **Branch mix:** Conditional and unconditional branch counts.
//! 2. **Direction prediction:** Lookups, correct and mispredicted resolutions, accuracy.
//! 3. **Training:** Weight updates applied versus skipped by the threshold gate.
//! 4. **Speculation:** Snapshots discarded by squashes.

use std::time::Instant;

/// Prediction statistics.
#[derive(Clone, Debug)]
pub struct PredictorStats {
    start_time: Instant,
    /// Direction lookups performed, including re-issued wrong-path lookups.
    pub lookups: u64,
    /// Conditional branches resolved.
    pub conditional: u64,
    /// Unconditional branches resolved.
    pub unconditional: u64,
    /// Conditional branches whose prediction matched the outcome.
    pub correct: u64,
    /// Conditional branches whose prediction did not match the outcome.
    pub mispredicted: u64,
    /// Resolutions that adjusted the weights.
    pub trained: u64,
    /// Resolutions skipped by the training threshold.
    pub training_skipped: u64,
    /// Snapshots rolled back by squashes.
    pub squashed: u64,
}

impl Default for PredictorStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            lookups: 0,
            conditional: 0,
            unconditional: 0,
            correct: 0,
            mispredicted: 0,
            trained: 0,
            training_skipped: 0,
            squashed: 0,
        }
    }
}

impl PredictorStats {
    /// Total branches resolved.
    pub const fn branches(&self) -> u64 {
        self.conditional + self.unconditional
    }

    /// Fraction of conditional branches predicted correctly, in percent.
    ///
    /// Returns 0 when no conditional branch has resolved.
    pub fn accuracy(&self) -> f64 {
        if self.conditional == 0 {
            0.0
        } else {
            100.0 * self.correct as f64 / self.conditional as f64
        }
    }

    /// Mispredictions per thousand branches.
    pub fn mpkb(&self) -> f64 {
        let branches = self.branches();
        if branches == 0 {
            0.0
        } else {
            1000.0 * self.mispredicted as f64 / branches as f64
        }
    }

    /// Prints the report to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let rate = if seconds > 0.0 {
            self.branches() as f64 / seconds / 1000.0
        } else {
            0.0
        };

        println!("\n==========================================================");
        println!("PATH PERCEPTRON STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("host_rate                {rate:.2} kbranch/s");
        println!("----------------------------------------------------------");
        println!("BRANCH MIX");
        println!("  br.conditional         {}", self.conditional);
        println!("  br.unconditional       {}", self.unconditional);
        println!("----------------------------------------------------------");
        println!("DIRECTION PREDICTION");
        println!("  bp.lookups             {}", self.lookups);
        println!("  bp.correct             {}", self.correct);
        println!("  bp.mispredicts         {}", self.mispredicted);
        println!("  bp.accuracy            {:.2}%", self.accuracy());
        println!("  bp.mpkb                {:.2}", self.mpkb());
        println!("----------------------------------------------------------");
        println!("TRAINING");
        println!("  train.applied          {}", self.trained);
        println!("  train.skipped          {}", self.training_skipped);
        println!("  bp.squashed            {}", self.squashed);
        println!("==========================================================");
    }
}
