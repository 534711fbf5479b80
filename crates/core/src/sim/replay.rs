//! Speculative trace replay.
//!
//! Models a front end that fetches up to `window` branches per thread ahead
//! of resolution. It performs:
//! 1. **Issue:** Looks up conditional branches and commits the *predicted*
//!    outcome to the speculative history; unconditional branches commit taken.
//! 2. **Resolve:** Once a thread exceeds its window, the oldest branch resolves.
//!    A correct prediction retires and trains normally.
//! 3. **Recover:** A misprediction squashes every younger branch
//!    (youngest first), squashes the branch itself, re-commits it with the
//!    actual outcome, retrains it as squashed, and re-issues the younger
//!    branches in program order.

use std::collections::VecDeque;
use std::fmt;

use tracing::debug;

use crate::bru::{PathPerceptron, SpeculativePredictor, ThreadId};
use crate::common::error::ConfigError;
use crate::config::{Config, ReplayConfig};
use crate::stats::PredictorStats;
use crate::trace::BranchRecord;

/// A fetched, unresolved branch.
struct InFlight<H> {
    record: BranchRecord,
    predicted: bool,
    history: H,
}

/// Trace replay driver over any speculative predictor.
pub struct Replay<P: SpeculativePredictor> {
    predictor: P,
    window: usize,
    /// Unresolved branches per thread, oldest at the front.
    in_flight: Vec<VecDeque<InFlight<P::History>>>,
    stats: PredictorStats,
}

impl Replay<PathPerceptron> {
    /// Builds a path perceptron and a driver from a root configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] of either section.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let predictor = PathPerceptron::new(&config.predictor)?;
        Self::new(predictor, &config.replay)
    }
}

impl<P: SpeculativePredictor> Replay<P> {
    /// Wraps `predictor` in a driver with the configured window.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroWindow`] if the window is zero.
    pub fn new(predictor: P, config: &ReplayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            predictor,
            window: config.window,
            in_flight: Vec::new(),
            stats: PredictorStats::default(),
        })
    }

    /// The wrapped predictor.
    pub const fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Statistics gathered so far.
    pub const fn stats(&self) -> &PredictorStats {
        &self.stats
    }

    /// Unresolved branches on thread `tid`.
    pub fn in_flight(&self, tid: ThreadId) -> usize {
        self.in_flight.get(tid).map_or(0, VecDeque::len)
    }

    fn queue(&mut self, tid: ThreadId) -> &mut VecDeque<InFlight<P::History>> {
        if tid >= self.in_flight.len() {
            self.in_flight.resize_with(tid + 1, VecDeque::new);
        }
        &mut self.in_flight[tid]
    }

    /// Fetches one branch, resolving the oldest of its thread if the window
    /// overflows.
    pub fn step(&mut self, record: BranchRecord) {
        let tid = record.thread;
        self.issue(record);
        while self.queue(tid).len() > self.window {
            self.resolve_oldest(tid);
        }
    }

    /// Replays `records` and drains every window.
    pub fn run(&mut self, records: impl IntoIterator<Item = BranchRecord>) {
        for record in records {
            self.step(record);
        }
        self.finish();
    }

    /// Resolves every unresolved branch, oldest first on each thread.
    pub fn finish(&mut self) {
        for tid in 0..self.in_flight.len() {
            while !self.in_flight[tid].is_empty() {
                self.resolve_oldest(tid);
            }
        }
    }

    /// Drains the windows and returns the predictor and final statistics.
    pub fn into_parts(mut self) -> (P, PredictorStats) {
        self.finish();
        (self.predictor, self.stats)
    }

    fn issue(&mut self, record: BranchRecord) {
        let tid = record.thread;
        let (predicted, history) = if record.kind.is_conditional() {
            self.stats.lookups += 1;
            let (taken, history) = self.predictor.lookup(tid, record.pc);
            let history = self
                .predictor
                .update_histories(tid, record.pc, taken, Some(history));
            (taken, history)
        } else {
            let history = self.predictor.update_histories(tid, record.pc, true, None);
            (true, history)
        };
        self.queue(tid).push_back(InFlight {
            record,
            predicted,
            history,
        });
    }

    fn resolve_oldest(&mut self, tid: ThreadId) {
        let Some(oldest) = self.queue(tid).pop_front() else {
            return;
        };
        let actual = oldest.record.kind.taken();

        if oldest.record.kind.is_conditional() {
            self.stats.conditional += 1;
            if oldest.predicted == actual {
                self.stats.correct += 1;
            } else {
                self.stats.mispredicted += 1;
            }
        } else {
            self.stats.unconditional += 1;
        }

        if oldest.predicted == actual {
            let trained = self.predictor.update(oldest.history, actual, false);
            self.count_training(trained);
            return;
        }

        let younger = std::mem::take(self.queue(tid));
        debug!(
            thread = tid,
            pc = oldest.record.pc,
            squashed = younger.len(),
            "misprediction, repairing history"
        );

        let mut reissue = Vec::with_capacity(younger.len());
        for entry in younger.into_iter().rev() {
            self.predictor.squash(tid, entry.history);
            self.stats.squashed += 1;
            reissue.push(entry.record);
        }

        self.predictor.squash(tid, oldest.history);
        self.stats.squashed += 1;
        let repaired = self
            .predictor
            .update_histories(tid, oldest.record.pc, actual, None);
        let trained = self.predictor.update(repaired, actual, true);
        self.count_training(trained);

        for record in reissue.into_iter().rev() {
            self.issue(record);
        }
    }

    fn count_training(&mut self, trained: bool) {
        if trained {
            self.stats.trained += 1;
        } else {
            self.stats.training_skipped += 1;
        }
    }
}

impl<P: SpeculativePredictor + fmt::Debug> fmt::Debug for Replay<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Replay")
            .field("predictor", &self.predictor)
            .field("window", &self.window)
            .field(
                "in_flight",
                &self.in_flight.iter().map(VecDeque::len).collect::<Vec<_>>(),
            )
            .field("stats", &self.stats)
            .finish()
    }
}
