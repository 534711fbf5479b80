//! Path-Based Perceptron Branch Predictor.
//!
//! Predicts branch direction with two perceptrons whose outputs are summed:
//! one over a history context built from the thread's global history (high
//! bits) and the branch's local history (low bits), and one over the bits of
//! the branch address itself. Input weight `j` of either perceptron is taken
//! from the row of the branch seen `j - 1` branches earlier on the same
//! thread, so the weights a prediction uses depend on the path that led to
//! the branch.
//!
//! Histories are updated speculatively at commit time. Each prediction
//! returns a [`Snapshot`] that can train the weights once the outcome is
//! known or roll the histories back if the branch is squashed.

use tracing::{info, trace};

use super::branch_predictor::{SpeculativePredictor, ThreadId};
use super::history::{GlobalHistory, LocalHistoryTable};
use super::path::PathTable;
use super::snapshot::Snapshot;
use super::weights::WeightStore;
use crate::common::error::ConfigError;
use crate::common::mask;
use crate::config::PredictorConfig;

/// Path-based perceptron predictor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPerceptron {
    /// Per-thread global history registers.
    global: GlobalHistory,
    /// Shared local history registers.
    local: LocalHistoryTable,
    /// Per-thread branch paths.
    paths: PathTable,
    /// History and address weight tables.
    weights: WeightStore,
    /// Mask selecting the low `A` address bits.
    addr_mask: u64,
    /// Training threshold (theta).
    threshold: i64,
    /// Commit sequence numbers of unresolved snapshots, per thread, oldest first.
    pending: Vec<Vec<u64>>,
    /// Next commit sequence number, per thread.
    next_seq: Vec<u64>,
}

impl PathPerceptron {
    /// Creates a predictor with zeroed histories and weights.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration fails validation.
    pub fn new(config: &PredictorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let threads = config.num_threads;
        let predictor = Self {
            global: GlobalHistory::new(threads, config.global_history_bits),
            local: LocalHistoryTable::new(config.branch_addr_bits, config.local_history_bits),
            paths: PathTable::new(threads, config.path_length()),
            weights: WeightStore::new(config.branch_addr_bits, config.history_length()),
            addr_mask: mask(config.branch_addr_bits),
            threshold: config.training_threshold,
            pending: vec![Vec::new(); threads],
            next_seq: vec![0; threads],
        };

        info!(
            threads,
            global_bits = config.global_history_bits,
            local_bits = config.local_history_bits,
            addr_bits = config.branch_addr_bits,
            rows = predictor.weights.history.rows(),
            path_length = predictor.paths.capacity(),
            threshold = predictor.threshold,
            "path perceptron initialised"
        );

        Ok(predictor)
    }

    #[inline]
    fn check_thread(&self, tid: ThreadId) {
        assert!(
            tid < self.pending.len(),
            "thread id {tid} out of range (num_threads = {})",
            self.pending.len()
        );
    }

    /// Truncates a branch address to its table index.
    #[inline]
    pub const fn masked(&self, pc: u64) -> u64 {
        pc & self.addr_mask
    }

    /// Concatenates global history (high bits) and local history (low bits).
    #[inline]
    fn context(&self, global: u64, local: u64) -> u64 {
        global.checked_shl(self.local.bits()).unwrap_or(0) | local
    }

    /// Predicts the branch at `pc` on thread `tid`.
    ///
    /// Reads the histories, path, and weights without modifying anything.
    ///
    /// # Returns
    ///
    /// `(taken, snapshot)` where `taken` is `sum >= 0`.
    ///
    /// # Panics
    ///
    /// Panics if `tid` is not below the configured thread count.
    pub fn predict(&self, tid: ThreadId, pc: u64) -> (bool, Snapshot) {
        self.check_thread(tid);

        let masked_addr = self.masked(pc);
        let global = self.global.get(tid);
        let local = self.local.get(masked_addr);
        let context = self.context(global, local);
        let path = self.paths.entries(tid);
        let row = masked_addr as usize;

        let y_hist = self.weights.history.output(row, context, path);
        let y_addr = self.weights.addr.output(row, masked_addr, path);
        let sum = y_hist + y_addr;

        let snapshot = Snapshot {
            thread: tid,
            global,
            local,
            path: self.paths.to_vec(tid),
            masked_addr,
            evicted: None,
            sum,
            seq: None,
        };
        (sum >= 0, snapshot)
    }

    /// Appends a branch outcome to the histories of thread `tid`.
    ///
    /// Shifts `taken` into the global register and into the local register of
    /// the branch, and pushes the masked address onto the thread's path. When
    /// `snapshot` is `None` (unconditional branch, no lookup) a fresh one is
    /// captured first with a zero prediction sum.
    ///
    /// # Returns
    ///
    /// The snapshot, now recording the evicted path entry.
    ///
    /// # Panics
    ///
    /// Panics if `tid` is out of range. In debug builds, also panics if the
    /// snapshot was already committed or belongs to another thread or address.
    pub fn commit_history(
        &mut self,
        tid: ThreadId,
        pc: u64,
        taken: bool,
        snapshot: Option<Snapshot>,
    ) -> Snapshot {
        self.check_thread(tid);
        let masked_addr = self.masked(pc);

        let mut snapshot = match snapshot {
            Some(s) => s,
            None => Snapshot {
                thread: tid,
                global: self.global.get(tid),
                local: self.local.get(masked_addr),
                path: self.paths.to_vec(tid),
                masked_addr,
                evicted: None,
                sum: 0,
                seq: None,
            },
        };
        debug_assert!(snapshot.seq.is_none(), "snapshot committed twice");
        debug_assert_eq!(snapshot.thread, tid, "snapshot committed on another thread");
        debug_assert_eq!(snapshot.masked_addr, masked_addr, "snapshot committed for another branch");

        self.global.push(tid, taken);
        self.local.push(masked_addr, taken);
        snapshot.evicted = self.paths.push(tid, masked_addr);

        let seq = self.next_seq[tid];
        self.next_seq[tid] += 1;
        self.pending[tid].push(seq);
        snapshot.seq = Some(seq);

        snapshot
    }

    /// Trains the weights with the resolved outcome and releases the snapshot.
    ///
    /// Training happens when `squashed` is set or the magnitude of the
    /// prediction sum is at most the training threshold. The update uses the
    /// histories and path captured in the snapshot, not the live ones.
    ///
    /// # Returns
    ///
    /// `true` if the weights were adjusted.
    pub fn train(&mut self, snapshot: Snapshot, taken: bool, squashed: bool) -> bool {
        if let Some(seq) = snapshot.seq {
            self.pending[snapshot.thread].retain(|&s| s != seq);
        }

        if !squashed && snapshot.sum.unsigned_abs() > self.threshold.unsigned_abs() {
            trace!(
                thread = snapshot.thread,
                addr = snapshot.masked_addr,
                sum = snapshot.sum,
                "confident prediction, training skipped"
            );
            return false;
        }

        let row = snapshot.masked_addr as usize;
        let context = self.context(snapshot.global, snapshot.local);
        self.weights
            .history
            .train(row, context, taken, &snapshot.path);
        self.weights
            .addr
            .train(row, snapshot.masked_addr, taken, &snapshot.path);
        true
    }

    /// Rolls thread `tid` back to its state before the snapshot's commit and
    /// releases the snapshot.
    ///
    /// Restores the global register and the branch's local register, removes
    /// the pushed path entry, and re-appends the evicted one. A snapshot that
    /// was never committed only restores the registers.
    ///
    /// # Panics
    ///
    /// Panics if `tid` is out of range. In debug builds, also panics if the
    /// snapshot is not the youngest unresolved commit of the thread.
    pub fn squash(&mut self, tid: ThreadId, snapshot: Snapshot) {
        self.check_thread(tid);
        debug_assert_eq!(snapshot.thread, tid, "snapshot squashed on another thread");

        self.global.restore(tid, snapshot.global);
        self.local.restore(snapshot.masked_addr, snapshot.local);

        if let Some(seq) = snapshot.seq {
            let youngest = self.pending[tid].pop();
            debug_assert_eq!(youngest, Some(seq), "squash out of LIFO order on thread {tid}");
            self.paths.undo_push(tid, snapshot.evicted);
        }

        trace!(thread = tid, addr = snapshot.masked_addr, "history rolled back");
    }

    /// Number of hardware threads.
    pub fn num_threads(&self) -> usize {
        self.pending.len()
    }

    /// Path table length per thread (`W`).
    pub const fn path_length(&self) -> usize {
        self.paths.capacity()
    }

    /// Training threshold (theta).
    pub const fn threshold(&self) -> i64 {
        self.threshold
    }

    /// Global history register of thread `tid`.
    pub fn global_history(&self, tid: ThreadId) -> u64 {
        self.global.get(tid)
    }

    /// Local history register for the branch at `pc`.
    pub fn local_history(&self, pc: u64) -> u64 {
        self.local.get(self.masked(pc))
    }

    /// Path of thread `tid`, most recent first.
    pub fn path(&self, tid: ThreadId) -> Vec<u64> {
        self.paths.to_vec(tid)
    }

    /// Both weight tables.
    pub const fn weights(&self) -> &WeightStore {
        &self.weights
    }

    /// Number of committed, unresolved snapshots on thread `tid`.
    pub fn in_flight(&self, tid: ThreadId) -> usize {
        self.pending[tid].len()
    }
}

impl SpeculativePredictor for PathPerceptron {
    type History = Snapshot;

    #[inline]
    fn lookup(&self, tid: ThreadId, pc: u64) -> (bool, Snapshot) {
        self.predict(tid, pc)
    }

    #[inline]
    fn update_histories(
        &mut self,
        tid: ThreadId,
        pc: u64,
        taken: bool,
        history: Option<Snapshot>,
    ) -> Snapshot {
        self.commit_history(tid, pc, taken, history)
    }

    #[inline]
    fn update(&mut self, history: Snapshot, taken: bool, squashed: bool) -> bool {
        self.train(history, taken, squashed)
    }

    #[inline]
    fn squash(&mut self, tid: ThreadId, history: Snapshot) {
        Self::squash(self, tid, history);
    }
}
