//! Speculative prediction snapshot.
//!
//! A `Snapshot` captures what a prediction saw (history registers, path,
//! output sum) and what its history commit displaced (the evicted path
//! entry). Training replays the captured context; a squash uses it to put
//! the thread's history back exactly.
//!
//! Snapshots are move-only. `train` and `squash` consume them, so a snapshot
//! cannot be resolved twice or read after release.

use super::ThreadId;

/// Per-prediction state owned by the caller until the branch resolves.
#[must_use = "a snapshot must be trained or squashed"]
#[derive(Debug)]
pub struct Snapshot {
    /// Thread that made the prediction.
    pub(crate) thread: ThreadId,
    /// Global history register at prediction time.
    pub(crate) global: u64,
    /// Local history register at prediction time.
    pub(crate) local: u64,
    /// Copy of the thread's path at prediction time.
    pub(crate) path: Vec<u64>,
    /// Masked branch address.
    pub(crate) masked_addr: u64,
    /// Path entry dropped by the history commit, if any.
    pub(crate) evicted: Option<u64>,
    /// Perceptron output (history sum plus address sum).
    pub(crate) sum: i64,
    /// Commit sequence number on the owning thread; `None` until committed.
    pub(crate) seq: Option<u64>,
}

impl Snapshot {
    /// Thread that made the prediction.
    #[inline]
    pub const fn thread(&self) -> ThreadId {
        self.thread
    }

    /// Global history register captured at prediction time.
    #[inline]
    pub const fn global_history(&self) -> u64 {
        self.global
    }

    /// Local history register captured at prediction time.
    #[inline]
    pub const fn local_history(&self) -> u64 {
        self.local
    }

    /// Path captured at prediction time, most recent first.
    #[inline]
    pub fn path(&self) -> &[u64] {
        &self.path
    }

    /// Masked address of the branch.
    #[inline]
    pub const fn masked_addr(&self) -> u64 {
        self.masked_addr
    }

    /// Path entry evicted by the history commit.
    #[inline]
    pub const fn evicted(&self) -> Option<u64> {
        self.evicted
    }

    /// Perceptron output of the prediction (zero for unconditional branches).
    #[inline]
    pub const fn prediction_sum(&self) -> i64 {
        self.sum
    }

    /// Predicted direction.
    #[inline]
    pub const fn predicted_taken(&self) -> bool {
        self.sum >= 0
    }

    /// True once the history commit has been applied.
    #[inline]
    pub const fn is_committed(&self) -> bool {
        self.seq.is_some()
    }
}
