//! Speculative Branch Predictor Interface.
//!
//! This module defines the `SpeculativePredictor` trait used by hosts that
//! run ahead of branch resolution. A direction lookup hands back an opaque
//! history record; the host keeps it until the branch either retires
//! (`update`) or is discarded (`squash`).

/// Hardware thread identifier.
pub type ThreadId = usize;

/// Trait for direction predictors with speculative, repairable history.
///
/// The per-branch lifecycle is:
///
/// ```text
/// lookup ──► update_histories ──► update   (retire, or retrain after a squash)
///                              └─► squash   (discard, undo the history push)
/// ```
///
/// Unconditional branches skip `lookup`: `update_histories` is called with
/// `None` and creates the record itself.
pub trait SpeculativePredictor {
    /// Per-prediction state needed to train or undo the branch.
    type History;

    /// Predicts the direction of the branch at `pc` on thread `tid`.
    ///
    /// # Arguments
    ///
    /// * `tid` - Hardware thread issuing the branch
    /// * `pc` - Address of the branch instruction
    ///
    /// # Returns
    ///
    /// A tuple `(taken, history)`; `history` must later be passed to
    /// `update_histories`, and then to exactly one of `update` or `squash`.
    fn lookup(&self, tid: ThreadId, pc: u64) -> (bool, Self::History);

    /// Appends the branch to the speculative histories of thread `tid`.
    ///
    /// # Arguments
    ///
    /// * `tid` - Hardware thread issuing the branch
    /// * `pc` - Address of the branch instruction
    /// * `taken` - Outcome to record (predicted or actual)
    /// * `history` - Record from `lookup`, or `None` for unconditional branches
    ///
    /// # Returns
    ///
    /// The record, now able to undo this history push.
    fn update_histories(
        &mut self,
        tid: ThreadId,
        pc: u64,
        taken: bool,
        history: Option<Self::History>,
    ) -> Self::History;

    /// Trains the predictor with the resolved outcome and releases the record.
    ///
    /// # Arguments
    ///
    /// * `history` - Record produced by `lookup` / `update_histories`
    /// * `taken` - Actual branch outcome
    /// * `squashed` - True when retraining after a pipeline squash
    ///
    /// # Returns
    ///
    /// `true` if any predictor state was adjusted.
    fn update(&mut self, history: Self::History, taken: bool, squashed: bool) -> bool;

    /// Restores thread `tid` to its state before the record's history push
    /// and releases the record.
    fn squash(&mut self, tid: ThreadId, history: Self::History);
}
