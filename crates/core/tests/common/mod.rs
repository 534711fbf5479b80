//! Helpers shared by the unit tests.

use pathperc_core::PathPerceptron;
use pathperc_core::bru::ThreadId;
use pathperc_core::config::PredictorConfig;

/// Installs a test-writer tracing subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Single-threaded predictor with `G`, `L`, and `A` bits.
pub fn predictor(global: u32, local: u32, addr: u32) -> PathPerceptron {
    threaded(global, local, addr, 1)
}

/// Predictor with `G`, `L`, `A` bits serving `threads` threads.
pub fn threaded(global: u32, local: u32, addr: u32, threads: usize) -> PathPerceptron {
    init_tracing();
    let config = PredictorConfig {
        num_threads: threads,
        ..PredictorConfig::with_widths(global, local, addr)
    };
    PathPerceptron::new(&config).unwrap()
}

/// Predicts, commits the actual outcome, and trains without a squash.
///
/// Returns the prediction sum.
pub fn retire(bp: &mut PathPerceptron, tid: ThreadId, pc: u64, taken: bool) -> i64 {
    let (_, snap) = bp.predict(tid, pc);
    let sum = snap.prediction_sum();
    let snap = bp.commit_history(tid, pc, taken, Some(snap));
    let _ = bp.train(snap, taken, false);
    sum
}

/// History state of one thread as seen from one branch address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadState {
    /// Global history register.
    pub global: u64,
    /// Local history register of the branch.
    pub local: u64,
    /// Path, most recent first.
    pub path: Vec<u64>,
}

/// Captures the registers and path relevant to `pc` on thread `tid`.
pub fn thread_state(bp: &PathPerceptron, tid: ThreadId, pc: u64) -> ThreadState {
    ThreadState {
        global: bp.global_history(tid),
        local: bp.local_history(pc),
        path: bp.path(tid),
    }
}
