//! Statistics Arithmetic Tests.

use pathperc_core::stats::PredictorStats;

/// Ratios are zero before anything resolves.
#[test]
fn empty_stats_report_zero() {
    let stats = PredictorStats::default();
    assert_eq!(stats.branches(), 0);
    assert!(stats.accuracy().abs() < f64::EPSILON);
    assert!(stats.mpkb().abs() < f64::EPSILON);
}

/// Accuracy counts conditional branches only; MPKB counts all branches.
#[test]
fn ratios() {
    let mut stats = PredictorStats::default();
    stats.conditional = 800;
    stats.unconditional = 200;
    stats.correct = 760;
    stats.mispredicted = 40;
    assert_eq!(stats.branches(), 1000);
    assert!((stats.accuracy() - 95.0).abs() < 1e-9);
    assert!((stats.mpkb() - 40.0).abs() < 1e-9);
}
