//! Speculative Rollback Tests.
//!
//! Verifies that squashing committed snapshots youngest-first restores the
//! global register, local register, and path exactly, including path
//! entries evicted by the commit.

use pretty_assertions::assert_eq;

use crate::common::{predictor, retire, thread_state, threaded};

// ══════════════════════════════════════════════════════════
// 1. Single branch
// ══════════════════════════════════════════════════════════

/// Predict, commit, squash leaves histories and path as they were.
#[test]
fn squash_undoes_commit() {
    let mut bp = predictor(6, 4, 4);
    for pc in [3, 9, 3, 12, 3] {
        let _ = retire(&mut bp, 0, pc, pc != 9);
    }
    let before = thread_state(&bp, 0, 3);
    let weights = bp.weights().clone();

    let (taken, snap) = bp.predict(0, 3);
    let snap = bp.commit_history(0, 3, taken, Some(snap));
    assert_ne!(thread_state(&bp, 0, 3), before);
    bp.squash(0, snap);

    assert_eq!(thread_state(&bp, 0, 3), before);
    assert_eq!(bp.weights(), &weights);
    assert_eq!(bp.in_flight(0), 0);
}

/// The entry evicted from the back of the path comes back on squash.
#[test]
fn squash_restores_evicted_path_entry() {
    let mut bp = predictor(2, 0, 2);
    let _ = retire(&mut bp, 0, 1, true);
    let _ = retire(&mut bp, 0, 2, true);
    assert_eq!(bp.path(0), vec![2, 1]);

    let snap = bp.commit_history(0, 3, false, None);
    assert_eq!(snap.evicted(), Some(1));
    assert_eq!(bp.path(0), vec![3, 2]);

    bp.squash(0, snap);
    assert_eq!(bp.path(0), vec![2, 1]);
}

/// Squashing and recommitting the actual outcome matches committing it directly.
#[test]
fn squash_then_recommit_matches_correct_path() {
    let mut repaired = predictor(5, 3, 3);
    let mut direct = predictor(5, 3, 3);
    for bp in [&mut repaired, &mut direct] {
        for pc in 0..6 {
            let _ = retire(bp, 0, pc, pc % 2 == 0);
        }
    }

    let (_, wrong) = repaired.predict(0, 4);
    let wrong = repaired.commit_history(0, 4, true, Some(wrong));
    repaired.squash(0, wrong);
    let fixed = repaired.commit_history(0, 4, false, None);
    assert!(repaired.train(fixed, false, true));

    let right = direct.commit_history(0, 4, false, None);
    assert!(direct.train(right, false, true));

    assert_eq!(thread_state(&repaired, 0, 4), thread_state(&direct, 0, 4));
    assert_eq!(repaired.weights(), direct.weights());
}

/// A snapshot that was never committed restores only the registers.
#[test]
fn uncommitted_squash_leaves_path() {
    let mut bp = predictor(4, 2, 3);
    let (_, probe) = bp.predict(0, 3);
    let global = probe.global_history();
    let local = probe.local_history();

    let committed = bp.commit_history(0, 3, true, None);
    bp.squash(0, probe);

    assert_eq!(bp.global_history(0), global);
    assert_eq!(bp.local_history(3), local);
    assert_eq!(bp.path(0)[0], 3);
    assert_eq!(bp.in_flight(0), 1);
    assert!(bp.train(committed, true, false));
}

// ══════════════════════════════════════════════════════════
// 2. Nested speculation
// ══════════════════════════════════════════════════════════

/// Several outstanding commits unwind one step at a time, youngest first.
#[test]
fn nested_squash_unwinds_in_order() {
    let mut bp = predictor(4, 3, 2);
    let branches = [(0x10, true), (0x11, false), (0x12, true), (0x10, true), (0x13, false)];

    let mut states = Vec::new();
    let mut snaps = Vec::new();
    for &(pc, taken) in &branches {
        states.push(thread_state(&bp, 0, pc));
        let (_, snap) = bp.predict(0, pc);
        snaps.push(bp.commit_history(0, pc, taken, Some(snap)));
    }
    assert_eq!(bp.in_flight(0), branches.len());

    while let Some(snap) = snaps.pop() {
        let pc = snap.masked_addr();
        bp.squash(0, snap);
        let expected = states.pop().unwrap();
        assert_eq!(thread_state(&bp, 0, pc), expected);
    }
    assert_eq!(bp.in_flight(0), 0);
}

/// Retiring the oldest commit does not disturb rollback of younger ones.
#[test]
fn retire_oldest_then_squash_younger() {
    let mut bp = predictor(4, 2, 3);
    let old = bp.commit_history(0, 1, true, None);
    let after_old = thread_state(&bp, 0, 2);
    let young = bp.commit_history(0, 2, false, None);

    assert!(bp.train(old, true, false));
    bp.squash(0, young);

    assert_eq!(thread_state(&bp, 0, 2), after_old);
    assert_eq!(bp.in_flight(0), 0);
}

/// Rolling back one thread leaves the other thread's path and register alone.
#[test]
fn squash_is_per_thread() {
    let mut bp = threaded(4, 0, 3, 2);
    let a = bp.commit_history(0, 1, true, None);
    let b = bp.commit_history(1, 2, true, None);
    let other = thread_state(&bp, 0, 1);

    bp.squash(1, b);
    assert_eq!(thread_state(&bp, 0, 1), other);
    assert_eq!(bp.global_history(1), 0);
    assert_eq!(bp.path(1), vec![0; bp.path_length()]);
    assert!(bp.train(a, true, false));
}

/// Squashing an older commit while a younger one is outstanding is a bug.
#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "LIFO")]
fn out_of_order_squash_is_caught() {
    let mut bp = predictor(4, 2, 3);
    let old = bp.commit_history(0, 1, true, None);
    let _young = bp.commit_history(0, 2, true, None);
    bp.squash(0, old);
}
