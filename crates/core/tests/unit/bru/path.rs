//! Path Table Tests.
//!
//! The path of each thread is a fixed-length list of masked branch
//! addresses, most recent first, that starts out filled with zeros.

use pathperc_core::bru::path::PathTable;
use pretty_assertions::assert_eq;

// ══════════════════════════════════════════════════════════
// 1. Initial state
// ══════════════════════════════════════════════════════════

/// Every thread starts with `capacity` zero entries.
#[test]
fn starts_full_of_zeros() {
    let table = PathTable::new(3, 5);
    assert_eq!(table.capacity(), 5);
    for tid in 0..3 {
        assert_eq!(table.len(tid), 5);
        assert!(!table.is_empty(tid));
        assert_eq!(table.to_vec(tid), vec![0; 5]);
    }
}

// ══════════════════════════════════════════════════════════
// 2. Push and undo
// ══════════════════════════════════════════════════════════

/// Pushes go to the front and the oldest entry is evicted from the back.
#[test]
fn push_evicts_oldest() {
    let mut table = PathTable::new(1, 3);

    assert_eq!(table.push(0, 1), Some(0));
    assert_eq!(table.push(0, 2), Some(0));
    assert_eq!(table.push(0, 3), Some(0));
    assert_eq!(table.to_vec(0), vec![3, 2, 1]);

    assert_eq!(table.push(0, 4), Some(1));
    assert_eq!(table.to_vec(0), vec![4, 3, 2]);
    assert_eq!(table.len(0), 3);
}

/// Undoing pushes in reverse order walks the path back exactly.
#[test]
fn undo_restores_evicted_entries() {
    let mut table = PathTable::new(1, 3);
    let mut evicted = Vec::new();
    for addr in 1..=5 {
        evicted.push(table.push(0, addr));
    }
    assert_eq!(table.to_vec(0), vec![5, 4, 3]);

    table.undo_push(0, evicted.pop().flatten());
    assert_eq!(table.to_vec(0), vec![4, 3, 2]);
    table.undo_push(0, evicted.pop().flatten());
    assert_eq!(table.to_vec(0), vec![3, 2, 1]);

    while let Some(entry) = evicted.pop() {
        table.undo_push(0, entry);
    }
    assert_eq!(table.to_vec(0), vec![0, 0, 0]);
}

/// Pushes on one thread do not disturb another.
#[test]
fn threads_are_isolated() {
    let mut table = PathTable::new(2, 2);
    let _ = table.push(1, 7);
    assert_eq!(table.to_vec(0), vec![0, 0]);
    assert_eq!(table.to_vec(1), vec![7, 0]);
    assert_eq!(table.entries(1).front(), Some(&7));
}
