//! Branch path table.
//!
//! Each thread keeps the masked addresses of its last `W` branches, most
//! recent first. Entry `j` names the weight row that supplies input `j + 1`
//! of the next prediction, so the table is pre-filled with `W` zero entries
//! and every position below `W` is always readable.

use std::collections::VecDeque;

use super::ThreadId;

/// Per-thread bounded FIFO of recent masked branch addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTable {
    /// One path per thread; front is the most recent branch.
    paths: Vec<VecDeque<u64>>,
    /// Maximum path length (`W`).
    capacity: usize,
}

impl PathTable {
    /// Creates `num_threads` paths, each holding `capacity` zero addresses.
    pub fn new(num_threads: usize, capacity: usize) -> Self {
        let mut path = VecDeque::with_capacity(capacity + 1);
        path.resize(capacity, 0);
        Self {
            paths: vec![path; num_threads],
            capacity,
        }
    }

    /// Maximum path length.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current path length of thread `tid`.
    #[inline]
    pub fn len(&self, tid: ThreadId) -> usize {
        self.paths[tid].len()
    }

    /// Returns true if thread `tid` has an empty path.
    #[inline]
    pub fn is_empty(&self, tid: ThreadId) -> bool {
        self.paths[tid].is_empty()
    }

    /// Returns the path of thread `tid`, most recent first.
    #[inline]
    pub fn entries(&self, tid: ThreadId) -> &VecDeque<u64> {
        &self.paths[tid]
    }

    /// Copies the path of thread `tid`.
    pub fn to_vec(&self, tid: ThreadId) -> Vec<u64> {
        self.paths[tid].iter().copied().collect()
    }

    /// Pushes `addr` to the front of the path of thread `tid`.
    ///
    /// # Returns
    ///
    /// The entry dropped off the back, if the path was full.
    pub fn push(&mut self, tid: ThreadId, addr: u64) -> Option<u64> {
        let path = &mut self.paths[tid];
        path.push_front(addr);
        if path.len() > self.capacity {
            path.pop_back()
        } else {
            None
        }
    }

    /// Reverts the most recent [`PathTable::push`] on thread `tid`.
    ///
    /// `evicted` is the value that push returned.
    pub fn undo_push(&mut self, tid: ThreadId, evicted: Option<u64>) {
        let path = &mut self.paths[tid];
        let popped = path.pop_front();
        debug_assert!(popped.is_some(), "undo_push on an empty path (thread {tid})");
        if let Some(addr) = evicted {
            path.push_back(addr);
        }
    }
}
