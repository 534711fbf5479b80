//! Branch outcome history registers.
//!
//! Two kinds of shift register feed the perceptron context:
//! 1. **Global history:** One register per thread, the most recent outcome in bit 0.
//! 2. **Local history:** One register per masked branch address, shared by all threads.
//!
//! Every write is truncated to the configured width, so a stored register is
//! always below `2^bits`.

use super::ThreadId;
use crate::common::{mask, shift_in};

/// Per-thread global history registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalHistory {
    /// One register per thread.
    regs: Vec<u64>,
    /// Register width mask.
    mask: u64,
    /// Register width in bits.
    bits: u32,
}

impl GlobalHistory {
    /// Creates zeroed registers for `num_threads` threads.
    pub fn new(num_threads: usize, bits: u32) -> Self {
        Self {
            regs: vec![0; num_threads],
            mask: mask(bits),
            bits,
        }
    }

    /// Register width in bits.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Returns the history of thread `tid`.
    #[inline]
    pub fn get(&self, tid: ThreadId) -> u64 {
        self.regs[tid] & self.mask
    }

    /// Shifts one outcome into the history of thread `tid`.
    #[inline]
    pub fn push(&mut self, tid: ThreadId, taken: bool) {
        self.regs[tid] = shift_in(self.regs[tid], taken, self.mask);
    }

    /// Overwrites the history of thread `tid`.
    #[inline]
    pub fn restore(&mut self, tid: ThreadId, value: u64) {
        self.regs[tid] = value & self.mask;
    }
}

/// Address-indexed local history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalHistoryTable {
    /// One register per masked address.
    entries: Vec<u64>,
    /// Register width mask.
    mask: u64,
    /// Register width in bits.
    bits: u32,
}

impl LocalHistoryTable {
    /// Creates `2^addr_bits` zeroed registers of width `bits`.
    pub fn new(addr_bits: u32, bits: u32) -> Self {
        Self {
            entries: vec![0; 1usize << addr_bits],
            mask: mask(bits),
            bits,
        }
    }

    /// Register width in bits.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Number of registers.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; the table has at least one row.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the history for masked address `idx`.
    #[inline]
    pub fn get(&self, idx: u64) -> u64 {
        self.entries[idx as usize] & self.mask
    }

    /// Shifts one outcome into the history for masked address `idx`.
    #[inline]
    pub fn push(&mut self, idx: u64, taken: bool) {
        let reg = &mut self.entries[idx as usize];
        *reg = shift_in(*reg, taken, self.mask);
    }

    /// Overwrites the history for masked address `idx`.
    #[inline]
    pub fn restore(&mut self, idx: u64, value: u64) {
        self.entries[idx as usize] = value & self.mask;
    }
}
