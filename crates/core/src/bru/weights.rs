//! Perceptron weight tables.
//!
//! Each table stores `rows` weight vectors of `inputs + 1` signed weights in a
//! single flattened vector. Index 0 of a row is the bias; input `j` (1-based)
//! is read not from the predicted branch's own row but from the row named by
//! path entry `j - 1`.
//!
//! Weights are unbounded: training adds or subtracts one without clamping.

use crate::common::bit;

/// Address-indexed table of perceptron weight rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightTable {
    /// Flattened weights, `rows * row_size` entries.
    weights: Vec<i64>,
    /// Number of rows.
    rows: usize,
    /// Weights per row (inputs + bias).
    row_size: usize,
}

impl WeightTable {
    /// Creates a zeroed table with `rows` rows of `inputs` weights plus a bias.
    pub fn new(rows: usize, inputs: usize) -> Self {
        let row_size = inputs + 1;
        Self {
            weights: vec![0; rows * row_size],
            rows,
            row_size,
        }
    }

    /// Number of rows.
    #[inline]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of non-bias inputs per row.
    #[inline]
    pub const fn inputs(&self) -> usize {
        self.row_size - 1
    }

    #[inline]
    fn slot(&self, row: usize, idx: usize) -> usize {
        debug_assert!(idx < self.row_size, "weight index {idx} out of row");
        row * self.row_size + idx
    }

    /// Returns weight `idx` of `row` (0 is the bias).
    #[inline]
    pub fn get(&self, row: usize, idx: usize) -> i64 {
        self.weights[self.slot(row, idx)]
    }

    /// Returns the bias weight of `row`.
    #[inline]
    pub fn bias(&self, row: usize) -> i64 {
        self.get(row, 0)
    }

    /// Returns all weights of `row`, bias first.
    pub fn row(&self, row: usize) -> &[i64] {
        let base = row * self.row_size;
        &self.weights[base..base + self.row_size]
    }

    /// Increments (`up`) or decrements weight `idx` of `row` by one.
    #[inline]
    fn adjust(&mut self, row: usize, idx: usize, up: bool) {
        let slot = self.slot(row, idx);
        if up {
            self.weights[slot] += 1;
        } else {
            self.weights[slot] -= 1;
        }
    }

    /// Computes the perceptron output for `row`.
    ///
    /// Starts from the bias of `row`; for each input `j` adds the weight at
    /// index `j` of row `path[j - 1]` when bit `j - 1` of `input` is set and
    /// subtracts it otherwise.
    pub fn output<'a>(&self, row: usize, input: u64, path: impl IntoIterator<Item = &'a u64>) -> i64 {
        let mut y = self.bias(row);
        for (i, &key) in path.into_iter().take(self.inputs()).enumerate() {
            let w = self.get(key as usize, i + 1);
            if bit(input, i as u32) {
                y += w;
            } else {
                y -= w;
            }
        }
        y
    }

    /// Trains `row` towards `taken`.
    ///
    /// The bias moves towards the outcome; each path-addressed weight is
    /// incremented when its input bit agrees with the outcome and
    /// decremented otherwise.
    pub fn train<'a>(&mut self, row: usize, input: u64, taken: bool, path: impl IntoIterator<Item = &'a u64>) {
        self.adjust(row, 0, taken);
        for (i, &key) in path.into_iter().take(self.inputs()).enumerate() {
            self.adjust(key as usize, i + 1, taken == bit(input, i as u32));
        }
    }
}

/// The two weight tables of the path perceptron.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightStore {
    /// Weights over the `(global << L) | local` history context.
    pub history: WeightTable,
    /// Weights over the bits of the masked branch address.
    pub addr: WeightTable,
}

impl WeightStore {
    /// Creates zeroed tables with `2^addr_bits` rows each.
    pub fn new(addr_bits: u32, history_length: usize) -> Self {
        let rows = 1usize << addr_bits;
        Self {
            history: WeightTable::new(rows, history_length),
            addr: WeightTable::new(rows, addr_bits as usize),
        }
    }
}
