//! Branch trace records and parsing.
//!
//! Traces are plain text, one branch per line:
//!
//! ```text
//! # pc        kind  [thread]
//! 0x4005d0    T
//! 0x4005e4    N     1
//! 0x400610    J
//! ```
//!
//! `kind` is `T` (conditional, taken), `N` (conditional, not taken) or `J`
//! (unconditional). The program counter is hexadecimal with a `0x` prefix or
//! decimal; the thread id defaults to 0. Blank lines and `#` comments are
//! skipped.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::bru::ThreadId;
use crate::common::error::TraceError;

/// Kind of a traced branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchKind {
    /// Conditional branch with its resolved direction.
    Conditional {
        /// Whether the branch was taken.
        taken: bool,
    },
    /// Unconditional jump; always taken and never looked up.
    Unconditional,
}

impl BranchKind {
    /// Resolved direction of the branch.
    #[inline]
    pub const fn taken(self) -> bool {
        match self {
            Self::Conditional { taken } => taken,
            Self::Unconditional => true,
        }
    }

    /// True for conditional branches.
    #[inline]
    pub const fn is_conditional(self) -> bool {
        matches!(self, Self::Conditional { .. })
    }
}

/// One retired branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BranchRecord {
    /// Branch instruction address.
    pub pc: u64,
    /// Kind and resolved direction.
    pub kind: BranchKind,
    /// Hardware thread that executed the branch.
    pub thread: ThreadId,
}

impl BranchRecord {
    /// Creates a conditional branch record on thread 0.
    pub const fn conditional(pc: u64, taken: bool) -> Self {
        Self {
            pc,
            kind: BranchKind::Conditional { taken },
            thread: 0,
        }
    }

    /// Creates an unconditional branch record on thread 0.
    pub const fn unconditional(pc: u64) -> Self {
        Self {
            pc,
            kind: BranchKind::Unconditional,
            thread: 0,
        }
    }

    /// Returns the record moved to thread `thread`.
    #[must_use]
    pub const fn on_thread(mut self, thread: ThreadId) -> Self {
        self.thread = thread;
        self
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal address.
fn parse_pc(field: &str) -> Result<u64, String> {
    let parsed = match field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => field.parse(),
    };
    parsed.map_err(|e| format!("bad pc '{field}': {e}"))
}

impl FromStr for BranchRecord {
    type Err = String;

    /// Parses the fields of a single non-comment line.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split_whitespace();
        let pc = parse_pc(fields.next().ok_or("missing pc")?)?;
        let kind = match fields.next().ok_or("missing branch kind")? {
            "T" | "t" => BranchKind::Conditional { taken: true },
            "N" | "n" => BranchKind::Conditional { taken: false },
            "J" | "j" => BranchKind::Unconditional,
            other => return Err(format!("unknown branch kind '{other}'")),
        };
        let thread = match fields.next() {
            Some(t) => t.parse().map_err(|e| format!("bad thread id '{t}': {e}"))?,
            None => 0,
        };
        if let Some(extra) = fields.next() {
            return Err(format!("unexpected field '{extra}'"));
        }
        Ok(Self { pc, kind, thread })
    }
}

/// Parses a whole trace.
///
/// # Errors
///
/// Returns [`TraceError::Parse`] with the 1-based line number of the first
/// malformed line.
pub fn parse(text: &str) -> Result<Vec<BranchRecord>, TraceError> {
    let mut records = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let record = line.parse().map_err(|reason| TraceError::Parse {
            line: idx + 1,
            reason,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Reads and parses a trace file.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be read, or
/// [`TraceError::Parse`] for malformed content.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<BranchRecord>, TraceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse(&text)?;
    debug!(path = %path.display(), branches = records.len(), "trace loaded");
    Ok(records)
}
