//! Trace Parsing Tests.

use std::io::Write;

use pathperc_core::common::TraceError;
use pathperc_core::trace::{self, BranchKind, BranchRecord};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::NamedTempFile;

// ══════════════════════════════════════════════════════════
// 1. Line format
// ══════════════════════════════════════════════════════════

/// Addresses are hex with `0x` or decimal; the thread defaults to 0.
#[test]
fn parses_all_kinds() {
    let text = "0x4005d0 T\n4195812 N 1\n0X400610 j\n";
    let records = trace::parse(text).unwrap();
    assert_eq!(
        records,
        vec![
            BranchRecord::conditional(0x40_05d0, true),
            BranchRecord::conditional(4_195_812, false).on_thread(1),
            BranchRecord::unconditional(0x40_0610),
        ]
    );
    assert!(records[2].kind.taken());
    assert!(!records[2].kind.is_conditional());
}

/// Comments and blank lines are skipped.
#[test]
fn skips_comments_and_blanks() {
    let text = "# header\n\n   \n0x10 t   # loop back-edge\n# 0x20 N\n0x30 n\n";
    let records = trace::parse(text).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].kind, BranchKind::Conditional { taken: true });
    assert_eq!(records[1].pc, 0x30);
}

/// Malformed lines report their 1-based line number.
#[rstest]
#[case("0x10 T\nzz T\n", 2, "bad pc")]
#[case("0x10\n", 1, "missing branch kind")]
#[case("# c\n0x10 X\n", 2, "unknown branch kind")]
#[case("0x10 T -1\n", 1, "bad thread id")]
#[case("\n\n0x10 T 0 extra\n", 3, "unexpected field")]
fn malformed_lines(#[case] text: &str, #[case] line_no: usize, #[case] fragment: &str) {
    match trace::parse(text) {
        Err(TraceError::Parse { line, reason }) => {
            assert_eq!(line, line_no);
            assert!(reason.contains(fragment), "reason was {reason:?}");
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

// ══════════════════════════════════════════════════════════
// 2. Files
// ══════════════════════════════════════════════════════════

/// A trace file round-trips through `load`.
#[test]
fn loads_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "0x100 T").unwrap();
    writeln!(file, "0x104 N 0").unwrap();
    file.flush().unwrap();

    let records = trace::load(file.path()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1], BranchRecord::conditional(0x104, false));
}

/// A missing file is an I/O error naming the path.
#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.trace");
    let err = trace::load(&path).unwrap_err();
    assert!(matches!(err, TraceError::Io { .. }));
    assert!(err.to_string().contains("absent.trace"));
}
