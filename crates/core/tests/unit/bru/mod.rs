//! Branch prediction unit tests.


/// Per-thread path table.
pub mod path;



/// Speculative commit and squash.
pub mod rollback;
