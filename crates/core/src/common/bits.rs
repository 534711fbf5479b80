//! Register masks and bit extraction.
//!
//! History registers and masked addresses are stored as `u64`. Widths range
//! over `0..=64`, so every shift here goes through the checked variants.

/// Returns a mask with the low `bits` bits set.
///
/// `mask(0)` is zero and `mask(64)` is all ones.
#[inline]
pub const fn mask(bits: u32) -> u64 {
    if bits == 0 {
        0
    } else if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Returns bit `idx` of `value` (bit 0 is the least significant).
#[inline]
pub const fn bit(value: u64, idx: u32) -> bool {
    match value.checked_shr(idx) {
        Some(v) => v & 1 != 0,
        None => false,
    }
}

/// Shifts `outcome` into the low end of `reg` and truncates to `reg_mask`.
#[inline]
pub const fn shift_in(reg: u64, outcome: bool, reg_mask: u64) -> u64 {
    ((reg << 1) | outcome as u64) & reg_mask
}
