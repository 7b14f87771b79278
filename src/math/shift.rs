use crate::num::Nat;

/// Largest shift applied in a single stepped-shift step.
pub const MAX_SHIFT: usize = 256;

/// `x * 2^bits`.
#[inline]
pub fn shift_left(x: &Nat, bits: usize) -> Nat {
    x.shl_bits(bits)
}

/// `floor(x / 2^bits)`.
#[inline]
pub fn shift_right(x: &Nat, bits: usize) -> Nat {
    x.shr_bits(bits)
}

/// `shift_left` applied in steps of at most [`MAX_SHIFT`] bits.
///
/// Produces the same value as a direct shift; kept for parity with the
/// contract, whose shift instructions are bounded at 256 bits.
pub fn stepped_shift_left(x: &Nat, mut bits: usize) -> Nat {
    let mut acc = x.clone();
    while bits > MAX_SHIFT {
        acc = shift_left(&acc, MAX_SHIFT);
        bits -= MAX_SHIFT;
    }
    shift_left(&acc, bits)
}

/// `shift_right` applied in steps of at most [`MAX_SHIFT`] bits, flooring at
/// every step.
pub fn stepped_shift_right(x: &Nat, mut bits: usize) -> Nat {
    let mut acc = x.clone();
    while bits > MAX_SHIFT {
        acc = shift_right(&acc, MAX_SHIFT);
        bits -= MAX_SHIFT;
    }
    shift_right(&acc, bits)
}

/// Re-expresses a value scaled by `2^from_bits` as one scaled by
/// `2^to_bits`, flooring when precision is dropped.
pub fn adjust_scale(value: &Nat, from_bits: usize, to_bits: usize) -> Nat {
    if to_bits >= from_bits {
        shift_left(value, to_bits - from_bits)
    } else {
        shift_right(value, from_bits - to_bits)
    }
}

/// `2^bits` as a natural number.
#[inline]
pub fn two_pow(bits: usize) -> Nat {
    Nat::one().shl_bits(bits)
}
