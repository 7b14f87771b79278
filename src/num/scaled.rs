use std::fmt;

use crate::math::shift::shift_right;
use crate::num::{Int, Nat};
use crate::{X80_RESOLUTION, X128_RESOLUTION};

/// `sqrt(P)` stored as a natural number scaled by `2^80`.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct X80n(pub Nat);

impl X80n {
    #[inline]
    pub fn new(raw: Nat) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(&self) -> &Nat {
        &self.0
    }

    /// Integer part of the represented value, `raw >> 80`.
    pub fn to_normal(&self) -> Nat {
        shift_right(&self.0, X80_RESOLUTION)
    }
}

impl From<Nat> for X80n {
    fn from(value: Nat) -> Self {
        Self(value)
    }
}

impl fmt::Display for X80n {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Signed accumulator scaled by `2^128`.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct X128(pub Int);

impl X128 {
    #[inline]
    pub fn new(raw: Int) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(&self) -> &Int {
        &self.0
    }

    /// Arithmetic right shift by 128: rounds toward negative infinity.
    pub fn to_normal(&self) -> Int {
        self.0.shr_bits(X128_RESOLUTION)
    }
}

impl From<X128n> for X128 {
    fn from(value: X128n) -> Self {
        Self(Int::from(value.0))
    }
}

/// Non-negative accumulator scaled by `2^128`.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct X128n(pub Nat);

impl X128n {
    #[inline]
    pub fn new(raw: Nat) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(&self) -> &Nat {
        &self.0
    }

    pub fn to_normal(&self) -> Nat {
        shift_right(&self.0, X128_RESOLUTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_normal_drops_fractional_bits() {
        let two_and_a_half = X80n::new(Nat::from(5u32).shl_bits(79));
        assert_eq!(two_and_a_half.to_normal(), Nat::from(2u32));

        let acc = X128n::new(Nat::from(3u32).shl_bits(128) + Nat::one());
        assert_eq!(acc.to_normal(), Nat::from(3u32));
    }

    #[test]
    fn signed_to_normal_rounds_down() {
        let minus_half = X128::new(-Int::from(Nat::one().shl_bits(127)));
        assert_eq!(minus_half.to_normal(), Int::from(-1));

        let plus_half = X128::new(Int::from(Nat::one().shl_bits(127)));
        assert_eq!(plus_half.to_normal(), Int::zero());
    }
}
