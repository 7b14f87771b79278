use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{FromPrimitive, One, ToPrimitive, Zero};

use crate::error::{MathError, NumberError};
use crate::num::Int;

/// Non-negative arbitrary-precision integer, the ledger's `nat`.
///
/// Construction from anything negative or fractional fails with
/// [`NumberError::InvalidNat`]; so does any subtraction that would go
/// below zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nat(BigUint);

impl Nat {
    #[inline]
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    #[inline]
    pub fn one() -> Self {
        Self(BigUint::one())
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    #[inline]
    pub fn into_biguint(self) -> BigUint {
        self.0
    }

    #[inline]
    pub fn to_int(&self) -> Int {
        Int::from(self)
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.0.to_u64()
    }

    /// Subtracts `rhs`, failing instead of going negative.
    pub fn checked_sub(&self, rhs: &Nat) -> Result<Nat, NumberError> {
        if rhs.0 > self.0 {
            return Err(NumberError::InvalidNat(format!("{self} - {rhs}")));
        }
        Ok(Self(&self.0 - &rhs.0))
    }

    pub fn pow(&self, exp: u32) -> Nat {
        Self(num_traits::pow(self.0.clone(), exp as usize))
    }

    /// Integer division rounding toward zero (floor for naturals).
    pub fn div_floor(&self, rhs: &Nat) -> Result<Nat, MathError> {
        if rhs.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        Ok(Self(&self.0 / &rhs.0))
    }

    /// Integer division rounding up when there is a remainder.
    pub fn div_ceil(&self, rhs: &Nat) -> Result<Nat, MathError> {
        if rhs.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        let (quotient, remainder) = self.0.div_rem(&rhs.0);
        if remainder.is_zero() {
            Ok(Self(quotient))
        } else {
            Ok(Self(quotient + 1u32))
        }
    }

    pub(crate) fn shl_bits(&self, bits: usize) -> Nat {
        Self(&self.0 << bits)
    }

    pub(crate) fn shr_bits(&self, bits: usize) -> Nat {
        Self(&self.0 >> bits)
    }
}

impl fmt::Display for Nat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Nat {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigUint::from_str(s.trim())
            .map(Self)
            .map_err(|_| NumberError::InvalidNat(s.to_string()))
    }
}

impl From<BigUint> for Nat {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

macro_rules! nat_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Nat {
                #[inline]
                fn from(value: $t) -> Self {
                    Self(BigUint::from(value))
                }
            }
        )*
    };
}

nat_from_unsigned!(u8, u16, u32, u64, u128, usize);

macro_rules! nat_try_from_signed {
    ($($t:ty),*) => {
        $(
            impl TryFrom<$t> for Nat {
                type Error = NumberError;

                fn try_from(value: $t) -> Result<Self, Self::Error> {
                    BigUint::try_from(value)
                        .map(Self)
                        .map_err(|_| NumberError::InvalidNat(value.to_string()))
                }
            }
        )*
    };
}

nat_try_from_signed!(i8, i16, i32, i64, i128, isize);

impl TryFrom<f64> for Nat {
    type Error = NumberError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value.fract() != 0.0 || value < 0.0 {
            return Err(NumberError::InvalidNat(value.to_string()));
        }
        BigUint::from_f64(value)
            .map(Self)
            .ok_or_else(|| NumberError::InvalidNat(value.to_string()))
    }
}

impl TryFrom<BigInt> for Nat {
    type Error = NumberError;

    fn try_from(value: BigInt) -> Result<Self, Self::Error> {
        value
            .to_biguint()
            .map(Self)
            .ok_or_else(|| NumberError::InvalidNat(value.to_string()))
    }
}

impl TryFrom<Int> for Nat {
    type Error = NumberError;

    fn try_from(value: Int) -> Result<Self, Self::Error> {
        Nat::try_from(value.into_bigint())
    }
}

impl TryFrom<&Int> for Nat {
    type Error = NumberError;

    fn try_from(value: &Int) -> Result<Self, Self::Error> {
        value
            .as_bigint()
            .to_biguint()
            .map(Self)
            .ok_or_else(|| NumberError::InvalidNat(value.to_string()))
    }
}

impl Add for Nat {
    type Output = Nat;

    fn add(self, rhs: Nat) -> Nat {
        Nat(self.0 + rhs.0)
    }
}

impl Add<&Nat> for &Nat {
    type Output = Nat;

    fn add(self, rhs: &Nat) -> Nat {
        Nat(&self.0 + &rhs.0)
    }
}

impl Mul for Nat {
    type Output = Nat;

    fn mul(self, rhs: Nat) -> Nat {
        Nat(self.0 * rhs.0)
    }
}

impl Mul<&Nat> for &Nat {
    type Output = Nat;

    fn mul(self, rhs: &Nat) -> Nat {
        Nat(&self.0 * &rhs.0)
    }
}
