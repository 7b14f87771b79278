use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{FromPrimitive, One, ToPrimitive, Zero};

use crate::error::{MathError, NumberError};
use crate::num::Nat;

/// Signed arbitrary-precision integer, the ledger's `int`.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Int(BigInt);

impl Int {
    #[inline]
    pub fn zero() -> Self {
        Self(BigInt::zero())
    }

    #[inline]
    pub fn one() -> Self {
        Self(BigInt::one())
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.sign() == Sign::Plus
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.sign() == Sign::Minus
    }

    /// Magnitude as a natural number.
    pub fn abs(&self) -> Nat {
        Nat::from(self.0.magnitude().clone())
    }

    #[inline]
    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    #[inline]
    pub fn into_bigint(self) -> BigInt {
        self.0
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.0.to_i64()
    }

    /// Division rounding toward negative infinity.
    pub fn div_floor(&self, rhs: &Int) -> Result<Int, MathError> {
        if rhs.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        Ok(Self(Integer::div_floor(&self.0, &rhs.0)))
    }

    /// Division rounding toward positive infinity.
    pub fn div_ceil(&self, rhs: &Int) -> Result<Int, MathError> {
        if rhs.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        let (quotient, remainder) = self.0.div_mod_floor(&rhs.0);
        if remainder.is_zero() {
            Ok(Self(quotient))
        } else {
            Ok(Self(quotient + 1))
        }
    }

    /// Arithmetic shift: `BigInt >>` rounds toward negative infinity.
    pub(crate) fn shr_bits(&self, bits: usize) -> Int {
        Self(&self.0 >> bits)
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Int {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigInt::from_str(s.trim())
            .map(Self)
            .map_err(|_| NumberError::InvalidInt(s.to_string()))
    }
}

impl From<BigInt> for Int {
    fn from(value: BigInt) -> Self {
        Self(value)
    }
}

impl From<Nat> for Int {
    fn from(value: Nat) -> Self {
        Self(BigInt::from(value.into_biguint()))
    }
}

impl From<&Nat> for Int {
    fn from(value: &Nat) -> Self {
        Self(BigInt::from(value.as_biguint().clone()))
    }
}

macro_rules! int_from_primitive {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Int {
                #[inline]
                fn from(value: $t) -> Self {
                    Self(BigInt::from(value))
                }
            }
        )*
    };
}

int_from_primitive!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl TryFrom<f64> for Int {
    type Error = NumberError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(NumberError::InvalidInt(value.to_string()));
        }
        BigInt::from_f64(value)
            .map(Self)
            .ok_or_else(|| NumberError::InvalidInt(value.to_string()))
    }
}

macro_rules! forward_int_binop {
    ($trait:ident, $method:ident) => {
        impl $trait for Int {
            type Output = Int;

            #[inline]
            fn $method(self, rhs: Int) -> Int {
                Int(self.0.$method(rhs.0))
            }
        }

        impl $trait<&Int> for &Int {
            type Output = Int;

            #[inline]
            fn $method(self, rhs: &Int) -> Int {
                Int((&self.0).$method(&rhs.0))
            }
        }

        impl $trait<&Int> for Int {
            type Output = Int;

            #[inline]
            fn $method(self, rhs: &Int) -> Int {
                Int(self.0.$method(&rhs.0))
            }
        }
    };
}

forward_int_binop!(Add, add);
forward_int_binop!(Sub, sub);
forward_int_binop!(Mul, mul);

impl Neg for Int {
    type Output = Int;

    fn neg(self) -> Int {
        Int(-self.0)
    }
}

impl Neg for &Int {
    type Output = Int;

    fn neg(self) -> Int {
        Int(-&self.0)
    }
}
