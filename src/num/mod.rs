//! Ledger-native integers and the fixed-point encodings built on them.

mod int;
mod nat;
mod scaled;

pub use int::Int;
pub use nat::Nat;
pub use scaled::{X80n, X128, X128n};

#[cfg(feature = "serde")]
mod serde_impls {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Int, Nat};

    // Ledger RPCs hand numbers back as decimal strings; hand-written
    // fixtures tend to use plain JSON integers. Both are accepted, but
    // integers past 64 bits reach the visitor as `f64`, so anything a
    // double cannot hold exactly must be quoted.

    /// Magnitudes from here on may already have been rounded by the parser.
    const EXACT_F64_LIMIT: f64 = 9_007_199_254_740_992.0;

    fn exact_f64<E: de::Error>(v: f64) -> Result<f64, E> {
        if v.abs() >= EXACT_F64_LIMIT {
            return Err(E::custom(format_args!(
                "number {v} is too large to be read exactly, pass it as a decimal string"
            )));
        }
        Ok(v)
    }

    impl Serialize for Nat {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl Serialize for Int {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    struct NatVisitor;

    impl Visitor<'_> for NatVisitor {
        type Value = Nat;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or its decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Nat, E> {
            Ok(Nat::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Nat, E> {
            Nat::try_from(v).map_err(E::custom)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Nat, E> {
            Nat::try_from(exact_f64::<E>(v)?).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Nat, E> {
            v.parse().map_err(E::custom)
        }
    }

    struct IntVisitor;

    impl Visitor<'_> for IntVisitor {
        type Value = Int;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer or its decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Int, E> {
            Ok(Int::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Int, E> {
            Ok(Int::from(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Int, E> {
            Int::try_from(exact_f64::<E>(v)?).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Int, E> {
            v.parse().map_err(E::custom)
        }
    }

    impl<'de> Deserialize<'de> for Nat {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(NatVisitor)
        }
    }

    impl<'de> Deserialize<'de> for Int {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(IntVisitor)
        }
    }

}
