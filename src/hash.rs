//! Map type used for tick and position lookups.
//!
//! Every backend is a plain `HashMap` with a different hasher so the maps
//! stay interchangeable (and serde-compatible) whichever feature is enabled.
//! Build them with `FastMap::default()`.

use crate::num::Int;
use crate::pool::state::TickState;

#[cfg(all(
    feature = "rustc-hash",
    not(any(feature = "ahash", feature = "std-hash"))
))]
pub type FastMap<K, V> = std::collections::HashMap<K, V, rustc_hash::FxBuildHasher>;

#[cfg(all(
    feature = "ahash",
    not(any(feature = "rustc-hash", feature = "std-hash"))
))]
pub type FastMap<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;

#[cfg(any(
    all(
        not(feature = "rustc-hash"),
        not(feature = "ahash"),
        not(feature = "std-hash")
    ),
    feature = "std-hash",
    all(feature = "rustc-hash", feature = "ahash"),
    all(feature = "rustc-hash", feature = "std-hash"),
    all(feature = "ahash", feature = "std-hash"),
))]
pub type FastMap<K, V> = std::collections::HashMap<K, V>;

/// Initialized ticks keyed by their index.
pub type TickMap = FastMap<Int, TickState>;
