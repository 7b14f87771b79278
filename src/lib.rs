//! Off-chain replica of a segmented CFMM's fixed-point math.
//!
//! The ledger contract is authoritative; this crate reproduces its integer
//! arithmetic bit for bit so swap outputs, deposits and fee accrual can be
//! predicted before a transaction is sent.
//!
//! This crate exposes:
//! - Ledger-native numbers (`num::*`): `Nat`, `Int` and the `X80n`/`X128`/`X128n`
//!   fixed-point encodings.
//! - Pure math (`math::*`): the tick ladder, tick/price conversion,
//!   liquidity/token conversion and the oracle accumulators.
//! - Storage snapshots and the swap engine (`pool::*`).
//!
//! # Examples
//!
//! ## Pure math
//! ```no_run
//! use cfmm_swap_math::{Int, Nat, X80_RESOLUTION, math::tick_math};
//!
//! let sqrt_price = tick_math::sqrt_price_for_tick(&Int::from(0)).unwrap();
//! assert_eq!(sqrt_price.to_normal(), Nat::one());
//! assert_eq!(X80_RESOLUTION, 80);
//! ```
//!
//! ## Simulating a swap against a storage snapshot
//! ```no_run
//! use cfmm_swap_math::{Nat, pool::state::Storage};
//!
//! # fn load_storage() -> Storage { unimplemented!() }
//! // A snapshot fetched from the ledger, e.g. deserialized from JSON.
//! let storage: Storage = load_storage();
//!
//! let result = storage
//!     .swap_part()
//!     .unwrap()
//!     .calculate_x_to_y(&Nat::from(1_000_000u64))
//!     .unwrap();
//! println!("output: {}, input left: {}", result.output, result.input_left);
//!
//! let updated = storage.with_swap_part(result.new_storage_part);
//! println!("new tick: {}", updated.cur_tick_index);
//! ```

pub mod error;
mod hash;
pub mod math;
pub mod num;

pub use hash::{FastMap, TickMap};
pub use num::{Int, Nat, X80n, X128, X128n};

pub mod pool;

pub use pool::state::{Storage, SwapStorage};
pub use pool::swap::SwapResult;

/// Fractional bits of an [`X80n`] square-root price.
pub const X80_RESOLUTION: usize = 80;
/// Fractional bits of the [`X128`]/[`X128n`] accumulators.
pub const X128_RESOLUTION: usize = 128;
pub const HUNDRED_PERCENT_BPS: u32 = 10_000;
