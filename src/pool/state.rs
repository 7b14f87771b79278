//! Ledger-shaped snapshots of pool storage.
//!
//! Everything here is a plain value: the swap engine and the oracle helpers
//! read `&Storage`/`&SwapStorage` and hand back fresh copies.

use crate::error::StateError;
use crate::hash::{FastMap, TickMap};
use crate::num::{Int, Nat, X80n, X128, X128n};

/// A pair of amounts, one per pool token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerToken<T> {
    pub x: T,
    pub y: T,
}

impl<T> PerToken<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PerToken<U> {
        PerToken::new(f(self.x), f(self.y))
    }
}

pub type BalanceNat = PerToken<Nat>;
pub type BalanceNatX128 = PerToken<X128n>;
pub type BalanceIntX128 = PerToken<X128>;
/// Signed token amounts; positive means the user pays into the pool.
pub type TokensDelta = PerToken<Int>;

/// An initialized tick, one node of the doubly-linked list ordered by index.
///
/// The `*_outside` accumulators hold what accrued on the side of the tick
/// opposite to the current price. Crossing the tick turns each of them into
/// its complement against the global value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickState {
    pub prev: Int,
    pub next: Int,
    /// Liquidity added when the price crosses this tick moving up.
    pub liquidity_net: Int,
    pub n_positions: Nat,
    pub seconds_outside: Nat,
    pub tick_cumulative_outside: Int,
    pub fee_growth_outside: BalanceNatX128,
    pub seconds_per_liquidity_outside: X128n,
    pub sqrt_price: X80n,
}

impl TickState {
    /// A tick with empty outside accumulators.
    pub fn new(prev: Int, next: Int, liquidity_net: Int, sqrt_price: X80n) -> Self {
        Self {
            prev,
            next,
            liquidity_net,
            n_positions: Nat::zero(),
            seconds_outside: Nat::zero(),
            tick_cumulative_outside: Int::zero(),
            fee_growth_outside: BalanceNatX128::default(),
            seconds_per_liquidity_outside: X128n::default(),
            sqrt_price,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionState {
    pub owner: String,
    pub lower_tick_index: Int,
    pub upper_tick_index: Int,
    pub liquidity: Nat,
    /// Fee growth inside the range when the position was last touched.
    pub fee_growth_inside_last: BalanceIntX128,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constants {
    pub fee_bps: Nat,
    pub ctez_burn_fee_bps: Nat,
    pub tick_spacing: Nat,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickCumulative {
    pub sum: Int,
    pub block_start_value: Int,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplCumulative {
    pub sum: X128n,
    pub block_start_liquidity_value: Nat,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedCumulatives {
    pub time: Nat,
    pub tick: TickCumulative,
    pub spl: SplCumulative,
}

impl TimedCumulatives {
    pub fn new(time: Nat) -> Self {
        Self {
            time,
            ..Default::default()
        }
    }
}

/// Ring buffer of oracle records; `map[last]` is the newest one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedCumulativesBuffer {
    pub map: FastMap<Nat, TimedCumulatives>,
    pub first: Nat,
    pub last: Nat,
    pub reserved_length: Nat,
}

impl TimedCumulativesBuffer {
    /// A one-record buffer holding `record` at index 0.
    pub fn single(record: TimedCumulatives) -> Self {
        Self::with_reserved_slots(record, 0)
    }

    /// A fresh buffer with `record` at index 0 and `extra_reserved_slots`
    /// zero-time placeholders after it, as the ledger lays it out when a
    /// pool is deployed with a longer oracle history.
    pub fn with_reserved_slots(record: TimedCumulatives, extra_reserved_slots: usize) -> Self {
        let mut map = FastMap::default();
        map.insert(Nat::zero(), record);
        for slot in 1..=extra_reserved_slots {
            map.insert(Nat::from(slot), TimedCumulatives::new(Nat::zero()));
        }
        Self {
            map,
            first: Nat::zero(),
            last: Nat::zero(),
            reserved_length: Nat::from(extra_reserved_slots + 1),
        }
    }

    pub fn last_cumulative(&self) -> Result<&TimedCumulatives, StateError> {
        self.map
            .get(&self.last)
            .ok_or_else(|| StateError::MissingCumulative(self.last.clone()))
    }
}

/// Full pool storage snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Storage {
    /// Virtual liquidity in range at the current price.
    pub liquidity: Nat,
    pub sqrt_price: X80n,
    pub cur_tick_index: Int,
    /// Highest initialized tick at or below `cur_tick_index`.
    pub cur_tick_witness: Int,
    pub fee_growth: BalanceNatX128,
    pub ticks: TickMap,
    pub positions: FastMap<Nat, PositionState>,
    pub cumulatives_buffer: TimedCumulativesBuffer,
    pub constants: Constants,
    pub new_position_id: Nat,
}

impl Storage {
    pub fn tick(&self, index: &Int) -> Result<&TickState, StateError> {
        self.ticks
            .get(index)
            .ok_or_else(|| StateError::MissingTick(index.clone()))
    }

    pub fn position(&self, id: &Nat) -> Result<&PositionState, StateError> {
        self.positions
            .get(id)
            .ok_or_else(|| StateError::MissingPosition(id.clone()))
    }

    pub fn last_cumulative(&self) -> Result<&TimedCumulatives, StateError> {
        self.cumulatives_buffer.last_cumulative()
    }

    /// Projects the fields the swap engine reads.
    pub fn swap_part(&self) -> Result<SwapStorage, StateError> {
        Ok(SwapStorage {
            liquidity: self.liquidity.clone(),
            sqrt_price: self.sqrt_price.clone(),
            cur_tick_index: self.cur_tick_index.clone(),
            cur_tick_witness: self.cur_tick_witness.clone(),
            ticks: self.ticks.clone(),
            constants: self.constants.clone(),
            last_cumulative: self.last_cumulative()?.clone(),
        })
    }

    /// Returns a copy of this snapshot with the swap engine's output merged
    /// back in. The cumulatives buffer is left untouched.
    pub fn with_swap_part(&self, part: SwapStorage) -> Storage {
        Storage {
            liquidity: part.liquidity,
            sqrt_price: part.sqrt_price,
            cur_tick_index: part.cur_tick_index,
            cur_tick_witness: part.cur_tick_witness,
            ticks: part.ticks,
            constants: part.constants,
            ..self.clone()
        }
    }
}

/// The slice of storage the swap engine reads and rewrites.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapStorage {
    pub liquidity: Nat,
    pub sqrt_price: X80n,
    pub cur_tick_index: Int,
    pub cur_tick_witness: Int,
    pub ticks: TickMap,
    pub constants: Constants,
    pub last_cumulative: TimedCumulatives,
}

impl SwapStorage {
    pub fn tick(&self, index: &Int) -> Result<&TickState, StateError> {
        self.ticks
            .get(index)
            .ok_or_else(|| StateError::MissingTick(index.clone()))
    }
}
