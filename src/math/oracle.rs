//! Outside/inside decomposition of the oracle accumulators.
//!
//! A tick stores each accumulator as the amount accrued on the side of the
//! tick away from the current price. With the current tick `c`:
//!
//! * `below(t)` is `outside(t)` when `c >= t`, else `global - outside(t)`
//! * `above(t)` is `global - outside(t)` when `c >= t`, else `outside(t)`
//! * `inside(lower, upper) = global - below(lower) - above(upper)`
//!
//! Globals for the time-weighted values come from the ledger's `observe`
//! view and are passed in as an [`Observation`].

use crate::error::Error;
use crate::num::{Int, Nat, X128, X128n};
use crate::pool::state::{BalanceIntX128, BalanceNatX128, PerToken, Storage};

/// Cumulative values the ledger reports for a point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CumulativesValue {
    pub tick_cumulative: Int,
    pub seconds_per_liquidity_cumulative: X128n,
}

/// An `observe` result together with the time it was taken for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    pub time: Nat,
    pub cumulatives: CumulativesValue,
}

impl Observation {
    pub fn new(time: Nat, tick_cumulative: Int, seconds_per_liquidity_cumulative: X128n) -> Self {
        Self {
            time,
            cumulatives: CumulativesValue {
                tick_cumulative,
                seconds_per_liquidity_cumulative,
            },
        }
    }
}

/// Accumulators attributable to a tick range.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickAccumulators {
    pub seconds: Int,
    pub tick_cumulative: Int,
    pub fee_growth: BalanceIntX128,
    pub seconds_per_liquidity: X128,
}

/// "Outside" values a tick starts with when it is first initialized.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutsideAccumulators {
    pub seconds_outside: Nat,
    pub tick_cumulative_outside: Int,
    pub fee_growth_outside: BalanceNatX128,
    pub seconds_per_liquidity_outside: X128n,
}

struct Decomposition<'a> {
    cur_tick_index: &'a Int,
    lower_tick_index: &'a Int,
    upper_tick_index: &'a Int,
}

impl Decomposition<'_> {
    fn below(&self, tick_index: &Int, global: &Int, outside: &Int) -> Int {
        if self.cur_tick_index >= tick_index {
            outside.clone()
        } else {
            global - outside
        }
    }

    fn above(&self, tick_index: &Int, global: &Int, outside: &Int) -> Int {
        if self.cur_tick_index >= tick_index {
            global - outside
        } else {
            outside.clone()
        }
    }

    fn inside(&self, global: &Int, lower_outside: &Int, upper_outside: &Int) -> Int {
        global
            - &self.below(self.lower_tick_index, global, lower_outside)
            - &self.above(self.upper_tick_index, global, upper_outside)
    }

    fn inside_nat(&self, global: &Nat, lower_outside: &Nat, upper_outside: &Nat) -> Int {
        self.inside(&global.to_int(), &lower_outside.to_int(), &upper_outside.to_int())
    }
}

/// Seconds, tick cumulative, per-token fee growth and seconds per liquidity
/// accrued while the price was inside `[lower_tick_index, upper_tick_index)`.
///
/// Both ticks must be initialized.
pub fn tick_accumulators_inside(
    storage: &Storage,
    lower_tick_index: &Int,
    upper_tick_index: &Int,
    observation: &Observation,
) -> Result<TickAccumulators, Error> {
    let lower = storage.tick(lower_tick_index)?;
    let upper = storage.tick(upper_tick_index)?;
    let split = Decomposition {
        cur_tick_index: &storage.cur_tick_index,
        lower_tick_index,
        upper_tick_index,
    };

    let fee_growth = PerToken::new(
        split.inside_nat(
            storage.fee_growth.x.raw(),
            lower.fee_growth_outside.x.raw(),
            upper.fee_growth_outside.x.raw(),
        ),
        split.inside_nat(
            storage.fee_growth.y.raw(),
            lower.fee_growth_outside.y.raw(),
            upper.fee_growth_outside.y.raw(),
        ),
    );

    Ok(TickAccumulators {
        seconds: split.inside_nat(&observation.time, &lower.seconds_outside, &upper.seconds_outside),
        tick_cumulative: split.inside(
            &observation.cumulatives.tick_cumulative,
            &lower.tick_cumulative_outside,
            &upper.tick_cumulative_outside,
        ),
        fee_growth: fee_growth.map(X128::new),
        seconds_per_liquidity: X128::new(split.inside_nat(
            observation.cumulatives.seconds_per_liquidity_cumulative.raw(),
            lower.seconds_per_liquidity_outside.raw(),
            upper.seconds_per_liquidity_outside.raw(),
        )),
    })
}

/// Starting "outside" values for a tick about to be initialized at
/// `tick_index`.
///
/// By convention everything below the current tick has already happened
/// "outside" it, so a tick at or below the current one starts from the
/// current globals and a tick above it starts from zero.
pub fn init_tick_accumulators(
    storage: &Storage,
    tick_index: &Int,
    observation: &Observation,
) -> TickOutsideAccumulators {
    if storage.cur_tick_index >= *tick_index {
        TickOutsideAccumulators {
            seconds_outside: observation.time.clone(),
            tick_cumulative_outside: observation.cumulatives.tick_cumulative.clone(),
            fee_growth_outside: storage.fee_growth.clone(),
            seconds_per_liquidity_outside: observation
                .cumulatives
                .seconds_per_liquidity_cumulative
                .clone(),
        }
    } else {
        TickOutsideAccumulators::default()
    }
}
