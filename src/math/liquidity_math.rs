use num_bigint::BigUint;
use num_integer::Integer;

use crate::error::{Error, MathError, NumberError};
use crate::math::shift::{shift_left, two_pow};
use crate::math::tick_math::sqrt_price_for_tick;
use crate::num::{Int, Nat, X80n};
use crate::pool::state::TokensDelta;
use crate::{HUNDRED_PERCENT_BPS, X80_RESOLUTION};

/// Applies a signed liquidity delta, failing if the result would go
/// negative.
pub fn add_delta(liquidity: &Nat, delta: &Int) -> Result<Nat, NumberError> {
    Nat::try_from(liquidity.to_int() + delta)
}

/// Token amounts that move when `liquidity_delta` is added to the range
/// `[lower_tick_index, upper_tick_index)` at the given current price.
///
/// Every amount is rounded up so the pool is never short: deposits are
/// slightly overstated and withdrawals (negative deltas) slightly
/// understated.
pub fn liquidity_delta_to_tokens_delta(
    liquidity_delta: &Int,
    lower_tick_index: &Int,
    upper_tick_index: &Int,
    cur_tick_index: &Int,
    sqrt_price: &X80n,
) -> Result<TokensDelta, Error> {
    let sqrt_price = sqrt_price.raw().to_int();
    let sqrt_price_lower = sqrt_price_for_tick(lower_tick_index)?.0.to_int();
    let sqrt_price_upper = sqrt_price_for_tick(upper_tick_index)?.0.to_int();
    let one = two_pow(X80_RESOLUTION).to_int();

    // x: L * (1/sqrt(p_a) - 1/sqrt(p_b)), y: L * (sqrt(p_b) - sqrt(p_a))
    let delta_x = |from: &Int, to: &Int| {
        (liquidity_delta * &one * (to - from)).div_ceil(&(from * to))
    };
    let delta_y =
        |from: &Int, to: &Int| (liquidity_delta * &(to - from)).div_ceil(&one);

    let delta = if cur_tick_index < lower_tick_index {
        TokensDelta::new(delta_x(&sqrt_price_lower, &sqrt_price_upper)?, Int::zero())
    } else if cur_tick_index < upper_tick_index {
        TokensDelta::new(
            delta_x(&sqrt_price, &sqrt_price_upper)?,
            delta_y(&sqrt_price_lower, &sqrt_price)?,
        )
    } else {
        TokensDelta::new(Int::zero(), delta_y(&sqrt_price_lower, &sqrt_price_upper)?)
    };
    Ok(delta)
}

/// New square-root price after `dx` of token X enters a single segment.
///
/// From `Δ(1/√P) = Δx / L`:
/// `sqrt_price_new = (L * sqrt_price_old << 80) / ((L << 80) + dx * sqrt_price_old)`,
/// rounded down.
pub fn calc_new_price_x(
    sqrt_price_old: &X80n,
    liquidity: &Nat,
    dx: &Nat,
) -> Result<X80n, MathError> {
    let sqrt_price_old = sqrt_price_old.raw();
    let num = shift_left(&(liquidity * sqrt_price_old), X80_RESOLUTION);
    let denom = shift_left(liquidity, X80_RESOLUTION) + dx * sqrt_price_old;

    Ok(X80n::new(num.div_floor(&denom)?))
}

/// New square-root price after `dy` of token Y enters a single segment.
///
/// From `Δ√P = Δy / L`: `sqrt_price_old + ceil((dy << 80) / L)`.
pub fn calc_new_price_y(
    sqrt_price_old: &X80n,
    liquidity: &Nat,
    dy: &Nat,
) -> Result<X80n, MathError> {
    let step = shift_left(dy, X80_RESOLUTION).div_ceil(liquidity)?;
    Ok(X80n::new(sqrt_price_old.raw() + &step))
}

/// Swap fee charged on `tokens_delta`, rounded up.
pub fn calc_swap_fee(fee_bps: &Nat, tokens_delta: &Nat) -> Nat {
    let charged = (tokens_delta * fee_bps).into_biguint();
    Nat::from(Integer::div_ceil(&charged, &BigUint::from(HUNDRED_PERCENT_BPS)))
}

/// `dy` after the protocol's cut, rounded down.
pub fn remove_protocol_fee(dy: &Nat, proto_fee_bps: &Nat) -> Result<Nat, NumberError> {
    let kept_bps = Nat::from(HUNDRED_PERCENT_BPS).checked_sub(proto_fee_bps)?;
    let kept = (dy * &kept_bps).into_biguint() / BigUint::from(HUNDRED_PERCENT_BPS);
    Ok(Nat::from(kept))
}

/// X tokens paid out when the price rises from `sqrt_price_old` to
/// `sqrt_price_new`: `floor(L * 2^80 * (new - old) / (old * new))`.
pub fn calc_received_x(
    sqrt_price_old: &X80n,
    sqrt_price_new: &X80n,
    liquidity: &Nat,
) -> Result<Int, MathError> {
    let old = sqrt_price_old.raw().to_int();
    let new = sqrt_price_new.raw().to_int();
    let num = liquidity.to_int() * two_pow(X80_RESOLUTION).to_int() * (&new - &old);

    num.div_floor(&(old * new))
}

/// Y tokens paid out when the price falls from `sqrt_price_old` to
/// `sqrt_price_new`: `floor(L * (old - new) / 2^80)`.
pub fn calc_received_y(sqrt_price_old: &X80n, sqrt_price_new: &X80n, liquidity: &Nat) -> Int {
    let old = sqrt_price_old.raw().to_int();
    let new = sqrt_price_new.raw().to_int();

    (liquidity.to_int() * (old - new)).shr_bits(X80_RESOLUTION)
}
