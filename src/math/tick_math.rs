use crate::X80_RESOLUTION;
use crate::error::{Error, MathError, SwapError};
use crate::math::ladder::{LADDER_STEPS, half_bps_pow};
use crate::math::shift::{stepped_shift_left, stepped_shift_right};
use crate::num::{Int, Nat, X80n};

/// Largest tick magnitude the ladder can exponentiate.
pub const MAX_TICK: i64 = (1 << LADDER_STEPS) - 1;
pub const MIN_TICK: i64 = -MAX_TICK;

/// Returns the square-root price (scaled by `2^80`) at `tick`, computed
/// with the contract's ladder so the result matches the ledger bit for bit.
///
/// Fails with [`MathError::TickOutOfBounds`] only when `|tick|` exceeds
/// what the ladder covers.
pub fn sqrt_price_for_tick(tick: &Int) -> Result<X80n, MathError> {
    let abs_tick = tick
        .abs()
        .to_u64()
        .filter(|abs| *abs <= MAX_TICK as u64)
        .ok_or_else(|| MathError::TickOutOfBounds(tick.clone()))?;

    let product = half_bps_pow(abs_tick, tick.is_positive())
        .ok_or_else(|| MathError::TickOutOfBounds(tick.clone()))?;

    let doffset = -(X80_RESOLUTION as i64) - product.offset;
    let sqrt_price = if doffset > 0 {
        stepped_shift_right(&product.v, doffset as usize)
    } else {
        stepped_shift_left(&product.v, doffset.unsigned_abs() as usize)
    };
    Ok(X80n::new(sqrt_price))
}

/// Rational approximation of `log_{sqrt(1.0001)}(x / y)`, floored.
///
/// The Padé-style form is only accurate near 1, so any ratio outside
/// `[0.7, 1.5]` is refused with [`SwapError::TooBigPriceChange`].
pub fn floor_log_half_bps(x: &Nat, y: &Nat) -> Result<Int, Error> {
    let ten_x = x * &Nat::from(10u32);
    if ten_x < y * &Nat::from(7u32) || ten_x > y * &Nat::from(15u32) {
        return Err(SwapError::TooBigPriceChange.into());
    }

    let x_plus_y = x + y;
    let num = (x.to_int() - y.to_int()) * Int::from(60003) * x_plus_y.to_int();
    let denom = &x_plus_y * &x_plus_y + &(x * y) * &Nat::from(2u32);

    Ok(num.div_floor(&denom.to_int())?)
}

/// Walks `cur_tick_index` down or up until
/// `sqrt_price_for_tick(i) <= sqrt_price_new < sqrt_price_for_tick(i + 1)`.
///
/// Prices at or above the top of the ladder resolve to [`MAX_TICK`].
pub fn fix_cur_tick_index(cur_tick_index: &Int, sqrt_price_new: &X80n) -> Result<Int, MathError> {
    let max_tick = Int::from(MAX_TICK);
    let mut tick = cur_tick_index.clone();
    let mut tick_sqrt_price = sqrt_price_for_tick(&tick)?;

    loop {
        if *sqrt_price_new < tick_sqrt_price {
            tick = tick - Int::one();
            tick_sqrt_price = sqrt_price_for_tick(&tick)?;
            continue;
        }
        if tick == max_tick {
            return Ok(tick);
        }

        let next_tick = &tick + &Int::one();
        let next_sqrt_price = sqrt_price_for_tick(&next_tick)?;
        if next_sqrt_price <= *sqrt_price_new {
            tick = next_tick;
            tick_sqrt_price = next_sqrt_price;
        } else {
            return Ok(tick);
        }
    }
}

/// Tick index holding `sqrt_price_new`, starting the search from the
/// log-approximated distance to `sqrt_price_old`.
pub fn calc_new_cur_tick_index(
    cur_tick_index: &Int,
    sqrt_price_old: &X80n,
    sqrt_price_new: &X80n,
) -> Result<Int, Error> {
    let delta = floor_log_half_bps(sqrt_price_new.raw(), sqrt_price_old.raw())?;
    let estimate = cur_tick_index + &delta;

    Ok(fix_cur_tick_index(&estimate, sqrt_price_new)?)
}
