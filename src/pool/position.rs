use crate::X128_RESOLUTION;
use crate::error::{Error, NumberError};
use crate::math::oracle::{Observation, tick_accumulators_inside};
use crate::num::{Int, Nat};
use crate::pool::state::{BalanceIntX128, BalanceNat, PositionState, Storage};

impl PositionState {
    /// Fees earned since the position was last touched, given the current
    /// fee growth inside its range.
    ///
    /// Each token pays `floor((inside - last) * liquidity / 2^128)`. A
    /// negative growth difference is rejected with
    /// [`NumberError::InvalidNat`].
    pub fn uncollected_fees(&self, fee_growth_inside: &BalanceIntX128) -> Result<BalanceNat, NumberError> {
        let owed = |inside: &Int, last: &Int| -> Result<Nat, NumberError> {
            let growth = Nat::try_from(inside - last)?;
            Ok((&growth * &self.liquidity).shr_bits(X128_RESOLUTION))
        };

        Ok(BalanceNat::new(
            owed(fee_growth_inside.x.raw(), self.fee_growth_inside_last.x.raw())?,
            owed(fee_growth_inside.y.raw(), self.fee_growth_inside_last.y.raw())?,
        ))
    }
}

/// Fees position `position_id` could collect right now.
pub fn collectable_fees(
    storage: &Storage,
    position_id: &Nat,
    observation: &Observation,
) -> Result<BalanceNat, Error> {
    let position = storage.position(position_id)?;
    let inside = tick_accumulators_inside(
        storage,
        &position.lower_tick_index,
        &position.upper_tick_index,
        observation,
    )?;

    Ok(position.uncollected_fees(&inside.fee_growth)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{FastMap, TickMap};
    use crate::math::shift::two_pow;
    use crate::num::{X80n, X128, X128n};
    use crate::pool::state::{
        Constants, PerToken, TickState, TimedCumulatives, TimedCumulativesBuffer,
    };

    fn x128(value: Int) -> X128 {
        X128::new(value)
    }

    fn position(liquidity: u64, last_x: i64, last_y: i64) -> PositionState {
        let one = two_pow(X128_RESOLUTION).to_int();
        PositionState {
            owner: "tz1burnburnburnburnburnburnburjAYjjX".to_string(),
            lower_tick_index: Int::from(-10),
            upper_tick_index: Int::from(10),
            liquidity: Nat::from(liquidity),
            fee_growth_inside_last: PerToken::new(
                x128(&one * &Int::from(last_x)),
                x128(&one * &Int::from(last_y)),
            ),
        }
    }

    #[test]
    fn fees_scale_with_liquidity() {
        let one = two_pow(X128_RESOLUTION).to_int();
        let inside = PerToken::new(
            x128(&one * &Int::from(3)),
            x128(&one * &Int::from(2) + Int::one()),
        );

        let fees = position(1_000, 1, -1).uncollected_fees(&inside).unwrap();

        assert_eq!(fees, BalanceNat::new(Nat::from(2_000u32), Nat::from(3_000u32)));
    }

    #[test]
    fn fractional_fees_round_down() {
        let half = two_pow(X128_RESOLUTION - 1).to_int();
        let inside = PerToken::new(x128(half.clone()), x128(half));

        let fees = position(3, 0, 0).uncollected_fees(&inside).unwrap();

        assert_eq!(fees, BalanceNat::new(Nat::one(), Nat::one()));
    }

    #[test]
    fn shrinking_fee_growth_is_rejected() {
        let inside = PerToken::new(x128(Int::zero()), x128(Int::zero()));
        let res = position(1, 1, 0).uncollected_fees(&inside);

        assert!(matches!(res, Err(NumberError::InvalidNat(_))));
    }

    #[test]
    fn collectable_fees_read_the_position_range() {
        let one = two_pow(X128_RESOLUTION);
        let mut ticks = TickMap::default();
        for index in [-10i64, 10] {
            ticks.insert(
                Int::from(index),
                TickState::new(Int::zero(), Int::zero(), Int::zero(), X80n::default()),
            );
        }
        let mut positions = FastMap::default();
        positions.insert(Nat::zero(), position(500, 0, 0));

        let storage = Storage {
            liquidity: Nat::from(500u32),
            sqrt_price: X80n::default(),
            cur_tick_index: Int::zero(),
            cur_tick_witness: Int::from(-10),
            fee_growth: PerToken::new(
                X128n::new(&one * &Nat::from(4u32)),
                X128n::new(Nat::zero()),
            ),
            ticks,
            positions,
            cumulatives_buffer: TimedCumulativesBuffer::single(TimedCumulatives::new(Nat::zero())),
            constants: Constants::default(),
            new_position_id: Nat::one(),
        };

        let fees = collectable_fees(&storage, &Nat::zero(), &Observation::default()).unwrap();
        assert_eq!(fees, BalanceNat::new(Nat::from(2_000u32), Nat::zero()));

        let err = collectable_fees(&storage, &Nat::one(), &Observation::default()).unwrap_err();
        assert_eq!(
            err,
            Error::StateError(crate::error::StateError::MissingPosition(Nat::one()))
        );
    }
}
