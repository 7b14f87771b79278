use tracing::{debug, trace};

use crate::error::{Error, StateError};
use crate::math::liquidity_math::{
    add_delta, calc_new_price_x, calc_new_price_y, calc_received_x, calc_received_y, calc_swap_fee,
};
use crate::math::shift::{shift_left, shift_right};
use crate::math::tick_math::calc_new_cur_tick_index;
use crate::num::{Int, Nat, X80n};
use crate::pool::state::{SwapStorage, TickState};
use crate::{HUNDRED_PERCENT_BPS, X80_RESOLUTION};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapResult {
    /// Tokens paid out to the trader.
    pub output: Nat,
    /// Input left over once the pool ran out of liquidity.
    pub input_left: Nat,
    pub new_storage_part: SwapStorage,
}

// the running state of a swap, returned as the result once the loop ends
struct SwapState {
    // storage as the next step sees it
    storage: SwapStorage,
    // the amount of input not consumed yet
    input_left: Nat,
    // the amount of output paid so far
    output: Nat,
}

impl SwapState {
    fn new(storage: &SwapStorage, input: &Nat) -> Self {
        Self {
            storage: storage.clone(),
            input_left: input.clone(),
            output: Nat::zero(),
        }
    }

    fn into_result(self) -> SwapResult {
        SwapResult {
            output: self.output,
            input_left: self.input_left,
            new_storage_part: self.storage,
        }
    }
}

impl SwapStorage {
    /// Simulates selling `dx` of token X for token Y.
    ///
    /// The price moves down, crossing initialized ticks through `prev` links
    /// until the input is spent or no liquidity is left. `self` is not
    /// modified.
    pub fn calculate_x_to_y(&self, dx: &Nat) -> Result<SwapResult, Error> {
        let mut state = SwapState::new(self, dx);
        trace!(%dx, liquidity = %self.liquidity, sqrt_price = %self.sqrt_price, "X->Y swap");

        while !state.storage.liquidity.is_zero() {
            let s = &mut state.storage;

            let fee = calc_swap_fee(&s.constants.fee_bps, &state.input_left);
            let dx_minus_fee = state.input_left.checked_sub(&fee)?;
            let sqrt_price_new = calc_new_price_x(&s.sqrt_price, &s.liquidity, &dx_minus_fee)?;
            let cur_tick_index_new =
                calc_new_cur_tick_index(&s.cur_tick_index, &s.sqrt_price, &sqrt_price_new)?;

            if cur_tick_index_new >= s.cur_tick_witness {
                let dy = Nat::try_from(calc_received_y(&s.sqrt_price, &sqrt_price_new, &s.liquidity))?;
                trace!(%dy, cur_tick_index = %cur_tick_index_new, "X->Y final step");

                s.sqrt_price = sqrt_price_new;
                s.cur_tick_index = cur_tick_index_new;
                state.output = &state.output + &dy;
                state.input_left = Nat::zero();
                break;
            }

            // stop one unit short of the witness price, then cross it
            let witness = s.cur_tick_witness.clone();
            let tick = s.cross_tick(&witness)?;
            let sqrt_price_new = X80n::new(tick.sqrt_price.raw().checked_sub(&Nat::one())?);

            let dy = Nat::try_from(calc_received_y(&s.sqrt_price, &sqrt_price_new, &s.liquidity))?;
            let dx_for_dy = shift_left(&dy, 2 * X80_RESOLUTION)
                .div_ceil(&(s.sqrt_price.raw() * sqrt_price_new.raw()))?;
            let dx_consumed = gross_input(&dx_for_dy, &s.constants.fee_bps)?;
            trace!(tick = %witness, %dy, %dx_consumed, "X->Y crossed tick");

            s.cur_tick_witness = tick.prev;
            s.sqrt_price = sqrt_price_new;
            s.cur_tick_index = cur_tick_index_new - Int::one();
            s.liquidity = add_delta(&s.liquidity, &-&tick.liquidity_net)?;
            state.input_left = state.input_left.checked_sub(&dx_consumed)?;
            state.output = &state.output + &dy;
        }

        debug!(
            output = %state.output,
            input_left = %state.input_left,
            cur_tick_index = %state.storage.cur_tick_index,
            "X->Y swap done"
        );
        Ok(state.into_result())
    }

    /// Simulates selling `dy` of token Y for token X.
    ///
    /// Mirror image of [`SwapStorage::calculate_x_to_y`]: the price moves up
    /// and the tick crossed is the witness's `next`.
    pub fn calculate_y_to_x(&self, dy: &Nat) -> Result<SwapResult, Error> {
        let mut state = SwapState::new(self, dy);
        trace!(%dy, liquidity = %self.liquidity, sqrt_price = %self.sqrt_price, "Y->X swap");

        while !state.storage.liquidity.is_zero() {
            let s = &mut state.storage;

            let fee = calc_swap_fee(&s.constants.fee_bps, &state.input_left);
            let dy_minus_fee = state.input_left.checked_sub(&fee)?;
            let sqrt_price_new = calc_new_price_y(&s.sqrt_price, &s.liquidity, &dy_minus_fee)?;
            let cur_tick_index_new =
                calc_new_cur_tick_index(&s.cur_tick_index, &s.sqrt_price, &sqrt_price_new)?;
            let next_tick_index = s.tick(&s.cur_tick_witness)?.next.clone();

            if cur_tick_index_new < next_tick_index {
                let dx = Nat::try_from(calc_received_x(&s.sqrt_price, &sqrt_price_new, &s.liquidity)?)?;
                trace!(%dx, cur_tick_index = %cur_tick_index_new, "Y->X final step");

                s.sqrt_price = sqrt_price_new;
                s.cur_tick_index = cur_tick_index_new;
                state.output = &state.output + &dx;
                state.input_left = Nat::zero();
                break;
            }

            // move exactly onto the next tick's price and cross it
            let tick = s.cross_tick(&next_tick_index)?;
            let sqrt_price_new = tick.sqrt_price;

            let dx = Nat::try_from(calc_received_x(&s.sqrt_price, &sqrt_price_new, &s.liquidity)?)?;
            let price_step = sqrt_price_new.raw().checked_sub(s.sqrt_price.raw())?;
            let dy_for_dx = ceil_shift_right(&(&s.liquidity * &price_step), X80_RESOLUTION);
            let dy_consumed = gross_input(&dy_for_dx, &s.constants.fee_bps)?;
            trace!(tick = %next_tick_index, %dx, %dy_consumed, "Y->X crossed tick");

            s.sqrt_price = sqrt_price_new;
            s.cur_tick_witness = next_tick_index.clone();
            s.cur_tick_index = next_tick_index;
            s.liquidity = add_delta(&s.liquidity, &tick.liquidity_net)?;
            state.input_left = state.input_left.checked_sub(&dy_consumed)?;
            state.output = &state.output + &dx;
        }

        debug!(
            output = %state.output,
            input_left = %state.input_left,
            cur_tick_index = %state.storage.cur_tick_index,
            "Y->X swap done"
        );
        Ok(state.into_result())
    }

    /// Flips `tick_cumulative_outside` of the tick at `index` to its
    /// complement and returns the tick as it was before the flip.
    fn cross_tick(&mut self, index: &Int) -> Result<TickState, StateError> {
        let sum = &self.last_cumulative.tick.sum;
        let tick = self
            .ticks
            .get_mut(index)
            .ok_or_else(|| StateError::MissingTick(index.clone()))?;

        let crossed = tick.clone();
        tick.tick_cumulative_outside = sum - &crossed.tick_cumulative_outside;
        Ok(crossed)
    }
}

/// Input needed, fee included, for `net` to reach the pool:
/// `ceil(net * 10000 / (10000 - fee_bps))`.
fn gross_input(net: &Nat, fee_bps: &Nat) -> Result<Nat, Error> {
    let hundred_percent = Nat::from(HUNDRED_PERCENT_BPS);
    let kept_bps = hundred_percent.checked_sub(fee_bps)?;

    Ok((net * &hundred_percent).div_ceil(&kept_bps)?)
}

fn ceil_shift_right(value: &Nat, bits: usize) -> Nat {
    let floored = shift_right(value, bits);
    if shift_left(&floored, bits) == *value {
        floored
    } else {
        floored + Nat::one()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::hash::TickMap;
    use crate::math::tick_math::{MAX_TICK, MIN_TICK, sqrt_price_for_tick};
    use crate::pool::state::{Constants, TimedCumulatives};

    fn sp(tick: i64) -> X80n {
        sqrt_price_for_tick(&Int::from(tick)).unwrap()
    }

    fn nat(value: &str) -> Nat {
        value.parse().unwrap()
    }

    fn tick(prev: i64, next: i64, liquidity_net: i64, index: i64, tco: i64) -> TickState {
        let mut state = TickState::new(
            Int::from(prev),
            Int::from(next),
            Int::from(liquidity_net),
            sp(index),
        );
        state.tick_cumulative_outside = Int::from(tco);
        state
    }

    /// Two nested positions: `l1` over [-100, 100) and `l2` over [-50, 50),
    /// price at tick 0.
    fn pool(l1: i64, l2: i64, fee_bps: u32) -> SwapStorage {
        let mut ticks = TickMap::default();
        ticks.insert(Int::from(MIN_TICK), tick(MIN_TICK - 1, -100, 0, MIN_TICK, 0));
        ticks.insert(Int::from(-100), tick(MIN_TICK, -50, l1, -100, 300));
        ticks.insert(Int::from(-50), tick(-100, 50, l2, -50, -40));
        ticks.insert(Int::from(50), tick(-50, 100, -l2, 50, 25));
        ticks.insert(Int::from(100), tick(50, MAX_TICK, -l1, 100, 10));
        ticks.insert(Int::from(MAX_TICK), tick(100, MAX_TICK + 1, 0, MAX_TICK, 0));

        let mut last_cumulative = TimedCumulatives::new(Nat::from(1_700_000_000u64));
        last_cumulative.tick.sum = Int::from(1000);

        SwapStorage {
            liquidity: Nat::try_from(l1 + l2).unwrap(),
            sqrt_price: sp(0),
            cur_tick_index: Int::zero(),
            cur_tick_witness: Int::from(-50),
            ticks,
            constants: Constants {
                fee_bps: Nat::from(fee_bps),
                ctez_burn_fee_bps: Nat::zero(),
                tick_spacing: Nat::one(),
            },
            last_cumulative,
        }
    }

    fn standard_pool() -> SwapStorage {
        pool(1_000_000_000, 2_000_000_000, 30)
    }

    fn tco(storage: &SwapStorage, index: i64) -> Int {
        storage.tick(&Int::from(index)).unwrap().tick_cumulative_outside.clone()
    }

    #[rstest]
    #[case(1_000, 996, "1208925417848415309749488", -1)]
    #[case(1_000_000, 996_668, "1208524186743234839661128", -7)]
    #[case(3_000_000, 2_988_020, "1207721721058733617289738", -20)]
    fn x_to_y_within_one_segment(
        #[case] dx: u64,
        #[case] output: u64,
        #[case] sqrt_price: &str,
        #[case] cur_tick_index: i64,
    ) {
        let storage = standard_pool();
        let res = storage.calculate_x_to_y(&Nat::from(dx)).unwrap();
        let s = &res.new_storage_part;

        assert_eq!(res.output, Nat::from(output));
        assert!(res.input_left.is_zero());
        assert_eq!(s.liquidity, storage.liquidity);
        assert_eq!(s.sqrt_price.0, nat(sqrt_price));
        assert_eq!(s.cur_tick_index, Int::from(cur_tick_index));
        assert_eq!(s.cur_tick_witness, Int::from(-50));
        assert_eq!(s.ticks, storage.ticks);
    }

    #[rstest]
    #[case(1_000, 996, "1208926221380976559967939", 0)]
    #[case(1_000_000, 996_668, "1209327585962014436468571", 6)]
    #[case(3_000_000, 2_988_020, "1210131118656784959993359", 19)]
    fn y_to_x_within_one_segment(
        #[case] dy: u64,
        #[case] output: u64,
        #[case] sqrt_price: &str,
        #[case] cur_tick_index: i64,
    ) {
        let storage = standard_pool();
        let res = storage.calculate_y_to_x(&Nat::from(dy)).unwrap();
        let s = &res.new_storage_part;

        assert_eq!(res.output, Nat::from(output));
        assert!(res.input_left.is_zero());
        assert_eq!(s.liquidity, storage.liquidity);
        assert_eq!(s.sqrt_price.0, nat(sqrt_price));
        assert_eq!(s.cur_tick_index, Int::from(cur_tick_index));
        assert_eq!(s.cur_tick_witness, Int::from(-50));
        assert_eq!(s.ticks, storage.ticks);
    }

    #[test]
    fn x_to_y_crossing_one_tick() {
        let storage = standard_pool();
        let res = storage.calculate_x_to_y(&Nat::from(8_000_000u64)).unwrap();
        let s = &res.new_storage_part;

        assert_eq!(res.output, Nat::from(7_954_704u64));
        assert!(res.input_left.is_zero());
        // crossing -50 moving down removes its liquidity_net
        assert_eq!(s.liquidity, Nat::from(1_000_000_000u64));
        assert_eq!(s.sqrt_price.0, nat("1205346250295046378667123"));
        assert_eq!(s.cur_tick_index, Int::from(-60));
        assert_eq!(s.cur_tick_witness, Int::from(-100));
        assert_eq!(tco(s, -50), Int::from(1040));
        assert_eq!(tco(s, -100), Int::from(300));
    }

    #[test]
    fn y_to_x_crossing_one_tick() {
        let storage = standard_pool();
        let res = storage.calculate_y_to_x(&Nat::from(8_000_000u64)).unwrap();
        let s = &res.new_storage_part;

        assert_eq!(res.output, Nat::from(7_954_704u64));
        assert!(res.input_left.is_zero());
        // crossing 50 moving up adds its (negative) liquidity_net
        assert_eq!(s.liquidity, Nat::from(1_000_000_000u64));
        assert_eq!(s.sqrt_price.0, nat("1212516019337310302016814"));
        assert_eq!(s.cur_tick_index, Int::from(59));
        assert_eq!(s.cur_tick_witness, Int::from(50));
        assert_eq!(tco(s, 50), Int::from(975));
        assert_eq!(tco(s, 100), Int::from(10));
    }

    #[test]
    fn x_to_y_from_the_witness_price_crosses_it_first() {
        let storage = standard_pool();

        // exactly the input needed to reach tick 50
        let up = storage.calculate_y_to_x(&Nat::from(7_531_979u64)).unwrap();
        let s = &up.new_storage_part;
        assert_eq!(up.output, Nat::from(7_490_632u64));
        assert!(up.input_left.is_zero());
        assert_eq!(s.sqrt_price, sp(50));
        assert_eq!(s.cur_tick_index, Int::from(50));
        assert_eq!(s.cur_tick_witness, Int::from(50));
        assert_eq!(s.liquidity, Nat::from(1_000_000_000u64));
        assert_eq!(tco(s, 50), Int::from(975));

        // the first step crosses 50 for free and restores its liquidity
        let down = s.calculate_x_to_y(&Nat::from(1_000_000u64)).unwrap();
        let t = &down.new_storage_part;
        assert_eq!(down.output, Nat::from(1_001_663u64));
        assert!(down.input_left.is_zero());
        assert_eq!(t.liquidity, Nat::from(3_000_000_000u64));
        assert_eq!(t.sqrt_price.0, nat("1211548269478195306342672"));
        assert_eq!(t.cur_tick_index, Int::from(43));
        assert_eq!(t.cur_tick_witness, Int::from(-50));
        assert_eq!(t.ticks, storage.ticks);
    }

    #[rstest]
    #[case(40_000_000, 29_951_076, -687)]
    #[case(200_000_000, 189_951_076, -3554)]
    fn x_to_y_exhausts_liquidity(
        #[case] dx: u64,
        #[case] input_left: u64,
        #[case] cur_tick_index: i64,
    ) {
        let res = standard_pool().calculate_x_to_y(&Nat::from(dx)).unwrap();
        let s = &res.new_storage_part;

        assert_eq!(res.output, Nat::from(9_981_275u64));
        assert_eq!(res.input_left, Nat::from(input_left));
        assert!(s.liquidity.is_zero());
        assert_eq!(s.sqrt_price.0, nat("1202896276934797623385106"));
        assert_eq!(s.cur_tick_index, Int::from(cur_tick_index));
        assert_eq!(s.cur_tick_witness, Int::from(MIN_TICK));
        assert_eq!(tco(s, -50), Int::from(1040));
        assert_eq!(tco(s, -100), Int::from(700));
    }

    #[rstest]
    #[case(40_000_000, 29_951_076)]
    #[case(200_000_000, 189_951_076)]
    fn y_to_x_exhausts_liquidity(#[case] dy: u64, #[case] input_left: u64) {
        let res = standard_pool().calculate_y_to_x(&Nat::from(dy)).unwrap();
        let s = &res.new_storage_part;

        assert_eq!(res.output, Nat::from(9_981_275u64));
        assert_eq!(res.input_left, Nat::from(input_left));
        assert!(s.liquidity.is_zero());
        assert_eq!(s.sqrt_price, sp(100));
        assert_eq!(s.cur_tick_index, Int::from(100));
        assert_eq!(s.cur_tick_witness, Int::from(100));
        assert_eq!(tco(s, 50), Int::from(975));
        assert_eq!(tco(s, 100), Int::from(990));
    }

    #[test]
    fn zero_fee_pool_pays_more() {
        let storage = pool(1_000_000_000, 2_000_000_000, 0);

        let res = storage.calculate_x_to_y(&Nat::from(1_000_000u64)).unwrap();
        assert_eq!(res.output, Nat::from(999_666u64));
        assert_eq!(res.new_storage_part.sqrt_price.0, nat("1208522978621755256287413"));
        assert_eq!(res.new_storage_part.cur_tick_index, Int::from(-7));

        let res = storage.calculate_y_to_x(&Nat::from(1_000_000u64)).unwrap();
        assert_eq!(res.output, Nat::from(999_666u64));
        assert_eq!(res.new_storage_part.sqrt_price.0, nat("1209328794887834051097745"));
        assert_eq!(res.new_storage_part.cur_tick_index, Int::from(6));
    }

    #[test]
    fn zero_input_is_a_no_op() {
        let storage = standard_pool();

        for res in [
            storage.calculate_x_to_y(&Nat::zero()).unwrap(),
            storage.calculate_y_to_x(&Nat::zero()).unwrap(),
        ] {
            assert!(res.output.is_zero());
            assert!(res.input_left.is_zero());
            assert_eq!(res.new_storage_part, storage);
        }
    }

    #[test]
    fn empty_pool_returns_the_input() {
        let mut storage = standard_pool();
        storage.liquidity = Nat::zero();

        let res = storage.calculate_x_to_y(&Nat::from(500u32)).unwrap();
        assert!(res.output.is_zero());
        assert_eq!(res.input_left, Nat::from(500u32));
        assert_eq!(res.new_storage_part, storage);
    }

    #[test]
    fn too_big_price_change_propagates() {
        let storage = pool(1, 0, 30);
        let too_big = Error::SwapError(crate::error::SwapError::TooBigPriceChange);

        assert_eq!(storage.calculate_x_to_y(&Nat::from(1_000_000u64)).unwrap_err(), too_big);
        assert_eq!(storage.calculate_y_to_x(&Nat::from(1_000_000u64)).unwrap_err(), too_big);
    }

    #[test]
    fn missing_tick_is_reported() {
        let mut storage = standard_pool();
        storage.ticks.remove(&Int::from(-50));

        assert_eq!(
            storage.calculate_x_to_y(&Nat::from(8_000_000u64)).unwrap_err(),
            Error::StateError(StateError::MissingTick(Int::from(-50)))
        );
    }

    #[test]
    fn input_storage_is_not_modified() {
        let storage = standard_pool();
        let before = storage.clone();

        let _ = storage.calculate_x_to_y(&Nat::from(40_000_000u64)).unwrap();
        let _ = storage.calculate_y_to_x(&Nat::from(40_000_000u64)).unwrap();

        assert_eq!(storage, before);
    }

    #[test]
    fn ceil_shift_right_rounds_up_only_on_remainder() {
        assert_eq!(ceil_shift_right(&Nat::from(8u32), 2), Nat::from(2u32));
        assert_eq!(ceil_shift_right(&Nat::from(9u32), 2), Nat::from(3u32));
        assert!(ceil_shift_right(&Nat::zero(), 80).is_zero());
    }
}
