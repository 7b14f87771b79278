#![allow(dead_code)]

use std::hint::black_box;

use cfmm_swap_math::math::liquidity_math::{
    calc_new_price_x, calc_new_price_y, liquidity_delta_to_tokens_delta,
};
use cfmm_swap_math::math::tick_math::{
    MAX_TICK, MIN_TICK, calc_new_cur_tick_index, sqrt_price_for_tick,
};
use cfmm_swap_math::pool::state::{Constants, TickState, TimedCumulatives};
use cfmm_swap_math::{Int, Nat, SwapStorage, TickMap, X80n};
use criterion::{BenchmarkId, Criterion};

fn sp(tick: i64) -> X80n {
    sqrt_price_for_tick(&Int::from(tick)).unwrap()
}

/// A pool with `n` nested positions of equal liquidity, spaced every
/// `spacing` ticks around tick 0.
pub fn nested_pool(n: i64, spacing: i64, liquidity: u64) -> SwapStorage {
    let mut ticks = TickMap::default();
    let mut boundaries = vec![MIN_TICK];
    boundaries.extend((1..=n).rev().map(|k| -k * spacing));
    boundaries.extend((1..=n).map(|k| k * spacing));
    boundaries.push(MAX_TICK);

    for (i, &index) in boundaries.iter().enumerate() {
        let prev = if i == 0 { MIN_TICK - 1 } else { boundaries[i - 1] };
        let next = boundaries.get(i + 1).copied().unwrap_or(MAX_TICK + 1);
        let liquidity_net = match index {
            MIN_TICK | MAX_TICK => 0,
            t if t < 0 => liquidity as i64,
            _ => -(liquidity as i64),
        };
        ticks.insert(
            Int::from(index),
            TickState::new(Int::from(prev), Int::from(next), Int::from(liquidity_net), sp(index)),
        );
    }

    SwapStorage {
        liquidity: Nat::from(liquidity) * Nat::from(n as u64),
        sqrt_price: sp(0),
        cur_tick_index: Int::zero(),
        cur_tick_witness: Int::from(-spacing),
        ticks,
        constants: Constants {
            fee_bps: Nat::from(30u32),
            ctez_burn_fee_bps: Nat::zero(),
            tick_spacing: Nat::one(),
        },
        last_cumulative: TimedCumulatives::new(Nat::zero()),
    }
}

pub fn bench_tick_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_math");

    for tick in [1i64, 1_000, 100_000, MAX_TICK] {
        let tick = Int::from(tick);
        group.bench_with_input(BenchmarkId::new("sqrt_price_for_tick", &tick), &tick, |b, t| {
            b.iter(|| sqrt_price_for_tick(black_box(t)).unwrap())
        });
    }

    let old = sp(0);
    let new = X80n::new(sp(-37).0 + Nat::from(12_345u32));
    group.bench_function("calc_new_cur_tick_index", |b| {
        b.iter(|| calc_new_cur_tick_index(black_box(&Int::zero()), &old, black_box(&new)).unwrap())
    });

    group.finish();
}

pub fn bench_liquidity_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("liquidity_math");
    let sqrt_price = sp(0);
    let liquidity = Nat::from(1_000_000_000_000u64);
    let amount = Nat::from(1_000_000u64);

    group.bench_function("calc_new_price_x", |b| {
        b.iter(|| calc_new_price_x(&sqrt_price, &liquidity, black_box(&amount)).unwrap())
    });
    group.bench_function("calc_new_price_y", |b| {
        b.iter(|| calc_new_price_y(&sqrt_price, &liquidity, black_box(&amount)).unwrap())
    });
    group.bench_function("liquidity_delta_to_tokens_delta", |b| {
        b.iter(|| {
            liquidity_delta_to_tokens_delta(
                black_box(&liquidity.to_int()),
                &Int::from(-600),
                &Int::from(600),
                &Int::zero(),
                &sqrt_price,
            )
            .unwrap()
        })
    });

    group.finish();
}

pub fn bench_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap");
    let storage = nested_pool(20, 100, 1_000_000_000);

    for amount in [1_000u64, 1_000_000, 50_000_000, 1_000_000_000] {
        let amount = Nat::from(amount);
        group.bench_with_input(BenchmarkId::new("x_to_y", &amount), &amount, |b, dx| {
            b.iter(|| storage.calculate_x_to_y(black_box(dx)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("y_to_x", &amount), &amount, |b, dy| {
            b.iter(|| storage.calculate_y_to_x(black_box(dy)).unwrap())
        });
    }

    group.finish();
}
