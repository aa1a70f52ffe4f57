#![allow(dead_code)]

use std::hint::black_box;

use clmmpool_math::{
    math::{bit_math, liquidity_math, math_helpers, sqrt_price_math, swap_math, tick_math},
    pool::{compute_split_swap, compute_swap, create_split_amount_array, order_swap_ticks, SplitUnit},
    router::{find_best_split_steps, SplitPath},
    PoolState, RouterConfig, TickData, B256, Q64, U256,
};
use criterion::{BenchmarkId, Criterion};

const POSITIONS: i32 = 100;
const TICK_SPACING: i32 = 60;
const POSITION_LIQUIDITY: u128 = 100_000_000_000;

/// Pool at tick 0 with `POSITIONS` nested ranges `[-k * 60, k * 60]`.
pub fn deep_pool(fee_rate: u32) -> (PoolState, Vec<TickData>) {
    let liquidity = POSITION_LIQUIDITY * POSITIONS as u128;
    let pool = PoolState::new(liquidity, Q64, 0, fee_rate);

    let net = POSITION_LIQUIDITY as i128;
    let mut ticks = Vec::with_capacity(2 * POSITIONS as usize);
    for k in (1..=POSITIONS).rev() {
        ticks.push(TickData::new(-k * TICK_SPACING, net, POSITION_LIQUIDITY).unwrap());
    }
    for k in 1..=POSITIONS {
        ticks.push(TickData::new(k * TICK_SPACING, -net, POSITION_LIQUIDITY).unwrap());
    }
    (pool, ticks)
}

pub fn bench_tick_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_math");

    for tick in [-443_636, -60, 0, 60, 443_636] {
        group.bench_with_input(BenchmarkId::new("tick_to_sqrt_price", tick), &tick, |b, &t| {
            b.iter(|| tick_math::tick_index_to_sqrt_price_x64(black_box(t)).unwrap())
        });
    }

    for tick in [-200_000, 0, 200_000] {
        let sqrt_price = tick_math::tick_index_to_sqrt_price_x64(tick).unwrap();
        group.bench_with_input(
            BenchmarkId::new("sqrt_price_to_tick", tick),
            &sqrt_price,
            |b, &p| b.iter(|| tick_math::sqrt_price_x64_to_tick_index(black_box(p)).unwrap()),
        );
    }

    group.finish();
}

pub fn bench_sqrt_price_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("sqrt_price_math");
    let upper = tick_math::tick_index_to_sqrt_price_x64(60).unwrap();
    let liquidity = 1_500_000_000_000u128;

    group.bench_function("get_delta_a", |b| {
        b.iter(|| sqrt_price_math::get_delta_a(black_box(Q64), black_box(upper), liquidity, true))
    });
    group.bench_function("get_delta_b", |b| {
        b.iter(|| sqrt_price_math::get_delta_b(black_box(Q64), black_box(upper), liquidity, true))
    });
    group.bench_function("next_sqrt_price_from_input", |b| {
        b.iter(|| {
            sqrt_price_math::get_next_sqrt_price_from_input(
                black_box(Q64),
                liquidity,
                black_box(U256::from(1_000_000u64)),
                true,
            )
        })
    });

    group.finish();
}

pub fn bench_swap_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap_math");
    let target = tick_math::tick_index_to_sqrt_price_x64(-60).unwrap();
    let liquidity = 1_500_000_000_000u128;

    for (name, by_amount_in) in [("exact_in", true), ("exact_out", false)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                swap_math::compute_swap_step(
                    black_box(Q64),
                    black_box(target),
                    liquidity,
                    black_box(U256::from(1_000_000_000u64)),
                    2500,
                    by_amount_in,
                )
            })
        });
    }

    group.finish();
}

pub fn bench_math_helpers(c: &mut Criterion) {
    let mut group = c.benchmark_group("math_helpers");
    let a = U256::from(u128::MAX);
    let b = Q64 + U256::from(12345u64);
    let d = U256::from(1_000_000_007u64);

    group.bench_function("mul_div", |bench| {
        bench.iter(|| math_helpers::mul_div(black_box(a), black_box(b), black_box(d)))
    });
    group.bench_function("mul_div_rounding_up", |bench| {
        bench.iter(|| math_helpers::mul_div_rounding_up(black_box(a), black_box(b), black_box(d)))
    });

    group.finish();
}

pub fn bench_bit_math(c: &mut Criterion) {
    c.bench_function("most_significant_bit", |b| {
        b.iter(|| bit_math::most_significant_bit(black_box(Q64 + U256::from(1u8))))
    });
}

pub fn bench_liquidity_math(c: &mut Criterion) {
    let lower = tick_math::tick_index_to_sqrt_price_x64(-600).unwrap();
    let upper = tick_math::tick_index_to_sqrt_price_x64(600).unwrap();

    c.bench_function("coin_amount_from_liquidity", |b| {
        b.iter(|| {
            liquidity_math::get_coin_amount_from_liquidity(
                black_box(1_000_000_000_000),
                black_box(Q64),
                lower,
                upper,
                true,
            )
        })
    });
}

pub fn bench_compute_swap(c: &mut Criterion) {
    let (pool, ticks) = deep_pool(2500);
    let swap_ticks = order_swap_ticks(&ticks, pool.current_tick_index, true);
    let mut group = c.benchmark_group("compute_swap");

    for amount in [1_000_000u64, 50_000_000_000, 500_000_000_000] {
        group.bench_with_input(BenchmarkId::from_parameter(amount), &amount, |b, &amount| {
            b.iter(|| compute_swap(&pool, &swap_ticks, true, true, black_box(U256::from(amount))))
        });
    }

    group.finish();
}

pub fn bench_split_swap(c: &mut Criterion) {
    let (pool, ticks) = deep_pool(2500);
    let swap_ticks = order_swap_ticks(&ticks, pool.current_tick_index, true);
    let amount = U256::from(500_000_000_000u64);
    let mut group = c.benchmark_group("split_swap");

    for unit in [SplitUnit::Ten, SplitUnit::Five, SplitUnit::One] {
        let amounts = create_split_amount_array(amount, unit);
        group.bench_with_input(
            BenchmarkId::new("single_pass", unit.percent()),
            &amounts,
            |b, amounts| b.iter(|| compute_split_swap(&pool, &swap_ticks, true, true, black_box(amounts))),
        );
        group.bench_with_input(
            BenchmarkId::new("one_swap_per_rung", unit.percent()),
            &amounts,
            |b, amounts| {
                b.iter(|| {
                    amounts
                        .iter()
                        .map(|&a| compute_swap(&pool, &swap_ticks, true, true, black_box(a)))
                        .collect::<Vec<_>>()
                })
            },
        );
    }

    group.finish();
}

pub fn bench_router(c: &mut Criterion) {
    let amount = U256::from(500_000_000_000u64);
    let config = RouterConfig::default();
    let paths: Vec<SplitPath> = [500u32, 2500, 3000, 10_000]
        .iter()
        .enumerate()
        .map(|(i, &fee_rate)| {
            let (pool, ticks) = deep_pool(fee_rate);
            let swap_ticks = order_swap_ticks(&ticks, pool.current_tick_index, true);
            SplitPath::simulate(
                B256::with_last_byte(i as u8),
                &pool,
                &swap_ticks,
                true,
                true,
                amount,
                config.split_unit,
            )
            .unwrap()
        })
        .collect();

    let mut group = c.benchmark_group("router");
    for count in 1..=paths.len() {
        group.bench_with_input(BenchmarkId::new("paths", count), &count, |b, &count| {
            b.iter(|| find_best_split_steps(black_box(&paths[..count]), true, &config))
        });
    }
    group.finish();
}
