use crate::error::{Error, SwapError};
use crate::math::math_helpers::check_unsigned_sub;
use crate::math::swap_math::{SwapStepResult, compute_swap_step};
use crate::pool::swap::{
    SwapResult, consumed_amount, cross_tick, is_on_swap_path, step_target_sqrt_price,
};
use crate::pool::types::{PoolState, TickData};
use alloy_primitives::U256;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Granularity of an amount ladder, in percent of the full amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SplitUnit {
    One = 1,
    Two = 2,
    Five = 5,
    Ten = 10,
    Twenty = 20,
    TwentyFive = 25,
    Fifty = 50,
    Hundred = 100,
}

impl SplitUnit {
    #[inline]
    pub fn percent(self) -> u32 {
        self as u32
    }

    /// Rungs in a ladder from 0 % to 100 % inclusive.
    #[inline]
    pub fn ladder_len(self) -> usize {
        (100 / self.percent()) as usize + 1
    }
}

/// `[0, unit, 2 * unit, ..., 100]`.
pub fn create_split_array(unit: SplitUnit) -> Vec<u32> {
    (0..=100).step_by(unit.percent() as usize).collect()
}

/// `amount * pct / 100` (floored) for every percentage of the ladder.
pub fn create_split_amount_array(amount: U256, unit: SplitUnit) -> Vec<U256> {
    create_split_array(unit)
        .into_iter()
        .map(|pct| amount * U256::from(pct) / U256::from(100u8))
        .collect()
}

/// Per-rung results of a split swap, one entry per ladder amount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SplitSwapResult {
    /// Input paid, fee included.
    pub amount_in_array: Vec<U256>,
    pub amount_out_array: Vec<U256>,
    pub fee_amount_array: Vec<U256>,
    pub next_sqrt_price_array: Vec<U256>,
    pub cross_tick_num_array: Vec<u32>,
    pub is_exceed: Vec<bool>,
}

impl SplitSwapResult {
    fn with_capacity(n: usize) -> Self {
        Self {
            amount_in_array: Vec::with_capacity(n),
            amount_out_array: Vec::with_capacity(n),
            fee_amount_array: Vec::with_capacity(n),
            next_sqrt_price_array: Vec::with_capacity(n),
            cross_tick_num_array: Vec::with_capacity(n),
            is_exceed: Vec::with_capacity(n),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.amount_in_array.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.amount_in_array.is_empty()
    }

    /// The result for rung `i`, shaped like a standalone swap.
    pub fn rung(&self, i: usize) -> Option<SwapResult> {
        Some(SwapResult {
            amount_in: *self.amount_in_array.get(i)?,
            amount_out: *self.amount_out_array.get(i)?,
            fee_amount: *self.fee_amount_array.get(i)?,
            ref_amount: U256::ZERO,
            next_sqrt_price: *self.next_sqrt_price_array.get(i)?,
            cross_tick_num: *self.cross_tick_num_array.get(i)?,
            is_exceed: *self.is_exceed.get(i)?,
        })
    }

    fn push(&mut self, totals: RungTotals, sqrt_price: U256, nominal: U256, by_amount_in: bool) {
        let is_exceed = if by_amount_in {
            totals.amount_in < nominal
        } else {
            totals.amount_out < nominal
        };
        self.amount_in_array.push(totals.amount_in);
        self.amount_out_array.push(totals.amount_out);
        self.fee_amount_array.push(totals.fee_amount);
        self.next_sqrt_price_array.push(sqrt_price);
        self.cross_tick_num_array.push(totals.cross_tick_num);
        self.is_exceed.push(is_exceed);
    }
}

/// Running totals of one rung. Rungs share one record until the lead
/// rung fills; the finished rung then gets its own copy.
#[derive(Debug, Clone, Copy, Default)]
struct RungTotals {
    // fee included
    amount_in: U256,
    amount_out: U256,
    fee_amount: U256,
    cross_tick_num: u32,
}

impl RungTotals {
    #[inline]
    fn apply(&mut self, step: &SwapStepResult) {
        self.amount_in += step.amount_in + step.fee_amount;
        self.amount_out += step.amount_out;
        self.fee_amount += step.fee_amount;
    }
}

/// Simulates a whole ladder of amounts against one pool in a single
/// walk over its ticks.
///
/// Every rung follows the same price path until the smallest unfilled
/// rung (the lead) fills inside a segment. That rung is finalized, the
/// segment is replayed from its start for the next rung with the
/// remaining amount grown by the difference between the two rungs, and
/// the walk continues. Each rung ends up bit-identical to running
/// [`compute_swap`](crate::pool::compute_swap) with its amount.
#[derive(Debug, Clone, Copy)]
pub struct SplitSwap<'a> {
    pool: &'a PoolState,
    swap_ticks: &'a [TickData],
    a2b: bool,
    by_amount_in: bool,
}

impl<'a> SplitSwap<'a> {
    /// `swap_ticks` follow the same ordering contract as
    /// [`compute_swap`](crate::pool::compute_swap).
    pub fn new(
        pool: &'a PoolState,
        swap_ticks: &'a [TickData],
        a2b: bool,
        by_amount_in: bool,
    ) -> Self {
        Self {
            pool,
            swap_ticks,
            a2b,
            by_amount_in,
        }
    }

    pub fn compute(&self, amounts: &[U256]) -> Result<SplitSwapResult, Error> {
        validate_ladder(amounts)?;

        let rungs = amounts.len();
        let mut results = SplitSwapResult::with_capacity(rungs);
        let mut shared = RungTotals::default();
        let mut lead = 0;
        let mut amount_remaining = amounts[0];
        let mut sqrt_price = self.pool.current_sqrt_price;
        let mut liquidity = self.pool.liquidity;

        'ticks: for tick in self.swap_ticks {
            if !is_on_swap_path(tick.index, self.pool.current_tick_index, self.a2b) {
                continue;
            }
            let target = step_target_sqrt_price(tick.sqrt_price, self.a2b);

            loop {
                if lead >= rungs {
                    break 'ticks;
                }

                let step = compute_swap_step(
                    sqrt_price,
                    target,
                    liquidity,
                    amount_remaining,
                    self.pool.fee_rate,
                    self.by_amount_in,
                )?;
                let rest =
                    check_unsigned_sub(amount_remaining, consumed_amount(&step, self.by_amount_in))?;
                let crossed = step.next_sqrt_price == tick.sqrt_price;

                if rest.is_zero() {
                    let mut record = shared;
                    record.apply(&step);
                    let end_price = if crossed {
                        record.cross_tick_num += 1;
                        tick.sqrt_price
                    } else {
                        step.next_sqrt_price
                    };
                    trace!(rung = lead, tick = tick.index, "split rung filled");
                    results.push(record, end_price, amounts[lead], self.by_amount_in);

                    lead += 1;
                    if lead < rungs {
                        // replay this segment for the next rung
                        amount_remaining += amounts[lead] - amounts[lead - 1];
                    }
                    continue;
                }

                shared.apply(&step);
                amount_remaining = rest;

                if crossed {
                    liquidity = cross_tick(liquidity, tick.liquidity_net, self.a2b)?;
                    sqrt_price = tick.sqrt_price;
                    shared.cross_tick_num += 1;
                    break;
                }
                sqrt_price = step.next_sqrt_price;
                break 'ticks;
            }
        }

        // rungs still open when the ticks ran out share the final totals
        for &nominal in &amounts[lead..] {
            results.push(shared, sqrt_price, nominal, self.by_amount_in);
        }

        debug!(
            a2b = self.a2b,
            by_amount_in = self.by_amount_in,
            rungs,
            filled = lead,
            "computed split swap"
        );

        Ok(results)
    }
}

/// Convenience wrapper around [`SplitSwap::compute`].
pub fn compute_split_swap(
    pool: &PoolState,
    swap_ticks: &[TickData],
    a2b: bool,
    by_amount_in: bool,
    amounts: &[U256],
) -> Result<SplitSwapResult, Error> {
    SplitSwap::new(pool, swap_ticks, a2b, by_amount_in).compute(amounts)
}

fn validate_ladder(amounts: &[U256]) -> Result<(), SwapError> {
    if amounts.is_empty() {
        return Err(SwapError::EmptyAmountLadder);
    }
    if let Some(i) = amounts.windows(2).position(|w| w[0] > w[1]) {
        return Err(SwapError::AmountLadderNotSorted(i + 1));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::swap::tests::{make_basic_pool, make_basic_ticks};
    use crate::pool::swap::{compute_swap, order_swap_ticks};
    use proptest::prelude::*;

    fn ladder(amount: u64, unit: SplitUnit) -> Vec<U256> {
        create_split_amount_array(U256::from(amount), unit)
    }

    fn assert_matches_single_swaps(a2b: bool, by_amount_in: bool, amounts: &[U256]) {
        let pool = make_basic_pool();
        let ticks = order_swap_ticks(&make_basic_ticks(), pool.current_tick_index, a2b);
        let split = compute_split_swap(&pool, &ticks, a2b, by_amount_in, amounts).unwrap();

        assert_eq!(split.len(), amounts.len());
        for (i, amount) in amounts.iter().enumerate() {
            let single = compute_swap(&pool, &ticks, a2b, by_amount_in, *amount).unwrap();
            assert_eq!(split.rung(i), Some(single), "rung {i} ({amount})");
        }
    }

    #[test]
    fn split_arrays() {
        let five = create_split_array(SplitUnit::Five);
        assert_eq!(five.len(), 21);
        assert_eq!(five.first(), Some(&0));
        assert_eq!(five[1], 5);
        assert_eq!(five.last(), Some(&100));

        assert_eq!(create_split_array(SplitUnit::Hundred), vec![0, 100]);
        assert_eq!(create_split_array(SplitUnit::TwentyFive), vec![0, 25, 50, 75, 100]);
        assert_eq!(SplitUnit::One.ladder_len(), 101);

        assert_eq!(
            ladder(999, SplitUnit::TwentyFive),
            vec![
                U256::ZERO,
                U256::from(249u64),
                U256::from(499u64),
                U256::from(749u64),
                U256::from(999u64)
            ]
        );
    }

    #[test]
    fn split_swap_known_rungs() {
        let pool = make_basic_pool();
        let ticks = order_swap_ticks(&make_basic_ticks(), pool.current_tick_index, true);
        let amounts = ladder(20_000_000_000, SplitUnit::Five);
        let split = SplitSwap::new(&pool, &ticks, true, true).compute(&amounts).unwrap();

        assert_eq!(split.amount_in_array[0], U256::ZERO);
        assert!(!split.is_exceed[0]);

        assert_eq!(split.amount_in_array[1], U256::from(1_000_000_000u64));
        assert_eq!(split.amount_out_array[1], U256::from(996_837_103u64));
        assert_eq!(split.fee_amount_array[1], U256::from(2_500_000u64));
        assert_eq!(split.next_sqrt_price_array[1], U256::from(18434485141090726284u128));

        assert_eq!(split.amount_out_array[4], U256::from(3_979_414_756u64));
        assert_eq!(split.next_sqrt_price_array[4], U256::from(18397805909988980927u128));

        assert_eq!(split.amount_out_array[7], U256::from(6_948_130_202u64));
        assert_eq!(split.fee_amount_array[7], U256::from(17_500_001u64));
        assert_eq!(split.cross_tick_num_array[7], 1);
        assert!(!split.is_exceed[7]);

        // from 8_000_000_000 up the pool runs dry
        for i in 8..21 {
            assert!(split.is_exceed[i], "rung {i}");
            assert_eq!(split.amount_in_array[i], U256::from(7_538_758_199u64));
            assert_eq!(split.amount_out_array[i], U256::from(7_479_415_237u64));
            assert_eq!(split.fee_amount_array[i], U256::from(18_846_897u64));
            assert_eq!(
                split.next_sqrt_price_array[i],
                U256::from(18336400488125385349u128)
            );
        }
    }

    #[test]
    fn ladder_consistency_with_single_swaps() {
        for a2b in [true, false] {
            for by_amount_in in [true, false] {
                assert_matches_single_swaps(a2b, by_amount_in, &ladder(20_000_000_000, SplitUnit::Five));
                assert_matches_single_swaps(a2b, by_amount_in, &ladder(5_000_000_000, SplitUnit::One));
            }
        }
    }

    #[test]
    fn repeated_amounts_are_allowed() {
        let amounts = vec![U256::from(5u64), U256::from(5u64), U256::from(3_000_000_000u64)];
        assert_matches_single_swaps(true, true, &amounts);
    }

    #[test]
    fn rung_past_the_end_is_none() {
        let pool = make_basic_pool();
        let split = compute_split_swap(&pool, &[], true, true, &[U256::ONE]).unwrap();
        assert!(split.rung(1).is_none());
        assert!(split.is_exceed[0]);
        assert_eq!(split.next_sqrt_price_array[0], pool.current_sqrt_price);
    }

    #[test]
    fn rejects_invalid_ladders() {
        let pool = make_basic_pool();
        let ticks = make_basic_ticks();

        let res = compute_split_swap(&pool, &ticks, true, true, &[]);
        assert!(matches!(
            res,
            Err(Error::SwapError(SwapError::EmptyAmountLadder))
        ));

        let res = compute_split_swap(
            &pool,
            &ticks,
            true,
            true,
            &[U256::ZERO, U256::from(10u64), U256::from(9u64)],
        );
        assert!(matches!(
            res,
            Err(Error::SwapError(SwapError::AmountLadderNotSorted(2)))
        ));
    }

    proptest! {
        #[test]
        fn random_ladders_match_single_swaps(
            mut raw in prop::collection::vec(0u64..12_000_000_000, 1..12),
            a2b in any::<bool>(),
            by_amount_in in any::<bool>(),
        ) {
            raw.sort_unstable();
            let amounts: Vec<U256> = raw.into_iter().map(U256::from).collect();

            let pool = make_basic_pool();
            let ticks = order_swap_ticks(&make_basic_ticks(), pool.current_tick_index, a2b);
            let split = compute_split_swap(&pool, &ticks, a2b, by_amount_in, &amounts).unwrap();
            for (i, amount) in amounts.iter().enumerate() {
                let single = compute_swap(&pool, &ticks, a2b, by_amount_in, *amount).unwrap();
                prop_assert_eq!(split.rung(i), Some(single));
            }
        }
    }
}
