use crate::error::{Error, MathError};
use crate::math::liquidity_math::add_delta;
use crate::math::math_helpers::check_unsigned_sub;
use crate::math::swap_math::{SwapStepResult, compute_swap_step};
use crate::math::tick_math::{MAX_SQRT_PRICE, MIN_SQRT_PRICE, sqrt_price_x64_to_price};
use crate::pool::types::{PoolState, TickData};
use alloy_primitives::U256;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hard price bound a swap in the given direction may reach.
#[inline]
pub fn get_default_sqrt_price_limit(a2b: bool) -> U256 {
    if a2b { MIN_SQRT_PRICE } else { MAX_SQRT_PRICE }
}

/// Picks the ticks a swap in the given direction can cross and orders
/// them along the price path: descending from the current tick for a2b,
/// ascending above it for b2a.
pub fn order_swap_ticks(ticks: &[TickData], current_tick_index: i32, a2b: bool) -> Vec<TickData> {
    let mut swap_ticks: Vec<TickData> = ticks
        .iter()
        .filter(|tick| is_on_swap_path(tick.index, current_tick_index, a2b))
        .cloned()
        .collect();

    if a2b {
        swap_ticks.sort_unstable_by(|a, b| b.index.cmp(&a.index));
    } else {
        swap_ticks.sort_unstable_by(|a, b| a.index.cmp(&b.index));
    }
    swap_ticks
}

#[inline]
pub(crate) fn is_on_swap_path(tick_index: i32, current_tick_index: i32, a2b: bool) -> bool {
    if a2b {
        tick_index <= current_tick_index
    } else {
        tick_index > current_tick_index
    }
}

/// Price the next step aims for: the tick itself unless the direction's
/// hard limit is closer.
#[inline]
pub(crate) fn step_target_sqrt_price(tick_sqrt_price: U256, a2b: bool) -> U256 {
    let limit = get_default_sqrt_price_limit(a2b);
    if (a2b && limit > tick_sqrt_price) || (!a2b && limit < tick_sqrt_price) {
        limit
    } else {
        tick_sqrt_price
    }
}

/// Liquidity after crossing a tick in the swap direction; moving down
/// removes what the tick adds when moving up.
#[inline]
pub(crate) fn cross_tick(liquidity: u128, liquidity_net: i128, a2b: bool) -> Result<u128, MathError> {
    let delta = if a2b {
        liquidity_net.checked_neg().ok_or(MathError::Overflow)?
    } else {
        liquidity_net
    };
    add_delta(liquidity, delta)
}

/// Amount of the specified side a step used up.
#[inline]
pub(crate) fn consumed_amount(step: &SwapStepResult, by_amount_in: bool) -> U256 {
    if by_amount_in {
        step.amount_in + step.fee_amount
    } else {
        step.amount_out
    }
}

/// Aggregate outcome of a multi-tick swap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SwapResult {
    /// Input paid, fee included.
    pub amount_in: U256,
    pub amount_out: U256,
    pub fee_amount: U256,
    /// Referral share; always zero here, see `math::fee_math`.
    pub ref_amount: U256,
    pub next_sqrt_price: U256,
    pub cross_tick_num: u32,
    /// The ticks ran out before the requested amount was filled.
    pub is_exceed: bool,
}

// the running state of a swap, reported to the caller at the end
struct SwapState {
    // the amount remaining to be swapped in/out of the input/output asset
    amount_remaining: U256,
    // current sqrt(price)
    sqrt_price: U256,
    // the current liquidity in range
    liquidity: u128,
    // input consumed, fee excluded
    amount_in: U256,
    amount_out: U256,
    fee_amount: U256,
    cross_tick_num: u32,
}

/// Walks `swap_ticks` from the pool's current price until `amount` is
/// filled or the ticks run out.
///
/// `swap_ticks` must be ordered along the price path (see
/// [`order_swap_ticks`]); ticks on the wrong side of the current tick are
/// skipped. Running out of ticks is reported through
/// [`SwapResult::is_exceed`] rather than as an error.
pub fn compute_swap(
    pool: &PoolState,
    swap_ticks: &[TickData],
    a2b: bool,
    by_amount_in: bool,
    amount: U256,
) -> Result<SwapResult, Error> {
    let mut state = SwapState {
        amount_remaining: amount,
        sqrt_price: pool.current_sqrt_price,
        liquidity: pool.liquidity,
        amount_in: U256::ZERO,
        amount_out: U256::ZERO,
        fee_amount: U256::ZERO,
        cross_tick_num: 0,
    };

    for tick in swap_ticks {
        if !is_on_swap_path(tick.index, pool.current_tick_index, a2b) {
            continue;
        }

        let step = compute_swap_step(
            state.sqrt_price,
            step_target_sqrt_price(tick.sqrt_price, a2b),
            state.liquidity,
            state.amount_remaining,
            pool.fee_rate,
            by_amount_in,
        )?;

        state.amount_remaining =
            check_unsigned_sub(state.amount_remaining, consumed_amount(&step, by_amount_in))?;
        state.amount_in += step.amount_in;
        state.amount_out += step.amount_out;
        state.fee_amount += step.fee_amount;

        trace!(
            tick = tick.index,
            amount_in = ?step.amount_in,
            amount_out = ?step.amount_out,
            fee_amount = ?step.fee_amount,
            next_sqrt_price = ?step.next_sqrt_price,
            "swap step"
        );

        if step.next_sqrt_price == tick.sqrt_price {
            state.liquidity = cross_tick(state.liquidity, tick.liquidity_net, a2b)?;
            state.sqrt_price = tick.sqrt_price;
            state.cross_tick_num += 1;
        } else {
            state.sqrt_price = step.next_sqrt_price;
            break;
        }

        if state.amount_remaining.is_zero() {
            break;
        }
    }

    let amount_in = state.amount_in + state.fee_amount;
    let is_exceed = if by_amount_in {
        amount_in < amount
    } else {
        state.amount_out < amount
    };

    debug!(
        a2b,
        by_amount_in,
        ?amount,
        ?amount_in,
        amount_out = ?state.amount_out,
        cross_tick_num = state.cross_tick_num,
        is_exceed,
        "computed swap"
    );

    Ok(SwapResult {
        amount_in,
        amount_out: state.amount_out,
        fee_amount: state.fee_amount,
        ref_amount: U256::ZERO,
        next_sqrt_price: state.sqrt_price,
        cross_tick_num: state.cross_tick_num,
        is_exceed,
    })
}

/// Inputs for [`calculate_rates`].
#[derive(Debug, Clone, Copy)]
pub struct CalculateRatesParams<'a> {
    pub decimals_a: u8,
    pub decimals_b: u8,
    pub a2b: bool,
    pub by_amount_in: bool,
    pub amount: U256,
    /// Any initialized ticks of the pool, in any order.
    pub swap_ticks: &'a [TickData],
    pub current_pool: &'a PoolState,
}

/// A user-facing quote.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SwapQuote {
    pub estimated_amount_in: U256,
    pub estimated_amount_out: U256,
    pub estimated_end_sqrt_price: U256,
    pub estimated_fee_amount: U256,
    pub is_exceed: bool,
    pub amount: U256,
    pub a2b: bool,
    pub by_amount_in: bool,
    /// Relative move of the pool price caused by the swap, in percent.
    pub price_impact_pct: f64,
}

/// Orders the supplied ticks, runs [`compute_swap`] and reports the
/// estimate together with its price impact.
pub fn calculate_rates(params: &CalculateRatesParams<'_>) -> Result<SwapQuote, Error> {
    let pool = params.current_pool;
    let swap_ticks = order_swap_ticks(params.swap_ticks, pool.current_tick_index, params.a2b);
    let result = compute_swap(
        pool,
        &swap_ticks,
        params.a2b,
        params.by_amount_in,
        params.amount,
    )?;

    let price_before =
        sqrt_price_x64_to_price(pool.current_sqrt_price, params.decimals_a, params.decimals_b);
    let price_after =
        sqrt_price_x64_to_price(result.next_sqrt_price, params.decimals_a, params.decimals_b);
    let price_impact_pct = if price_before > 0.0 {
        (price_after - price_before).abs() / price_before * 100.0
    } else {
        0.0
    };

    Ok(SwapQuote {
        estimated_amount_in: result.amount_in,
        estimated_amount_out: result.amount_out,
        estimated_end_sqrt_price: result.next_sqrt_price,
        estimated_fee_amount: result.fee_amount,
        is_exceed: result.is_exceed,
        amount: params.amount,
        a2b: params.a2b,
        by_amount_in: params.by_amount_in,
        price_impact_pct,
    })
}
