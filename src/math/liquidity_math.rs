use crate::error::{Error, MathError, StateError};
use crate::math::math_helpers::{check_unsigned_sub, mul_div, mul_div_rounding_up};
use crate::math::sqrt_price_math::{get_delta_a, get_delta_b};
use crate::math::tick_math::{sqrt_price_x64_to_tick_index, tick_index_to_sqrt_price_x64};
use crate::{Q64, RESOLUTION};
use alloy_primitives::U256;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Applies a signed liquidity delta, as done when a swap crosses a tick.
pub fn add_delta(x: u128, y: i128) -> Result<u128, MathError> {
    if y < 0 {
        x.checked_sub(y.unsigned_abs())
            .ok_or(MathError::UnsignedUnderflow)
    } else {
        x.checked_add(y as u128).ok_or(MathError::Overflow)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoinAmounts {
    pub coin_a: U256,
    pub coin_b: U256,
}

impl CoinAmounts {
    pub fn new(coin_a: U256, coin_b: U256) -> Self {
        Self { coin_a, coin_b }
    }
}

/// Ratio `numerator / denominator`, used for slippage tolerances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Percentage {
    pub numerator: u64,
    pub denominator: u64,
}

impl Percentage {
    pub fn from_fraction(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// `bps` basis points, e.g. `from_bps(50)` is 0.5 %.
    pub fn from_bps(bps: u64) -> Self {
        Self::from_fraction(bps, 10_000)
    }
}

/// Scales `amount` by `1 ± slippage`.
///
/// Adjusting up yields a cap on what the trader pays and is floored;
/// adjusting down yields a floor on what the trader receives and is
/// ceiled. Both stay inside the exact bound.
pub fn adjust_for_slippage(
    amount: U256,
    slippage: &Percentage,
    adjust_up: bool,
) -> Result<U256, MathError> {
    let denominator = U256::from(slippage.denominator);
    let numerator = U256::from(slippage.numerator);

    if adjust_up {
        mul_div(amount, denominator + numerator, denominator)
    } else {
        let factor = check_unsigned_sub(denominator, numerator)?;
        mul_div_rounding_up(amount, factor, denominator)
    }
}

pub fn adjust_for_coin_slippage(
    amounts: &CoinAmounts,
    slippage: &Percentage,
    adjust_up: bool,
) -> Result<CoinAmounts, MathError> {
    Ok(CoinAmounts {
        coin_a: adjust_for_slippage(amounts.coin_a, slippage, adjust_up)?,
        coin_b: adjust_for_slippage(amounts.coin_b, slippage, adjust_up)?,
    })
}

#[inline]
fn ordered_range(lower_sqrt_price: U256, upper_sqrt_price: U256) -> Result<U256, StateError> {
    if lower_sqrt_price >= upper_sqrt_price {
        return Err(StateError::InvalidTickRange);
    }
    Ok(upper_sqrt_price - lower_sqrt_price)
}

/// Liquidity provided by `amount` of coin A over `[lower, upper]`,
/// `amount * lower * upper / ((upper - lower) * 2^64)`.
pub fn get_liquidity_from_coin_a(
    amount: U256,
    lower_sqrt_price: U256,
    upper_sqrt_price: U256,
    round_up: bool,
) -> Result<U256, Error> {
    let diff = ordered_range(lower_sqrt_price, upper_sqrt_price)?;
    let product = lower_sqrt_price * upper_sqrt_price;
    let denominator = diff << RESOLUTION;

    let liquidity = if round_up {
        mul_div_rounding_up(amount, product, denominator)?
    } else {
        mul_div(amount, product, denominator)?
    };
    Ok(liquidity)
}

/// Liquidity provided by `amount` of coin B over `[lower, upper]`,
/// `amount * 2^64 / (upper - lower)`.
pub fn get_liquidity_from_coin_b(
    amount: U256,
    lower_sqrt_price: U256,
    upper_sqrt_price: U256,
    round_up: bool,
) -> Result<U256, Error> {
    let diff = ordered_range(lower_sqrt_price, upper_sqrt_price)?;

    let liquidity = if round_up {
        mul_div_rounding_up(amount, Q64, diff)?
    } else {
        mul_div(amount, Q64, diff)?
    };
    Ok(liquidity)
}

pub fn get_amount_a_from_liquidity(
    liquidity: u128,
    sqrt_price_0: U256,
    sqrt_price_1: U256,
    round_up: bool,
) -> Result<U256, MathError> {
    get_delta_a(sqrt_price_0, sqrt_price_1, liquidity, round_up)
}

pub fn get_amount_b_from_liquidity(
    liquidity: u128,
    sqrt_price_0: U256,
    sqrt_price_1: U256,
    round_up: bool,
) -> Result<U256, MathError> {
    get_delta_b(sqrt_price_0, sqrt_price_1, liquidity, round_up)
}

/// Coin amounts backing `liquidity` in `[lower, upper]` at the current
/// price: only coin A below the range, only coin B above it, both inside.
pub fn get_coin_amount_from_liquidity(
    liquidity: u128,
    current_sqrt_price: U256,
    lower_sqrt_price: U256,
    upper_sqrt_price: U256,
    round_up: bool,
) -> Result<CoinAmounts, Error> {
    ordered_range(lower_sqrt_price, upper_sqrt_price)?;

    let amounts = if current_sqrt_price < lower_sqrt_price {
        CoinAmounts::new(
            get_amount_a_from_liquidity(liquidity, lower_sqrt_price, upper_sqrt_price, round_up)?,
            U256::ZERO,
        )
    } else if current_sqrt_price < upper_sqrt_price {
        CoinAmounts::new(
            get_amount_a_from_liquidity(liquidity, current_sqrt_price, upper_sqrt_price, round_up)?,
            get_amount_b_from_liquidity(liquidity, lower_sqrt_price, current_sqrt_price, round_up)?,
        )
    } else {
        CoinAmounts::new(
            U256::ZERO,
            get_amount_b_from_liquidity(liquidity, lower_sqrt_price, upper_sqrt_price, round_up)?,
        )
    };
    Ok(amounts)
}

/// Largest liquidity that both coin amounts can back in
/// `[lower_tick, upper_tick]` at the current price.
///
/// A current price sitting exactly on the lower bound counts as below
/// the range, so only coin A is used there.
pub fn estimate_liquidity_from_coin_amounts(
    current_sqrt_price: U256,
    lower_tick: i32,
    upper_tick: i32,
    amounts: &CoinAmounts,
) -> Result<U256, Error> {
    if lower_tick >= upper_tick {
        return Err(StateError::InvalidTickRange.into());
    }
    let lower_sqrt_price = tick_index_to_sqrt_price_x64(lower_tick)?;
    let upper_sqrt_price = tick_index_to_sqrt_price_x64(upper_tick)?;

    if current_sqrt_price <= lower_sqrt_price {
        get_liquidity_from_coin_a(amounts.coin_a, lower_sqrt_price, upper_sqrt_price, false)
    } else if current_sqrt_price < upper_sqrt_price {
        let liquidity_a =
            get_liquidity_from_coin_a(amounts.coin_a, current_sqrt_price, upper_sqrt_price, false)?;
        let liquidity_b =
            get_liquidity_from_coin_b(amounts.coin_b, lower_sqrt_price, current_sqrt_price, false)?;
        Ok(liquidity_a.min(liquidity_b))
    } else {
        get_liquidity_from_coin_b(amounts.coin_b, lower_sqrt_price, upper_sqrt_price, false)
    }
}

/// Parameters for adding liquidity when only one coin amount is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LiquidityInput {
    pub coin_amount_a: U256,
    pub coin_amount_b: U256,
    pub token_max_a: U256,
    pub token_max_b: U256,
    pub liquidity_amount: U256,
    pub fix_amount_a: bool,
}

/// Derives the liquidity backed by `coin_amount` of one coin and the
/// matching amount of the other coin, plus slippage-adjusted maxima.
pub fn est_liquidity_and_coin_amount_from_one_amount(
    lower_tick: i32,
    upper_tick: i32,
    coin_amount: U256,
    is_coin_a: bool,
    round_up: bool,
    slippage: &Percentage,
    current_sqrt_price: U256,
) -> Result<LiquidityInput, Error> {
    if lower_tick >= upper_tick {
        return Err(StateError::InvalidTickRange.into());
    }
    let current_tick = sqrt_price_x64_to_tick_index(current_sqrt_price)?;
    let lower_sqrt_price = tick_index_to_sqrt_price_x64(lower_tick)?;
    let upper_sqrt_price = tick_index_to_sqrt_price_x64(upper_tick)?;

    let (liquidity, amounts) = if current_tick < lower_tick {
        if !is_coin_a {
            return Err(StateError::UnsupportedSingleSidedLiquidity.into());
        }
        let liquidity =
            get_liquidity_from_coin_a(coin_amount, lower_sqrt_price, upper_sqrt_price, false)?;
        (liquidity, CoinAmounts::new(coin_amount, U256::ZERO))
    } else if current_tick < upper_tick {
        let liquidity = if is_coin_a {
            get_liquidity_from_coin_a(coin_amount, current_sqrt_price, upper_sqrt_price, false)?
        } else {
            get_liquidity_from_coin_b(coin_amount, lower_sqrt_price, current_sqrt_price, false)?
        };
        let liquidity_u128 = u128::try_from(liquidity).map_err(|_| MathError::Overflow)?;
        let amounts = get_coin_amount_from_liquidity(
            liquidity_u128,
            current_sqrt_price,
            lower_sqrt_price,
            upper_sqrt_price,
            round_up,
        )?;
        (liquidity, amounts)
    } else {
        if is_coin_a {
            return Err(StateError::UnsupportedSingleSidedLiquidity.into());
        }
        let liquidity =
            get_liquidity_from_coin_b(coin_amount, lower_sqrt_price, upper_sqrt_price, false)?;
        (liquidity, CoinAmounts::new(U256::ZERO, coin_amount))
    };

    let max = adjust_for_coin_slippage(&amounts, slippage, true)?;

    Ok(LiquidityInput {
        coin_amount_a: amounts.coin_a,
        coin_amount_b: amounts.coin_b,
        token_max_a: max.coin_a,
        token_max_b: max.coin_b,
        liquidity_amount: liquidity,
        fix_amount_a: is_coin_a,
    })
}
