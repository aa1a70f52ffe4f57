use crate::math::math_helpers::{
    check_mul_shift_right, check_unsigned_sub, is_overflow, mul_div, mul_div_rounding_up,
};
use crate::math::tick_math::{MAX_SQRT_PRICE, MIN_SQRT_PRICE};
use crate::{
    Q64, RESOLUTION,
    error::{Error, MathError, StateError},
};
use alloy_primitives::U256;

#[inline]
fn abs_diff(a: U256, b: U256) -> U256 {
    if a > b { a - b } else { b - a }
}

#[inline]
fn check_sqrt_price_bounds(sqrt_price: U256) -> Result<U256, Error> {
    if sqrt_price < MIN_SQRT_PRICE || sqrt_price > MAX_SQRT_PRICE {
        return Err(StateError::InvalidSqrtPrice.into());
    }
    Ok(sqrt_price)
}

/// Amount of coin A between two sqrt prices for `liquidity`,
/// `L * |p0 - p1| * 2^64 / (p0 * p1)`. The result must fit in 64 bits.
pub fn get_delta_a(
    sqrt_price_0: U256,
    sqrt_price_1: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, MathError> {
    let diff = abs_diff(sqrt_price_0, sqrt_price_1);
    if liquidity == 0 || diff.is_zero() {
        return Ok(U256::ZERO);
    }
    let numerator = U256::from(liquidity) * diff;
    let denominator = sqrt_price_0 * sqrt_price_1;

    let result = if round_up {
        mul_div_rounding_up(numerator, Q64, denominator)?
    } else {
        mul_div(numerator, Q64, denominator)?
    };
    if is_overflow(result, 64) {
        return Err(MathError::Overflow);
    }
    Ok(result)
}

/// Amount of coin B between two sqrt prices for `liquidity`,
/// `(L * |p0 - p1|) >> 64`. The result must fit in 64 bits.
pub fn get_delta_b(
    sqrt_price_0: U256,
    sqrt_price_1: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, MathError> {
    let diff = abs_diff(sqrt_price_0, sqrt_price_1);
    if liquidity == 0 || diff.is_zero() {
        return Ok(U256::ZERO);
    }
    check_mul_shift_right(
        U256::from(liquidity),
        diff,
        RESOLUTION as usize,
        64,
        round_up,
    )
}

/// Next sqrt price after adding (`by_amount_in`) or removing coin A,
/// rounded up: `ceil(p * L * 2^64 / (L * 2^64 ± p * amount))`.
pub fn get_next_sqrt_price_a_up(
    sqrt_price: U256,
    liquidity: u128,
    amount: U256,
    by_amount_in: bool,
) -> Result<U256, Error> {
    if amount.is_zero() {
        return Ok(sqrt_price);
    }

    let numerator = U256::from(liquidity) << RESOLUTION;
    let product = sqrt_price
        .checked_mul(amount)
        .ok_or(MathError::Overflow)?;

    let denominator = if by_amount_in {
        numerator.checked_add(product).ok_or(MathError::Overflow)?
    } else {
        check_unsigned_sub(numerator, product)?
    };

    let next = mul_div_rounding_up(sqrt_price, numerator, denominator)?;
    check_sqrt_price_bounds(next)
}

/// Next sqrt price after adding (`by_amount_in`) or removing coin B,
/// rounded down: `p ± amount * 2^64 / L`, the quotient floored when
/// adding and ceiled when removing.
pub fn get_next_sqrt_price_b_down(
    sqrt_price: U256,
    liquidity: u128,
    amount: U256,
    by_amount_in: bool,
) -> Result<U256, Error> {
    let liquidity = U256::from(liquidity);

    let next = if by_amount_in {
        let quotient = mul_div(amount, Q64, liquidity)?;
        sqrt_price.checked_add(quotient).ok_or(MathError::Overflow)?
    } else {
        let quotient = mul_div_rounding_up(amount, Q64, liquidity)?;
        check_unsigned_sub(sqrt_price, quotient)?
    };

    check_sqrt_price_bounds(next)
}

/// Computes the next sqrt price when `amount` of the input coin enters
/// the pool; coin A pushes the price down, coin B pushes it up.
pub fn get_next_sqrt_price_from_input(
    sqrt_price: U256,
    liquidity: u128,
    amount: U256,
    a2b: bool,
) -> Result<U256, Error> {
    if a2b {
        get_next_sqrt_price_a_up(sqrt_price, liquidity, amount, true)
    } else {
        get_next_sqrt_price_b_down(sqrt_price, liquidity, amount, true)
    }
}

/// Computes the next sqrt price when `amount` of the output coin leaves
/// the pool.
pub fn get_next_sqrt_price_from_output(
    sqrt_price: U256,
    liquidity: u128,
    amount: U256,
    a2b: bool,
) -> Result<U256, Error> {
    if a2b {
        get_next_sqrt_price_b_down(sqrt_price, liquidity, amount, false)
    } else {
        get_next_sqrt_price_a_up(sqrt_price, liquidity, amount, false)
    }
}

/// Input amount needed to move the price from `current` to `target`,
/// rounded up. Not width-checked: a step caps it against the remaining
/// amount before anything is narrowed.
pub fn get_delta_up_from_input(
    current_sqrt_price: U256,
    target_sqrt_price: U256,
    liquidity: u128,
    a2b: bool,
) -> Result<U256, MathError> {
    let diff = abs_diff(current_sqrt_price, target_sqrt_price);
    if liquidity == 0 || diff.is_zero() {
        return Ok(U256::ZERO);
    }
    let product = U256::from(liquidity) * diff;

    if a2b {
        mul_div_rounding_up(product, Q64, target_sqrt_price * current_sqrt_price)
    } else {
        check_mul_shift_right(product, U256::ONE, RESOLUTION as usize, 256, true)
    }
}

/// Output amount released when the price moves from `current` to
/// `target`, rounded down.
pub fn get_delta_down_from_output(
    current_sqrt_price: U256,
    target_sqrt_price: U256,
    liquidity: u128,
    a2b: bool,
) -> Result<U256, MathError> {
    let diff = abs_diff(current_sqrt_price, target_sqrt_price);
    if liquidity == 0 || diff.is_zero() {
        return Ok(U256::ZERO);
    }
    let product = U256::from(liquidity) * diff;

    if a2b {
        Ok(product >> RESOLUTION)
    } else {
        mul_div(product, Q64, target_sqrt_price * current_sqrt_price)
    }
}
