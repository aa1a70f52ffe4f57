use crate::math::math_helpers::{check_mul_div_ceil, check_mul_div_floor, check_unsigned_sub};
use crate::math::sqrt_price_math::{
    get_delta_down_from_output, get_delta_up_from_input, get_next_sqrt_price_from_input,
    get_next_sqrt_price_from_output,
};
use crate::{
    U256_E6,
    error::{Error, MathError},
};
use alloy_primitives::U256;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of swapping inside a single price segment.
///
/// `amount_in` excludes the fee; callers add `fee_amount` on top.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SwapStepResult {
    pub amount_in: U256,
    pub amount_out: U256,
    pub fee_amount: U256,
    pub next_sqrt_price: U256,
}

/// Swaps `amount` between `current_sqrt_price` and `target_sqrt_price`
/// without crossing a tick. The direction is implied by the two prices:
/// a2b when `current >= target`.
///
/// Amounts owed to the pool round up and amounts owed to the trader
/// round down. With zero liquidity the step is empty and jumps straight
/// to the target.
pub fn compute_swap_step(
    current_sqrt_price: U256,
    target_sqrt_price: U256,
    liquidity: u128,
    amount: U256,
    fee_rate: u32,
    by_amount_in: bool,
) -> Result<SwapStepResult, Error> {
    let a2b = current_sqrt_price >= target_sqrt_price;
    let fee_rate = U256::from(fee_rate);
    let fee_complement = check_unsigned_sub(U256_E6, fee_rate)?;
    if fee_complement.is_zero() {
        return Err(MathError::DivideByZero.into());
    }

    if liquidity == 0 {
        return Ok(SwapStepResult {
            next_sqrt_price: target_sqrt_price,
            ..Default::default()
        });
    }

    let mut step = SwapStepResult::default();

    if by_amount_in {
        let amount_remain = check_mul_div_floor(amount, fee_complement, U256_E6, 64)?;
        let max_amount_in =
            get_delta_up_from_input(current_sqrt_price, target_sqrt_price, liquidity, a2b)?;

        if max_amount_in > amount_remain {
            step.amount_in = amount_remain;
            step.fee_amount = check_unsigned_sub(amount, amount_remain)?;
            step.next_sqrt_price =
                get_next_sqrt_price_from_input(current_sqrt_price, liquidity, amount_remain, a2b)?;
        } else {
            step.amount_in = max_amount_in;
            step.fee_amount = check_mul_div_ceil(max_amount_in, fee_rate, fee_complement, 64)?;
            step.next_sqrt_price = target_sqrt_price;
        }

        step.amount_out = get_delta_down_from_output(
            current_sqrt_price,
            step.next_sqrt_price,
            liquidity,
            a2b,
        )?;
    } else {
        let max_amount_out =
            get_delta_down_from_output(current_sqrt_price, target_sqrt_price, liquidity, a2b)?;

        if max_amount_out > amount {
            step.amount_out = amount;
            step.next_sqrt_price =
                get_next_sqrt_price_from_output(current_sqrt_price, liquidity, amount, a2b)?;
        } else {
            step.amount_out = max_amount_out;
            step.next_sqrt_price = target_sqrt_price;
        }

        step.amount_in =
            get_delta_up_from_input(current_sqrt_price, step.next_sqrt_price, liquidity, a2b)?;
        step.fee_amount = check_mul_div_ceil(step.amount_in, fee_rate, fee_complement, 64)?;
    }

    Ok(step)
}
