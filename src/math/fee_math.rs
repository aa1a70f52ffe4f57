use crate::error::{Error, MathError};
use crate::math::math_helpers::{check_mul_div_ceil, check_mul_div_floor, check_unsigned_sub};
use crate::pool::PoolState;
use crate::{RESOLUTION, U256_E6, U64_MAX};
use alloy_primitives::U256;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a swap fee is shared out. The three parts always sum to the fee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeeSplit {
    pub protocol_fee: U256,
    pub ref_fee: U256,
    pub pool_fee: U256,
}

/// Splits `fee_amount` into protocol, referral and liquidity-provider
/// shares. Both rates are parts per million of the fee and are deducted
/// independently: the protocol share rounds up, the referral share
/// rounds down, and the pool keeps the remainder.
pub fn split_fee(
    fee_amount: U256,
    protocol_fee_rate: u32,
    ref_fee_rate: u32,
) -> Result<FeeSplit, MathError> {
    let protocol_fee =
        check_mul_div_ceil(fee_amount, U256::from(protocol_fee_rate), U256_E6, 64)?;
    let ref_fee = check_mul_div_floor(fee_amount, U256::from(ref_fee_rate), U256_E6, 64)?;
    let pool_fee = check_unsigned_sub(check_unsigned_sub(fee_amount, protocol_fee)?, ref_fee)?;

    Ok(FeeSplit {
        protocol_fee,
        ref_fee,
        pool_fee,
    })
}

/// Splits a swap fee and books it against a copy of `pool`: the pool
/// share grows the per-liquidity fee accumulator of the input coin
/// (modulo 2^128, as on chain) and the protocol share is added to the
/// protocol fee balance.
pub fn update_fee_rate(
    pool: &PoolState,
    fee_amount: U256,
    ref_fee_rate: u32,
    protocol_fee_rate: u32,
    is_coin_a: bool,
) -> Result<(FeeSplit, PoolState), Error> {
    let split = split_fee(fee_amount, protocol_fee_rate, ref_fee_rate)?;
    let mut updated = pool.clone();

    if pool.liquidity != 0 {
        let growth = (split.pool_fee << RESOLUTION) / U256::from(pool.liquidity);
        let limbs = growth.as_limbs();
        let growth = ((limbs[1] as u128) << 64) | limbs[0] as u128;
        if is_coin_a {
            updated.fee_growth_global_a = updated.fee_growth_global_a.wrapping_add(growth);
        } else {
            updated.fee_growth_global_b = updated.fee_growth_global_b.wrapping_add(growth);
        }
    }

    if split.protocol_fee > U64_MAX {
        return Err(MathError::Overflow.into());
    }
    let protocol_fee = split.protocol_fee.as_limbs()[0];
    let balance = if is_coin_a {
        &mut updated.fee_protocol_coin_a
    } else {
        &mut updated.fee_protocol_coin_b
    };
    *balance = balance.checked_add(protocol_fee).ok_or(MathError::Overflow)?;

    Ok((split, updated))
}
