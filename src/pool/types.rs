use crate::error::StateError;
use crate::math::tick_math::{
    MAX_SQRT_PRICE, MAX_TICK_INDEX, MIN_SQRT_PRICE, MIN_TICK_INDEX, tick_index_to_sqrt_price_x64,
};
use alloy_primitives::U256;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of rewarders a pool (and therefore a tick) tracks.
pub const REWARDER_NUM: usize = 3;

/// Snapshot of a pool's swap-relevant state.
///
/// Simulations borrow it immutably; fee bookkeeping returns an updated
/// copy instead of mutating in place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolState {
    pub liquidity: u128,
    pub current_sqrt_price: U256,
    pub current_tick_index: i32,
    /// Parts per million, see [`crate::FEE_RATE_DENOMINATOR`].
    pub fee_rate: u32,
    pub fee_growth_global_a: u128,
    pub fee_growth_global_b: u128,
    pub fee_protocol_coin_a: u64,
    pub fee_protocol_coin_b: u64,
}

impl PoolState {
    #[inline]
    pub fn new(
        liquidity: u128,
        current_sqrt_price: U256,
        current_tick_index: i32,
        fee_rate: u32,
    ) -> Self {
        Self {
            liquidity,
            current_sqrt_price,
            current_tick_index,
            fee_rate,
            fee_growth_global_a: 0,
            fee_growth_global_b: 0,
            fee_protocol_coin_a: 0,
            fee_protocol_coin_b: 0,
        }
    }
}

/// An initialized tick.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickData {
    pub index: i32,
    /// Always `tick_index_to_sqrt_price_x64(index)`.
    pub sqrt_price: U256,
    /// Liquidity added when the price crosses this tick upward.
    pub liquidity_net: i128,
    pub liquidity_gross: u128,
    pub fee_growth_outside_a: u128,
    pub fee_growth_outside_b: u128,
    pub reward_growths_outside: [u128; REWARDER_NUM],
}

impl TickData {
    /// Builds a tick with zeroed growth accumulators, deriving its sqrt
    /// price from the index.
    pub fn new(index: i32, liquidity_net: i128, liquidity_gross: u128) -> Result<Self, StateError> {
        if !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&index) {
            return Err(StateError::InvalidTickIndex);
        }
        Ok(Self {
            index,
            sqrt_price: tick_index_to_sqrt_price_x64(index)?,
            liquidity_net,
            liquidity_gross,
            fee_growth_outside_a: 0,
            fee_growth_outside_b: 0,
            reward_growths_outside: [0; REWARDER_NUM],
        })
    }
}

/// A tick record as stored on chain: signed fields arrive as their
/// two's-complement bit patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawTickData {
    pub index_bits: u32,
    pub sqrt_price: u128,
    pub liquidity_net_bits: u128,
    pub liquidity_gross: u128,
    pub fee_growth_outside_a: u128,
    pub fee_growth_outside_b: u128,
    pub reward_growths_outside: Vec<u128>,
}

impl TryFrom<RawTickData> for TickData {
    type Error = StateError;

    fn try_from(raw: RawTickData) -> Result<Self, Self::Error> {
        let index = raw.index_bits as i32;
        let mut tick = TickData::new(index, raw.liquidity_net_bits as i128, raw.liquidity_gross)?;

        if tick.sqrt_price != U256::from(raw.sqrt_price) {
            return Err(StateError::TickPriceMismatch(index));
        }
        if raw.reward_growths_outside.len() > REWARDER_NUM {
            return Err(StateError::InvalidRewarderCount(
                raw.reward_growths_outside.len(),
            ));
        }

        tick.fee_growth_outside_a = raw.fee_growth_outside_a;
        tick.fee_growth_outside_b = raw.fee_growth_outside_b;
        for (slot, growth) in tick
            .reward_growths_outside
            .iter_mut()
            .zip(raw.reward_growths_outside)
        {
            *slot = growth;
        }
        Ok(tick)
    }
}

/// A pool record as stored on chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawPoolState {
    pub liquidity: u128,
    pub current_sqrt_price: u128,
    pub current_tick_index_bits: u32,
    pub fee_rate: u32,
    pub fee_growth_global_a: u128,
    pub fee_growth_global_b: u128,
    pub fee_protocol_coin_a: u64,
    pub fee_protocol_coin_b: u64,
}

impl TryFrom<RawPoolState> for PoolState {
    type Error = StateError;

    fn try_from(raw: RawPoolState) -> Result<Self, Self::Error> {
        let current_tick_index = raw.current_tick_index_bits as i32;
        if !(MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&current_tick_index) {
            return Err(StateError::InvalidTickIndex);
        }
        let current_sqrt_price = U256::from(raw.current_sqrt_price);
        if current_sqrt_price < MIN_SQRT_PRICE || current_sqrt_price > MAX_SQRT_PRICE {
            return Err(StateError::InvalidSqrtPrice);
        }

        Ok(PoolState {
            liquidity: raw.liquidity,
            current_sqrt_price,
            current_tick_index,
            fee_rate: raw.fee_rate,
            fee_growth_global_a: raw.fee_growth_global_a,
            fee_growth_global_b: raw.fee_growth_global_b,
            fee_protocol_coin_a: raw.fee_protocol_coin_a,
            fee_protocol_coin_b: raw.fee_protocol_coin_b,
        })
    }
}
