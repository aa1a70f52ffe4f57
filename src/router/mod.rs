pub mod compositions;

pub use compositions::Compositions;

use crate::config::RouterConfig;
use crate::error::{Error, MathError, RouterError};
use crate::pool::split_swap::{SplitSwap, SplitSwapResult, SplitUnit, create_split_amount_array};
use crate::pool::types::{PoolState, TickData};
use crate::PoolId;
use alloy_primitives::U256;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One candidate path together with its simulated amount ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SplitPath {
    pub pool_id: PoolId,
    pub a2b: bool,
    pub fee_rate: u32,
    /// Nominal amount of every rung, from 0 % to 100 % of the order.
    pub amounts: Vec<U256>,
    pub result: SplitSwapResult,
}

impl SplitPath {
    /// Builds the ladder for `amount` at `unit` granularity and simulates
    /// every rung against `pool`.
    pub fn simulate(
        pool_id: PoolId,
        pool: &PoolState,
        swap_ticks: &[TickData],
        a2b: bool,
        by_amount_in: bool,
        amount: U256,
        unit: SplitUnit,
    ) -> Result<Self, Error> {
        let amounts = create_split_amount_array(amount, unit);
        let result = SplitSwap::new(pool, swap_ticks, a2b, by_amount_in).compute(&amounts)?;
        Ok(Self {
            pool_id,
            a2b,
            fee_rate: pool.fee_rate,
            amounts,
            result,
        })
    }

    // every parallel array the router reads
    fn ladder_lens(&self) -> [usize; 4] {
        [
            self.amounts.len(),
            self.result.amount_in_array.len(),
            self.result.amount_out_array.len(),
            self.result.is_exceed.len(),
        ]
    }

    #[inline]
    fn rung_amount(&self, rung: usize, by_amount_in: bool) -> U256 {
        if by_amount_in {
            self.result.amount_out_array[rung]
        } else {
            self.result.amount_in_array[rung]
        }
    }
}

/// A path that receives a non-zero share of the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteLeg {
    pub pool_id: PoolId,
    pub a2b: bool,
    pub fee_rate: u32,
    pub split_percent: u32,
    /// Nominal amount routed through this leg.
    pub split_amount: U256,
    /// Output received (exact input) or input paid (exact output).
    pub amount: U256,
}

/// Best allocation of one order across the candidate paths.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OneStep {
    pub paths: Vec<RouteLeg>,
    /// Summed output (exact input) or summed input (exact output).
    pub amount: U256,
    pub is_exceed: bool,
}

impl OneStep {
    /// No allocation fills the order.
    pub fn exceeded() -> Self {
        Self {
            paths: Vec::new(),
            amount: U256::ZERO,
            is_exceed: true,
        }
    }
}

/// Exhaustive search over every allocation of the order across `paths`
/// at the granularity of `config.split_unit`.
///
/// Exact-input orders maximize the summed output, exact-output orders
/// minimize the summed input. Allocations that put any leg on an exceeded
/// rung are skipped. Among equal totals the first allocation in
/// lexicographic order wins.
pub fn find_best_split_steps(
    paths: &[SplitPath],
    by_amount_in: bool,
    config: &RouterConfig,
) -> Result<OneStep, Error> {
    config.validate()?;
    if paths.is_empty() {
        return Err(RouterError::NoPaths.into());
    }
    if paths.len() > config.max_split_paths {
        return Err(RouterError::TooManyPaths {
            count: paths.len(),
            max: config.max_split_paths,
        }
        .into());
    }

    let expected = config.ladder_len();
    for (i, path) in paths.iter().enumerate() {
        if let Some(actual) = path.ladder_lens().into_iter().find(|&len| len != expected) {
            return Err(RouterError::LadderLengthMismatch {
                path: i,
                expected,
                actual,
            }
            .into());
        }
    }

    let units = expected - 1;
    let mut best: Option<(Vec<usize>, U256)> = None;

    'search: for allocation in Compositions::new(units, paths.len()) {
        let mut total = U256::ZERO;
        for (path, &rung) in paths.iter().zip(&allocation) {
            if path.result.is_exceed[rung] {
                continue 'search;
            }
            total = total
                .checked_add(path.rung_amount(rung, by_amount_in))
                .ok_or(MathError::Overflow)?;
        }

        let improves = match &best {
            None => true,
            Some((_, best_total)) if by_amount_in => total > *best_total,
            Some((_, best_total)) => total < *best_total,
        };
        if improves {
            best = Some((allocation, total));
        }
    }

    let Some((allocation, total)) = best.filter(|(_, total)| !total.is_zero()) else {
        debug!(paths = paths.len(), by_amount_in, "no allocation fills the order");
        return Ok(OneStep::exceeded());
    };

    let unit = config.split_unit.percent();
    let legs: Vec<RouteLeg> = paths
        .iter()
        .zip(&allocation)
        .filter(|(_, rung)| **rung > 0)
        .map(|(path, &rung)| RouteLeg {
            pool_id: path.pool_id,
            a2b: path.a2b,
            fee_rate: path.fee_rate,
            split_percent: rung as u32 * unit,
            split_amount: path.amounts[rung],
            amount: path.rung_amount(rung, by_amount_in),
        })
        .collect();

    debug!(
        paths = paths.len(),
        by_amount_in,
        allocation = ?allocation,
        amount = ?total,
        "found best split"
    );

    Ok(OneStep {
        paths: legs,
        amount: total,
        is_exceed: false,
    })
}
