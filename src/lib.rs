//! Concentrated-liquidity swap math in pure Rust, Q64.64 flavour.
//!
//! This crate exposes:
//! - Low‑level math primitives (`math::*`) for fixed-point arithmetic, ticks,
//!   sqrt prices, single swap steps, liquidity and fee splitting.
//! - A tick-walking swap simulator and a single-pass split-swap simulator
//!   (`pool::*`) that price trades against an immutable pool snapshot.
//! - A router (`router`) that allocates one order across up to four
//!   candidate paths to maximize output or minimize input.
//!
//! Nothing here touches the network: pool and tick state are supplied by the
//! caller, already fetched and decoded.
//!
//! # Examples
//!
//! ## Pure math
//! ```no_run
//! use clmmpool_math::{math::tick_math, Q64};
//!
//! let sqrt_price = tick_math::tick_index_to_sqrt_price_x64(0).unwrap();
//! assert_eq!(sqrt_price, Q64);
//! assert_eq!(tick_math::sqrt_price_x64_to_tick_index(sqrt_price).unwrap(), 0);
//! ```
//!
//! ## Quoting a swap
//! ```no_run
//! use clmmpool_math::{
//!     math::tick_math::tick_index_to_sqrt_price_x64,
//!     pool::{compute_swap, order_swap_ticks, PoolState, TickData},
//!     U256,
//! };
//!
//! let pool = PoolState::new(1_000_000_000_000, tick_index_to_sqrt_price_x64(0).unwrap(), 0, 2500);
//! let ticks = vec![
//!     TickData::new(-60, 1_000_000_000_000, 1_000_000_000_000).unwrap(),
//!     TickData::new(60, -1_000_000_000_000, 1_000_000_000_000).unwrap(),
//! ];
//!
//! let a2b = true;
//! let swap_ticks = order_swap_ticks(&ticks, pool.current_tick_index, a2b);
//! let result = compute_swap(&pool, &swap_ticks, a2b, true, U256::from(1_000_000u64)).unwrap();
//! println!("out: {}, fee: {}", result.amount_out, result.fee_amount);
//! ```

pub use alloy_primitives::{B256, U256};

pub mod config;
pub mod error;
pub mod math;
pub mod pool;
pub mod router;

pub use config::RouterConfig;
pub use error::Error;
pub use pool::{PoolState, SplitSwapResult, SwapResult, TickData};
pub use router::{OneStep, RouteLeg, SplitPath, find_best_split_steps};

/// On-chain object id of a pool.
pub type PoolId = B256;

const U64_MAX: U256 = U256::from_limbs([u64::MAX, 0, 0, 0]);
const U256_E6: U256 = U256::from_limbs([1000000, 0, 0, 0]);

pub const RESOLUTION: u8 = 64;
pub const Q64: U256 = U256::from_limbs([0, 1, 0, 0]);

/// Denominator of every fee rate (`fee_rate / 1_000_000`).
pub const FEE_RATE_DENOMINATOR: u32 = 1_000_000;
