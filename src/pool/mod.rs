pub mod split_swap;
pub mod swap;
pub mod types;

pub use split_swap::{
    SplitSwap, SplitSwapResult, SplitUnit, compute_split_swap, create_split_amount_array,
    create_split_array,
};
pub use swap::{
    CalculateRatesParams, SwapQuote, SwapResult, calculate_rates, compute_swap,
    get_default_sqrt_price_limit, order_swap_ticks,
};
pub use types::{PoolState, RawPoolState, RawTickData, TickData};
