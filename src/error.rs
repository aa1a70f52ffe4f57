use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Math error - overflow")]
    Overflow,
    #[error("Math error - unsigned underflow")]
    UnsignedUnderflow,
    #[error("Math error - division by zero")]
    DivideByZero,
    #[error("BitMath error - zero input value")]
    ZeroValue,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    #[error("State error - sqrt price is not within the supported range")]
    InvalidSqrtPrice,
    #[error("State error - tick index out of bounds")]
    InvalidTickIndex,
    #[error("State error - tick spacing must be non-zero")]
    InvalidTickSpacing,
    #[error("State error - lower tick must be below upper tick")]
    InvalidTickRange,
    #[error("State error - single sided liquidity not supported for this coin at the current price")]
    UnsupportedSingleSidedLiquidity,
    #[error("State error - stored sqrt price does not match tick index {0}")]
    TickPriceMismatch(i32),
    #[error("State error - price must be finite and positive")]
    InvalidPrice,
    #[error("State error - at most 3 rewarders per tick, got {0}")]
    InvalidRewarderCount(usize),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SwapError {
    #[error("Swap error - amount ladder is empty")]
    EmptyAmountLadder,
    #[error("Swap error - amount ladder must be non-decreasing (index {0})")]
    AmountLadderNotSorted(usize),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RouterError {
    #[error("Router error - no candidate paths")]
    NoPaths,
    #[error("Router error - {count} paths exceed the configured maximum of {max}")]
    TooManyPaths { count: usize, max: usize },
    #[error("Router error - split ladders must all have {expected} rungs, path {path} has {actual}")]
    LadderLengthMismatch {
        path: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Router error - invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] MathError),

    #[error(transparent)]
    StateError(#[from] StateError),

    #[error(transparent)]
    SwapError(#[from] SwapError),

    #[error(transparent)]
    RouterError(#[from] RouterError),
}
