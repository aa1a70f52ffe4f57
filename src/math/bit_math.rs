use crate::error::MathError;
use alloy_primitives::U256;

/// Index (0–255) of the highest set bit, or `MathError::ZeroValue` for zero.
///
/// The tick conversion uses it as the integer part of `log2(sqrt_price)`.
pub fn most_significant_bit(x: U256) -> Result<u8, MathError> {
    if x.is_zero() {
        return Err(MathError::ZeroValue);
    }
    Ok(255 - x.leading_zeros() as u8)
}
