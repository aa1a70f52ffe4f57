use crate::error::MathError;
use alloy_primitives::U256;

const U256_ONE: U256 = U256::ONE;
const U256_TWO: U256 = U256::from_limbs([2, 0, 0, 0]);
const U256_THREE: U256 = U256::from_limbs([3, 0, 0, 0]);

/// Computes `a * b / denominator` with full 512‑bit intermediate
/// precision, returning a `MathError` on overflow or division by zero.
///
/// Everything else in this module (and most of the swap math) is built
/// on top of this primitive, so products of two 256-bit values never
/// lose precision before the division.
#[inline]
pub fn mul_div(a: U256, b: U256, mut denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivideByZero);
    }

    let mm = a.mul_mod(b, U256::MAX);
    let mut prod0 = a.wrapping_mul(b);

    let (mut prod1, borrow1) = mm.overflowing_sub(prod0);
    if borrow1 {
        prod1 = prod1.wrapping_sub(U256_ONE);
    }

    if prod1.is_zero() {
        return Ok(prod0.wrapping_div(denominator));
    }

    if denominator <= prod1 {
        return Err(MathError::Overflow);
    }

    let remainder = a.mul_mod(b, denominator);
    let (prod0_new, borrow2) = prod0.overflowing_sub(remainder);
    prod0 = prod0_new;
    if borrow2 {
        prod1 = prod1.wrapping_sub(U256_ONE);
    }

    let twos = denominator & denominator.wrapping_neg();
    denominator = denominator.wrapping_div(twos);
    prod0 = prod0.wrapping_div(twos);

    let twos_adj = twos
        .wrapping_neg()
        .wrapping_div(twos)
        .wrapping_add(U256_ONE);
    prod0 |= prod1.wrapping_mul(twos_adj);

    let mut inv = U256_THREE.wrapping_mul(denominator) ^ U256_TWO;

    macro_rules! newton_iteration {
        () => {
            inv = inv.wrapping_mul(U256_TWO.wrapping_sub(denominator.wrapping_mul(inv)))
        };
    }

    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();

    Ok(prod0.wrapping_mul(inv))
}

/// Like [`mul_div`], but rounds the result up when there is a
/// non‑zero remainder.
#[inline]
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    let result = mul_div(a, b, denominator)?;

    if a.mul_mod(b, denominator).is_zero() {
        Ok(result)
    } else {
        result.checked_add(U256::ONE).ok_or(MathError::Overflow)
    }
}

/// Divides `a` by `b`, rounding up on a non‑zero remainder.
#[inline]
pub fn div_rounding_up(a: U256, b: U256) -> Result<U256, MathError> {
    if b.is_zero() {
        return Err(MathError::DivideByZero);
    }
    let (quotient, remainder) = a.div_rem(b);
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256::ONE)
    }
}

/// Returns true when `value` needs more than `limit` bits.
#[inline]
pub fn is_overflow(value: U256, limit: usize) -> bool {
    value.bit_len() > limit
}

#[inline]
fn within(value: U256, limit: usize) -> Result<U256, MathError> {
    if is_overflow(value, limit) {
        Err(MathError::Overflow)
    } else {
        Ok(value)
    }
}

/// `floor(a * b / denominator)`, which must fit in `limit` bits.
pub fn check_mul_div_floor(
    a: U256,
    b: U256,
    denominator: U256,
    limit: usize,
) -> Result<U256, MathError> {
    within(mul_div(a, b, denominator)?, limit)
}

/// `ceil(a * b / denominator)`, which must fit in `limit` bits.
///
/// Equivalent to `(a * b + denominator - 1) / denominator` for the
/// unsigned operands this crate works with.
pub fn check_mul_div_ceil(
    a: U256,
    b: U256,
    denominator: U256,
    limit: usize,
) -> Result<U256, MathError> {
    within(mul_div_rounding_up(a, b, denominator)?, limit)
}

/// `(a * b + denominator / 2) / denominator`, which must fit in `limit` bits.
pub fn check_mul_div_round(
    a: U256,
    b: U256,
    denominator: U256,
    limit: usize,
) -> Result<U256, MathError> {
    let quotient = mul_div(a, b, denominator)?;
    let remainder = a.mul_mod(b, denominator);
    // half_down = floor(d / 2); rounding up happens once remainder + half_down >= d
    let half_down = denominator >> 1;
    let result = if remainder >= denominator - half_down {
        quotient.checked_add(U256::ONE).ok_or(MathError::Overflow)?
    } else {
        quotient
    };
    within(result, limit)
}

/// `(a * b) >> shift`, rounded up when `round_up` is set and any of the
/// discarded low bits are non-zero. The result must fit in `limit` bits.
pub fn check_mul_shift_right(
    a: U256,
    b: U256,
    shift: usize,
    limit: usize,
    round_up: bool,
) -> Result<U256, MathError> {
    if shift >= 256 {
        return Err(MathError::Overflow);
    }
    let denominator = U256::ONE << shift;
    let result = if round_up {
        mul_div_rounding_up(a, b, denominator)?
    } else {
        mul_div(a, b, denominator)?
    };
    within(result, limit)
}

/// `(a * b) << shift`, which must fit in `limit` bits.
pub fn check_mul_shift_left(
    a: U256,
    b: U256,
    shift: usize,
    limit: usize,
) -> Result<U256, MathError> {
    let product = a.checked_mul(b).ok_or(MathError::Overflow)?;
    if product.is_zero() {
        return Ok(product);
    }
    if product.bit_len() + shift > limit.min(256) {
        return Err(MathError::Overflow);
    }
    Ok(product << shift)
}

/// `a - b` for unsigned quantities; a negative result is a caller bug.
#[inline]
pub fn check_unsigned_sub(a: U256, b: U256) -> Result<U256, MathError> {
    a.checked_sub(b).ok_or(MathError::UnsignedUnderflow)
}
