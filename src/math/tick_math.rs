use crate::error::StateError;
use crate::math::bit_math::most_significant_bit;
use alloy_primitives::U256;

pub const MIN_TICK_INDEX: i32 = -443636;
pub const MAX_TICK_INDEX: i32 = -MIN_TICK_INDEX;

pub const MIN_SQRT_PRICE: U256 = U256::from_limbs([4295048016, 0, 0, 0]);
pub const MAX_SQRT_PRICE: U256 = U256::from_limbs([3871828160200520623, 4294886577, 0, 0]);

/// Largest tick magnitude the 19-bit multiplier ladder can encode.
const MAX_LADDER_TICK: u32 = (1 << 19) - 1;

const LOG_B_2_X32: i128 = 59543866431248;
const LOG_B_P_ERR_MARGIN_LOWER_X64: i128 = 184467440737095516;
const LOG_B_P_ERR_MARGIN_UPPER_X64: i128 = 15793534762490258745;

/// Returns the Q64.64 sqrt price at `tick`.
///
/// Ticks beyond the protocol bound are still computed as long as the
/// multiplier ladder can represent them, so callers converting back
/// with [`sqrt_price_x64_to_tick_index`] get `InvalidSqrtPrice` rather
/// than a silently clamped value.
pub fn tick_index_to_sqrt_price_x64(tick: i32) -> Result<U256, StateError> {
    let abs_tick = tick.unsigned_abs();
    if abs_tick > MAX_LADDER_TICK {
        return Err(StateError::InvalidTickIndex);
    }

    if tick >= 0 {
        Ok(positive_tick_to_sqrt_price_x64(abs_tick))
    } else {
        Ok(negative_tick_to_sqrt_price_x64(abs_tick))
    }
}

fn positive_tick_to_sqrt_price_x64(abs_tick: u32) -> U256 {
    // Q96 accumulator, rescaled to Q64 at the end
    let mut ratio = if abs_tick & 1 != 0 {
        U256::from(79232123823359799118286999567u128)
    } else {
        U256::from(79228162514264337593543950336u128)
    };

    macro_rules! apply_multiplier {
        ($bit:expr, $c:expr) => {
            if abs_tick & $bit != 0 {
                ratio = ratio.wrapping_mul(U256::from($c as u128)) >> 96;
            }
        };
    }

    apply_multiplier!(2, 79236085330515764027303304731u128);
    apply_multiplier!(4, 79244008939048815603706035061u128);
    apply_multiplier!(8, 79259858533276714757314932305u128);
    apply_multiplier!(16, 79291567232598584799939703904u128);
    apply_multiplier!(32, 79355022692464371645785046466u128);
    apply_multiplier!(64, 79482085999252804386437311141u128);
    apply_multiplier!(128, 79736823300114093921829183326u128);
    apply_multiplier!(256, 80248749790819932309965073892u128);
    apply_multiplier!(512, 81282483887344747381513967011u128);
    apply_multiplier!(1024, 83390072131320151908154831281u128);
    apply_multiplier!(2048, 87770609709833776024991924138u128);
    apply_multiplier!(4096, 97234110755111693312479820773u128);
    apply_multiplier!(8192, 119332217159966728226237229890u128);
    apply_multiplier!(16384, 179736315981702064433883588727u128);
    apply_multiplier!(32768, 407748233172238350107850275304u128);
    apply_multiplier!(65536, 2098478828474011932436660412517u128);
    apply_multiplier!(131072, 55581415166113811149459800483533u128);
    apply_multiplier!(262144, 38992368544603139932233054999993551u128);

    ratio >> 32
}

fn negative_tick_to_sqrt_price_x64(abs_tick: u32) -> U256 {
    let mut ratio: u128 = if abs_tick & 1 != 0 {
        18445821805675392311
    } else {
        18446744073709551616
    };

    macro_rules! apply_multiplier {
        ($bit:expr, $c:expr) => {
            if abs_tick & $bit != 0 {
                ratio = (ratio * $c) >> 64;
            }
        };
    }

    apply_multiplier!(2, 18444899583751176498u128);
    apply_multiplier!(4, 18443055278223354162u128);
    apply_multiplier!(8, 18439367220385604838u128);
    apply_multiplier!(16, 18431993317065449817u128);
    apply_multiplier!(32, 18417254355718160513u128);
    apply_multiplier!(64, 18387811781193591352u128);
    apply_multiplier!(128, 18329067761203520168u128);
    apply_multiplier!(256, 18212142134806087854u128);
    apply_multiplier!(512, 17980523815641551639u128);
    apply_multiplier!(1024, 17526086738831147013u128);
    apply_multiplier!(2048, 16651378430235024244u128);
    apply_multiplier!(4096, 15030750278693429944u128);
    apply_multiplier!(8192, 12247334978882834399u128);
    apply_multiplier!(16384, 8131365268884726200u128);
    apply_multiplier!(32768, 3584323654723342297u128);
    apply_multiplier!(65536, 696457651847595233u128);
    apply_multiplier!(131072, 26294789957452057u128);
    apply_multiplier!(262144, 37481735321082u128);

    U256::from(ratio)
}

/// Returns the greatest tick whose sqrt price is `<= sqrt_price_x64`.
///
/// The input must lie in `[MIN_SQRT_PRICE, MAX_SQRT_PRICE]` (both
/// inclusive). The log2 is taken with 14 fractional bits and mapped to
/// base 1.0001 with asymmetric error margins; when the resulting bracket
/// is wider than one tick the upper candidate wins iff its own price does
/// not exceed the input.
pub fn sqrt_price_x64_to_tick_index(sqrt_price_x64: U256) -> Result<i32, StateError> {
    if sqrt_price_x64 < MIN_SQRT_PRICE || sqrt_price_x64 > MAX_SQRT_PRICE {
        return Err(StateError::InvalidSqrtPrice);
    }

    let msb = most_significant_bit(sqrt_price_x64).map_err(|_| StateError::InvalidSqrtPrice)? as u32;
    let limbs = sqrt_price_x64.as_limbs();
    let sqrt_price = ((limbs[1] as u128) << 64) | limbs[0] as u128;

    let log2p_integer_x32 = (msb as i128 - 64) << 32;

    // normalize so the leading bit sits at position 63
    let mut r = if msb >= 64 {
        sqrt_price >> (msb - 63)
    } else {
        sqrt_price << (63 - msb)
    };
    let mut log2p_fraction_x64: i128 = 0;

    macro_rules! log2_step {
        ($shift:expr) => {{
            r *= r;
            let is_r_more_than_two = (r >> 127) as u32;
            r >>= 63 + is_r_more_than_two;
            log2p_fraction_x64 += ((1u128 << $shift) as i128) * is_r_more_than_two as i128;
        }};
    }

    log2_step!(63);
    log2_step!(62);
    log2_step!(61);
    log2_step!(60);
    log2_step!(59);
    log2_step!(58);
    log2_step!(57);
    log2_step!(56);
    log2_step!(55);
    log2_step!(54);
    log2_step!(53);
    log2_step!(52);
    log2_step!(51);

    // last bit, `r` is not read again
    r *= r;
    log2p_fraction_x64 += ((1u128 << 50) as i128) * (r >> 127) as i128;

    let log2p_x32 = log2p_integer_x32 + (log2p_fraction_x64 >> 32);
    let logbp_x64 = log2p_x32 * LOG_B_2_X32;

    let tick_low = ((logbp_x64 - LOG_B_P_ERR_MARGIN_LOWER_X64) >> 64) as i32;
    let tick_high = ((logbp_x64 + LOG_B_P_ERR_MARGIN_UPPER_X64) >> 64) as i32;

    Ok(if tick_low == tick_high {
        tick_low
    } else if tick_index_to_sqrt_price_x64(tick_high)? <= sqrt_price_x64 {
        tick_high
    } else {
        tick_low
    })
}

/// Lossy conversion of a Q64.64 value to `f64`.
pub(crate) fn x64_to_f64(value: U256) -> f64 {
    let limbs = value.as_limbs();
    let mut acc = 0f64;
    for limb in limbs.iter().rev() {
        acc = acc * 18446744073709551616f64 + *limb as f64;
    }
    acc / 18446744073709551616f64
}

#[inline]
fn decimals_scale(price: f64, decimals_a: u8, decimals_b: u8) -> f64 {
    // dividing by an exact power of ten keeps `1000 * 10^-3 == 1`
    if decimals_b >= decimals_a {
        price * 10f64.powi((decimals_b - decimals_a) as i32)
    } else {
        price / 10f64.powi((decimals_a - decimals_b) as i32)
    }
}

/// Converts a human price of coin A in units of coin B to a Q64.64 sqrt price.
pub fn price_to_sqrt_price_x64(price: f64, decimals_a: u8, decimals_b: u8) -> Result<U256, StateError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(StateError::InvalidPrice);
    }
    let sqrt = decimals_scale(price, decimals_a, decimals_b).sqrt() * 18446744073709551616f64;
    // `as u128` saturates, so anything at or above 2^128 is rejected first
    if !sqrt.is_finite() || sqrt >= 340282366920938463463374607431768211456f64 {
        return Err(StateError::InvalidPrice);
    }
    let sqrt_price = U256::from(sqrt as u128);
    if sqrt_price < MIN_SQRT_PRICE || sqrt_price > MAX_SQRT_PRICE {
        return Err(StateError::InvalidPrice);
    }
    Ok(sqrt_price)
}

/// Converts a Q64.64 sqrt price back to a human price of coin A in coin B.
pub fn sqrt_price_x64_to_price(sqrt_price_x64: U256, decimals_a: u8, decimals_b: u8) -> f64 {
    let sqrt = x64_to_f64(sqrt_price_x64);
    // inverse of `decimals_scale`
    decimals_scale(sqrt * sqrt, decimals_b, decimals_a)
}

pub fn tick_index_to_price(tick: i32, decimals_a: u8, decimals_b: u8) -> Result<f64, StateError> {
    Ok(sqrt_price_x64_to_price(
        tick_index_to_sqrt_price_x64(tick)?,
        decimals_a,
        decimals_b,
    ))
}

pub fn price_to_tick_index(price: f64, decimals_a: u8, decimals_b: u8) -> Result<i32, StateError> {
    sqrt_price_x64_to_tick_index(price_to_sqrt_price_x64(price, decimals_a, decimals_b)?)
}

#[inline]
fn spacing(tick_spacing: u16) -> Result<i32, StateError> {
    if tick_spacing == 0 {
        return Err(StateError::InvalidTickSpacing);
    }
    Ok(tick_spacing as i32)
}

/// Aligns `tick` to a multiple of `tick_spacing`, truncating toward zero.
pub fn get_initializable_tick_index(tick: i32, tick_spacing: u16) -> Result<i32, StateError> {
    let spacing = spacing(tick_spacing)?;
    Ok(tick - tick % spacing)
}

pub fn get_next_initializable_tick_index(tick: i32, tick_spacing: u16) -> Result<i32, StateError> {
    get_initializable_tick_index(tick, tick_spacing)?
        .checked_add(tick_spacing as i32)
        .ok_or(StateError::InvalidTickIndex)
}

pub fn get_prev_initializable_tick_index(tick: i32, tick_spacing: u16) -> Result<i32, StateError> {
    get_initializable_tick_index(tick, tick_spacing)?
        .checked_sub(tick_spacing as i32)
        .ok_or(StateError::InvalidTickIndex)
}

/// Lowest tick usable with `tick_spacing`.
pub fn get_min_tick_index(tick_spacing: u16) -> Result<i32, StateError> {
    let spacing = spacing(tick_spacing)?;
    Ok(MIN_TICK_INDEX + (-MIN_TICK_INDEX) % spacing)
}

/// Highest tick usable with `tick_spacing`.
pub fn get_max_tick_index(tick_spacing: u16) -> Result<i32, StateError> {
    let spacing = spacing(tick_spacing)?;
    Ok(MAX_TICK_INDEX - MAX_TICK_INDEX % spacing)
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    #[test]
    fn test_tick_index_to_sqrt_price_bounds() {
        assert_eq!(
            tick_index_to_sqrt_price_x64(MAX_TICK_INDEX).unwrap(),
            MAX_SQRT_PRICE,
            "sqrt price at max tick incorrect"
        );
        assert_eq!(
            tick_index_to_sqrt_price_x64(MIN_TICK_INDEX).unwrap(),
            MIN_SQRT_PRICE,
            "sqrt price at min tick incorrect"
        );

        // beyond the ladder
        assert!(matches!(
            tick_index_to_sqrt_price_x64(524288),
            Err(StateError::InvalidTickIndex)
        ));
        assert!(matches!(
            tick_index_to_sqrt_price_x64(-524288),
            Err(StateError::InvalidTickIndex)
        ));
        assert!(tick_index_to_sqrt_price_x64(524287).is_ok());
        assert!(tick_index_to_sqrt_price_x64(-524287).is_ok());
    }

    #[test]
    fn test_tick_index_to_sqrt_price_values() {
        assert_eq!(
            tick_index_to_sqrt_price_x64(0).unwrap(),
            U256::from(18446744073709551616u128)
        );
        assert_eq!(
            tick_index_to_sqrt_price_x64(1).unwrap(),
            U256::from(18447666387855959850u128)
        );
        assert_eq!(
            tick_index_to_sqrt_price_x64(-1).unwrap(),
            U256::from(18445821805675392311u128)
        );
        assert_eq!(
            tick_index_to_sqrt_price_x64(60).unwrap(),
            U256::from(18502164624211761447u128)
        );
        assert_eq!(
            tick_index_to_sqrt_price_x64(-60).unwrap(),
            U256::from(18391489527427947879u128)
        );
        assert_eq!(
            tick_index_to_sqrt_price_x64(100).unwrap(),
            U256::from(18539204128674405812u128)
        );
        assert_eq!(
            tick_index_to_sqrt_price_x64(-100).unwrap(),
            U256::from(18354745142194483561u128)
        );
        assert_eq!(
            tick_index_to_sqrt_price_x64(443637).unwrap(),
            U256::from_str("79230634750048659519832782522").unwrap()
        );
        assert_eq!(
            tick_index_to_sqrt_price_x64(-443637).unwrap(),
            U256::from(4294833280u64)
        );
    }

    #[test]
    fn test_sqrt_price_to_tick_index() {
        // inclusive bounds
        assert_eq!(sqrt_price_x64_to_tick_index(MIN_SQRT_PRICE).unwrap(), MIN_TICK_INDEX);
        assert_eq!(sqrt_price_x64_to_tick_index(MAX_SQRT_PRICE).unwrap(), MAX_TICK_INDEX);

        let result = sqrt_price_x64_to_tick_index(MIN_SQRT_PRICE - U256::ONE);
        assert!(matches!(result, Err(StateError::InvalidSqrtPrice)));
        let result = sqrt_price_x64_to_tick_index(MAX_SQRT_PRICE + U256::ONE);
        assert!(matches!(result, Err(StateError::InvalidSqrtPrice)));

        // one tick past either bound
        let above = tick_index_to_sqrt_price_x64(MAX_TICK_INDEX + 1).unwrap();
        assert!(matches!(
            sqrt_price_x64_to_tick_index(above),
            Err(StateError::InvalidSqrtPrice)
        ));
        let below = tick_index_to_sqrt_price_x64(MIN_TICK_INDEX - 1).unwrap();
        assert!(matches!(
            sqrt_price_x64_to_tick_index(below),
            Err(StateError::InvalidSqrtPrice)
        ));
    }

    #[test]
    fn test_sqrt_price_between_ticks_rounds_down() {
        let p100 = tick_index_to_sqrt_price_x64(100).unwrap();
        assert_eq!(sqrt_price_x64_to_tick_index(p100 - U256::ONE).unwrap(), 99);
        assert_eq!(sqrt_price_x64_to_tick_index(p100 + U256::ONE).unwrap(), 100);

        let m100 = tick_index_to_sqrt_price_x64(-100).unwrap();
        assert_eq!(sqrt_price_x64_to_tick_index(m100 - U256::ONE).unwrap(), -101);
    }

    #[test]
    fn test_price_conversions() {
        assert_eq!(price_to_sqrt_price_x64(1.0, 6, 6).unwrap(), U256::from(1u128 << 64));
        assert_eq!(price_to_tick_index(1000.0, 9, 6).unwrap(), 0);
        assert_eq!(price_to_tick_index(2.0, 0, 0).unwrap(), 6931);
        assert_eq!(price_to_tick_index(0.5, 0, 0).unwrap(), -6932);

        let price = tick_index_to_price(0, 6, 6).unwrap();
        assert!((price - 1.0).abs() < 1e-12);
        let price = tick_index_to_price(6931, 0, 0).unwrap();
        assert!((price - 2.0).abs() < 1e-3);

        assert!(matches!(
            price_to_sqrt_price_x64(0.0, 6, 6),
            Err(StateError::InvalidPrice)
        ));
        assert!(matches!(
            price_to_sqrt_price_x64(f64::NAN, 6, 6),
            Err(StateError::InvalidPrice)
        ));
    }

    #[test]
    fn test_price_outside_sqrt_price_range() {
        // sqrt(1e60) * 2^64 does not fit in 128 bits
        assert!(matches!(
            price_to_sqrt_price_x64(1e60, 6, 6),
            Err(StateError::InvalidPrice)
        ));
        assert!(matches!(
            price_to_tick_index(1e60, 0, 0),
            Err(StateError::InvalidPrice)
        ));
        // fits in 128 bits but lies above the max sqrt price
        assert!(matches!(
            price_to_sqrt_price_x64(1e30, 0, 0),
            Err(StateError::InvalidPrice)
        ));
        assert!(matches!(
            price_to_sqrt_price_x64(1e-40, 0, 0),
            Err(StateError::InvalidPrice)
        ));
        // decimals push an in-range price out of range
        assert!(matches!(
            price_to_sqrt_price_x64(1e10, 0, 18),
            Err(StateError::InvalidPrice)
        ));

        assert!(price_to_sqrt_price_x64(1e10, 0, 0).is_ok());
        let near_max = price_to_sqrt_price_x64(1e18, 0, 0).unwrap();
        assert!(near_max <= MAX_SQRT_PRICE);
    }

    #[test]
    fn test_initializable_tick_helpers() {
        assert_eq!(get_initializable_tick_index(125, 60).unwrap(), 120);
        assert_eq!(get_initializable_tick_index(-125, 60).unwrap(), -120);
        assert_eq!(get_next_initializable_tick_index(125, 60).unwrap(), 180);
        assert_eq!(get_prev_initializable_tick_index(125, 60).unwrap(), 60);
        assert_eq!(get_prev_initializable_tick_index(-125, 60).unwrap(), -180);

        assert_eq!(get_min_tick_index(60).unwrap(), -443580);
        assert_eq!(get_max_tick_index(60).unwrap(), 443580);
        assert_eq!(get_min_tick_index(1).unwrap(), MIN_TICK_INDEX);
        assert_eq!(get_max_tick_index(1).unwrap(), MAX_TICK_INDEX);

        assert!(matches!(
            get_initializable_tick_index(10, 0),
            Err(StateError::InvalidTickSpacing)
        ));
    }

    #[test]
    fn test_initializable_tick_helpers_at_i32_limits() {
        assert!(matches!(
            get_next_initializable_tick_index(i32::MAX, 1),
            Err(StateError::InvalidTickIndex)
        ));
        assert!(matches!(
            get_prev_initializable_tick_index(i32::MIN, 1),
            Err(StateError::InvalidTickIndex)
        ));
        // 2147483640 is the last multiple of 60 and still has no successor
        assert!(matches!(
            get_next_initializable_tick_index(i32::MAX - 1, 60),
            Err(StateError::InvalidTickIndex)
        ));
        assert_eq!(
            get_prev_initializable_tick_index(i32::MAX, 60).unwrap(),
            2147483640 - 60
        );
    }

    proptest! {
        #[test]
        fn tick_round_trip(tick in MIN_TICK_INDEX..=MAX_TICK_INDEX) {
            let sqrt_price = tick_index_to_sqrt_price_x64(tick).unwrap();
            prop_assert_eq!(sqrt_price_x64_to_tick_index(sqrt_price).unwrap(), tick);
        }

        #[test]
        fn sqrt_price_strictly_increasing(tick in MIN_TICK_INDEX..MAX_TICK_INDEX) {
            let lo = tick_index_to_sqrt_price_x64(tick).unwrap();
            let hi = tick_index_to_sqrt_price_x64(tick + 1).unwrap();
            prop_assert!(lo < hi);
        }
    }
}
