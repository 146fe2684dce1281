//! Fixed-point arithmetic used by every interpolation kernel.
//!
//! All kernels multiply through a double-width intermediate: both operands are widened to 64
//! bits, multiplied, then shifted back down. No precision is lost before the shift, which is what
//! keeps the 8, 16 and 24-bit variants bit-exact with each other at their respective scales.

use num_rational::Ratio;

use crate::common::SampleRate;
use crate::constants::{MAX_STEP, SUBPOS_ONE};

/// Multiplies `a` by `b` in 64 bits and shifts the product right by `shift`.
///
/// The shift is arithmetic, so results round towards negative infinity.
#[inline(always)]
pub fn mul_shr(a: i32, b: i32, shift: u32) -> i32 {
    ((a as i64 * b as i64) >> shift) as i32
}

/// `a * b >> 16`: scales by a 16-bit fraction such as a position fraction or a volume.
#[inline(always)]
pub fn mul_scale(a: i32, b: i32) -> i32 {
    mul_shr(a, b, 16)
}

/// `a * b >> 8`: used by 16-bit linear interpolation to land on the 24-bit working scale.
#[inline(always)]
pub fn mul_scale16(a: i32, b: i32) -> i32 {
    mul_shr(a, b, 8)
}

/// `a * b >> 32`: combines two 24-bit fixed-point ramp values into a 16-bit volume.
#[inline(always)]
pub fn mul_scale_volume(a: i32, b: i32) -> i32 {
    mul_shr(a, b, 32)
}

/// Converts a floating point delta into a fixed-point position step.
///
/// Only the magnitude is kept; direction is handled by the caller. The step is capped at
/// [`MAX_STEP`] so adding it to a position fraction cannot overflow.
#[inline]
pub fn step_from_delta(delta: f64) -> i64 {
    if !delta.is_finite() {
        return 0;
    }
    ((delta.abs() * SUBPOS_ONE as f64 + 0.5) as i64).min(MAX_STEP)
}

/// Returns the delta that plays a source recorded at `source_rate` at `output_rate`.
///
/// The ratio is reduced before the division, so common rate pairs such as 44.1 kHz to 48 kHz
/// convert without accumulating error. Returns `0.0` when `output_rate` is zero.
pub fn delta_for_rates(source_rate: SampleRate, output_rate: SampleRate) -> f64 {
    if output_rate == 0 {
        return 0.0;
    }
    let (numer, denom) = Ratio::new(source_rate, output_rate).into_raw();
    numer as f64 / denom as f64
}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck::{quickcheck, TestResult};

    #[test]
    fn shifts_floor_towards_negative_infinity() {
        assert_eq!(mul_scale(-1, 1), -1);
        assert_eq!(mul_scale(1, 1), 0);
        assert_eq!(mul_scale16(-3, 0x80), -2);
    }

    #[test]
    fn wide_products_do_not_truncate() {
        // 2^23 * 2^16 overflows 32 bits but the widened product survives.
        assert_eq!(mul_scale(1 << 23, 1 << 16), 1 << 23);
        assert_eq!(mul_scale_volume(1 << 24, 1 << 24), 1 << 16);
    }

    #[test]
    fn step_rounds_to_nearest() {
        assert_eq!(step_from_delta(0.5), 32768);
        assert_eq!(step_from_delta(-2.0), 131072);
        assert_eq!(step_from_delta(f64::NAN), 0);
    }

    #[test]
    fn huge_deltas_cap_the_step() {
        assert_eq!(step_from_delta(1e15), MAX_STEP);
        assert_eq!(step_from_delta(-f64::MAX), MAX_STEP);
        assert!(MAX_STEP.checked_add(SUBPOS_ONE).is_some());
    }

    #[test]
    fn rates_reduce_before_division() {
        assert_eq!(delta_for_rates(22_050, 44_100), 0.5);
        assert_eq!(delta_for_rates(48_000, 48_000), 1.0);
        assert_eq!(delta_for_rates(44_100, 0), 0.0);
    }

    quickcheck! {
        fn mul_scale_matches_reference(a: i32, b: u16) -> TestResult {
            // keep operands on the scales the kernels use
            let a = a >> 7;
            let reference = (a as f64 * b as f64 / 65536.0).floor();
            TestResult::from_bool(mul_scale(a, b as i32) as f64 == reference)
        }

        fn mul_shr_is_exact_for_powers_of_two(a: i16, shift: u8) -> TestResult {
            let shift = (shift % 16) as u32;
            TestResult::from_bool(mul_shr(a as i32, 1 << shift, shift) == a as i32)
        }
    }
}
