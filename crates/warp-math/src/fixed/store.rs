// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Raw integer stores backing [`super::FixedPoint`].
//!
//! A store knows its width, signedness and how to perform the widened
//! multiply/divide for that width. 32-bit stores promote to native 64-bit
//! integers; 64-bit stores promote through [`FixedWide`] (limb-pair
//! `WideUint128` by default, native `u128` with the `native-u128` feature).

use core::fmt;
use core::hash::Hash;

use crate::error::MathError;
use crate::wide::{FixedWide, Wide};

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for i64 {}
    impl Sealed for u64 {}
}

/// Smallest fractional-bit count any store accepts.
pub const MIN_FRAC: u32 = 2;

/// Integer type usable as the raw store of a fixed-point number.
///
/// Sealed: implemented for `i32`, `u32`, `i64` and `u64` only.
///
/// The `mul_floor`/`div_trunc` pair returns the wrapped result together with
/// an overflow flag so both the silent operators and the checked methods can
/// share one implementation.
pub trait Store:
    sealed::Sealed + Copy + Eq + Ord + Hash + Default + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Width in bits.
    const BITS: u32;
    /// Whether the store is two's-complement signed.
    const SIGNED: bool;
    /// Largest fractional-bit count: `BITS - 2` signed, `BITS - 1` unsigned.
    const MAX_FRAC: u32;
    /// Zero.
    const ZERO: Self;
    /// Smallest raw value.
    const MIN: Self;
    /// Largest raw value.
    const MAX: Self;

    /// Lossless widening (every store fits in `i128`).
    fn to_i128(self) -> i128;
    /// Narrowing that keeps the low `BITS` bits.
    fn wrap_i128(value: i128) -> Self;
    /// Narrowing that fails when `value` is out of range.
    fn checked_i128(value: i128) -> Option<Self>;
    /// Truncating float conversion: NaN → 0, out of range saturates.
    fn saturating_from_f64(value: f64) -> Self;
    /// Nearest-float conversion of the raw integer.
    fn to_f64(self) -> f64;
    /// Wrapping addition.
    fn wrapping_add(self, rhs: Self) -> Self;
    /// Wrapping subtraction.
    fn wrapping_sub(self, rhs: Self) -> Self;
    /// Wrapping negation.
    fn wrapping_neg(self) -> Self;

    /// `floor(a × b / 2^frac)` computed at double width, then wrapped.
    fn mul_floor(a: Self, b: Self, frac: u32) -> (Self, bool);

    /// `(a × 2^frac) / b` truncated toward zero, then wrapped.
    fn div_trunc(a: Self, b: Self, frac: u32) -> Result<(Self, bool), MathError>;
}

/// Two's-complement stores. Only signed fixed-point types form vector
/// elements, because vector arithmetic needs negation.
pub trait SignedStore: Store {}

impl SignedStore for i32 {}
impl SignedStore for i64 {}

macro_rules! common_store_items {
    ($t:ty, $signed:expr) => {
        const BITS: u32 = <$t>::BITS;
        const SIGNED: bool = $signed;
        const MAX_FRAC: u32 = if $signed { <$t>::BITS - 2 } else { <$t>::BITS - 1 };
        const ZERO: Self = 0;
        const MIN: Self = <$t>::MIN;
        const MAX: Self = <$t>::MAX;

        fn to_i128(self) -> i128 {
            i128::from(self)
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        fn wrap_i128(value: i128) -> Self {
            value as $t
        }

        fn checked_i128(value: i128) -> Option<Self> {
            <$t>::try_from(value).ok()
        }

        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        fn saturating_from_f64(value: f64) -> Self {
            // `as` from float truncates toward zero, saturates, and maps NaN to 0.
            value as $t
        }

        #[allow(clippy::cast_precision_loss)]
        fn to_f64(self) -> f64 {
            self as f64
        }

        fn wrapping_add(self, rhs: Self) -> Self {
            <$t>::wrapping_add(self, rhs)
        }

        fn wrapping_sub(self, rhs: Self) -> Self {
            <$t>::wrapping_sub(self, rhs)
        }

        fn wrapping_neg(self) -> Self {
            <$t>::wrapping_neg(self)
        }
    };
}

macro_rules! narrow_store {
    ($t:ty, $wide:ty, $signed:expr) => {
        impl Store for $t {
            common_store_items!($t, $signed);

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            fn mul_floor(a: Self, b: Self, frac: u32) -> (Self, bool) {
                // The exact product always fits the doubled width; the
                // arithmetic shift floors.
                let wide = (<$wide>::from(a) * <$wide>::from(b)) >> frac;
                (wide as $t, <$t>::try_from(wide).is_err())
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            fn div_trunc(a: Self, b: Self, frac: u32) -> Result<(Self, bool), MathError> {
                if b == 0 {
                    return Err(MathError::DivisionByZero);
                }
                // frac ≤ BITS - 1 keeps the shifted dividend inside the doubled width.
                let wide = (<$wide>::from(a) << frac) / <$wide>::from(b);
                Ok((wide as $t, <$t>::try_from(wide).is_err()))
            }
        }
    };
}

narrow_store!(i32, i64, true);
narrow_store!(u32, u64, false);

/// Narrows a 128-bit magnitude to `i64`, negating when requested.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn narrow_signed(magnitude: FixedWide, negative: bool) -> (i64, bool) {
    let low = Wide::low(magnitude);
    let limit = if negative { 1_u64 << 63 } else { i64::MAX as u64 };
    let overflow = Wide::high(magnitude) != 0 || low > limit;
    let value = low as i64;
    (if negative { value.wrapping_neg() } else { value }, overflow)
}

impl Store for i64 {
    common_store_items!(i64, true);

    fn mul_floor(a: Self, b: Self, frac: u32) -> (Self, bool) {
        let negative = (a < 0) != (b < 0);
        let magnitude = <FixedWide as Wide>::widening_mul(a.unsigned_abs(), b.unsigned_abs());
        // floor of a negative quotient is minus the ceiling of its magnitude.
        let shifted = if negative {
            Wide::shr(Wide::add_u64(magnitude, (1_u64 << frac) - 1), frac)
        } else {
            Wide::shr(magnitude, frac)
        };
        narrow_signed(shifted, negative)
    }

    fn div_trunc(a: Self, b: Self, frac: u32) -> Result<(Self, bool), MathError> {
        if b == 0 {
            return Err(MathError::DivisionByZero);
        }
        let negative = (a < 0) != (b < 0);
        let dividend = Wide::shl(<FixedWide as Wide>::from_parts(a.unsigned_abs(), 0), frac);
        let (quotient, _) = Wide::div_rem_u64(dividend, b.unsigned_abs())?;
        Ok(narrow_signed(quotient, negative))
    }
}

impl Store for u64 {
    common_store_items!(u64, false);

    fn mul_floor(a: Self, b: Self, frac: u32) -> (Self, bool) {
        let shifted = Wide::shr(<FixedWide as Wide>::widening_mul(a, b), frac);
        (Wide::low(shifted), Wide::high(shifted) != 0)
    }

    fn div_trunc(a: Self, b: Self, frac: u32) -> Result<(Self, bool), MathError> {
        if b == 0 {
            return Err(MathError::DivisionByZero);
        }
        let dividend = Wide::shl(<FixedWide as Wide>::from_parts(a, 0), frac);
        let (quotient, _) = Wide::div_rem_u64(dividend, b)?;
        Ok((Wide::low(quotient), Wide::high(quotient) != 0))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn frac_ranges_follow_signedness() {
        assert_eq!(<i32 as Store>::MAX_FRAC, 30);
        assert_eq!(<u32 as Store>::MAX_FRAC, 31);
        assert_eq!(<i64 as Store>::MAX_FRAC, 62);
        assert_eq!(<u64 as Store>::MAX_FRAC, 63);
    }

    #[test]
    fn wide_mul_floors_like_i128_shift() {
        let cases = [
            (3_i64 << 32, -(5_i64 << 31)),
            (-1, 1),
            (-1, -1),
            (i64::MAX, 2),
            (-(1_i64 << 40), 12345),
            (7, -3),
        ];
        for &(a, b) in &cases {
            for frac in [2_u32, 16, 32, 62] {
                let exact = (i128::from(a) * i128::from(b)) >> frac;
                #[allow(clippy::cast_possible_truncation)]
                let expected = exact as i64;
                let (got, overflow) = i64::mul_floor(a, b, frac);
                assert_eq!(got, expected, "{a} * {b} >> {frac}");
                assert_eq!(overflow, i64::try_from(exact).is_err());
            }
        }
    }

    #[test]
    fn wide_div_truncates_toward_zero() {
        let cases = [(7_i64, 2_i64), (-7, 2), (7, -2), (-7, -2), (i64::MAX, 3), (1, i64::MIN)];
        for &(a, b) in &cases {
            for frac in [2_u32, 32, 62] {
                let exact = (i128::from(a) << frac) / i128::from(b);
                #[allow(clippy::cast_possible_truncation)]
                let expected = exact as i64;
                let (got, overflow) = i64::div_trunc(a, b, frac).unwrap();
                assert_eq!(got, expected, "({a} << {frac}) / {b}");
                assert_eq!(overflow, i64::try_from(exact).is_err());
            }
        }
    }

    #[test]
    fn unsigned_wide_paths_match_u128() {
        let a = 0xDEAD_BEEF_1234_5678_u64;
        let b = 0x0000_0001_8000_0000_u64;
        let product = (u128::from(a) * u128::from(b)) >> 32;
        #[allow(clippy::cast_possible_truncation)]
        let expected = product as u64;
        assert_eq!(u64::mul_floor(a, b, 32), (expected, product > u128::from(u64::MAX)));
        let quotient = (u128::from(a) << 32) / u128::from(b);
        #[allow(clippy::cast_possible_truncation)]
        let expected = quotient as u64;
        assert_eq!(
            u64::div_trunc(a, b, 32).unwrap(),
            (expected, quotient > u128::from(u64::MAX))
        );
    }

    #[test]
    fn zero_divisor_is_reported_for_every_store() {
        assert_eq!(i32::div_trunc(1, 0, 16), Err(MathError::DivisionByZero));
        assert_eq!(u32::div_trunc(1, 0, 16), Err(MathError::DivisionByZero));
        assert_eq!(i64::div_trunc(1, 0, 32), Err(MathError::DivisionByZero));
        assert_eq!(u64::div_trunc(1, 0, 32), Err(MathError::DivisionByZero));
    }
}
