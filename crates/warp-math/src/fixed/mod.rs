// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic binary fixed-point scalars.
//!
//! `FixedPoint<S, FRAC>` stores one raw integer `S` and represents
//! `raw / 2^FRAC`. The integer part gets `S::BITS - FRAC` bits. Every
//! operation is pure integer arithmetic, so results are identical on every
//! platform and every SIMD backend.
//!
//! Policy summary:
//! - `+`, `-`, unary `-` wrap like the raw integer (no saturation).
//! - `*` forms the exact product at double width and floors it back to
//!   `FRAC` fractional bits.
//! - `/` shifts the dividend left by `FRAC` at double width and truncates
//!   toward zero. A zero divisor panics; quotient overflow wraps silently.
//!   [`FixedPoint::checked_div`] reports both conditions instead.
//! - Float conversion truncates toward zero, maps NaN to zero and saturates
//!   out-of-range inputs.

mod ops;
mod store;

pub use store::{SignedStore, Store, MIN_FRAC};

use crate::error::MathError;

/// Binary fixed-point number with `FRAC` fractional bits over store `S`.
///
/// `FRAC` must lie in `2..=S::MAX_FRAC`; violating that fails to compile as
/// soon as a value of the type is constructed.
///
/// # Examples
/// ```
/// use warp_math::fixed::Fx32;
/// let a = Fx32::<16>::from_int(3);
/// let b = Fx32::<16>::from_int(2);
/// assert_eq!((a / b).to_f32(), 1.5);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[repr(transparent)]
pub struct FixedPoint<S: Store, const FRAC: u32> {
    raw: S,
}

/// Signed 32-bit store.
pub type Fx32<const FRAC: u32> = FixedPoint<i32, FRAC>;
/// Unsigned 32-bit store.
pub type UFx32<const FRAC: u32> = FixedPoint<u32, FRAC>;
/// Signed 64-bit store.
pub type Fx64<const FRAC: u32> = FixedPoint<i64, FRAC>;
/// Unsigned 64-bit store.
pub type UFx64<const FRAC: u32> = FixedPoint<u64, FRAC>;
/// Q16.16.
pub type Q16_16 = Fx32<16>;
/// Q32.32, the layout Echo payloads use on the wire.
pub type Q32_32 = Fx64<32>;

/// `2^exp` as an exact `f64` for `-1022 <= exp <= 1023`.
#[allow(clippy::cast_sign_loss)]
fn pow2(exp: i32) -> f64 {
    f64::from_bits(((1023 + exp) as u64) << 52)
}

impl<S: Store, const FRAC: u32> FixedPoint<S, FRAC> {
    const VALID: () = assert!(
        FRAC >= MIN_FRAC && FRAC <= S::MAX_FRAC,
        "fractional bit count out of range for this store"
    );

    /// Number of fractional bits.
    pub const FRAC_BITS: u32 = FRAC;
    /// Number of integer bits (`S::BITS - FRAC`, sign bit included).
    pub const INT_BITS: u32 = S::BITS - FRAC;

    /// Wraps a raw scaled integer.
    pub const fn from_raw(raw: S) -> Self {
        let () = Self::VALID;
        Self { raw }
    }

    /// Raw scaled integer.
    pub const fn raw(self) -> S {
        self.raw
    }

    /// Zero.
    pub fn zero() -> Self {
        Self::from_raw(S::ZERO)
    }

    /// One (wraps if the integer part cannot hold 1).
    pub fn one() -> Self {
        Self::from_raw(S::wrap_i128(1_i128 << FRAC))
    }

    /// Smallest positive value (`raw == 1`).
    pub fn epsilon() -> Self {
        Self::from_raw(S::wrap_i128(1))
    }

    /// Most negative (or zero, unsigned) representable value.
    pub fn min_value() -> Self {
        Self::from_raw(S::MIN)
    }

    /// Largest representable value.
    pub fn max_value() -> Self {
        Self::from_raw(S::MAX)
    }

    /// Integer value `n` (wraps when `n` exceeds the integer range).
    pub fn from_int(n: S) -> Self {
        Self::from_raw(S::wrap_i128(n.to_i128() << FRAC))
    }

    fn frac_mask() -> i128 {
        (1_i128 << FRAC) - 1
    }

    /// Integer part, truncated toward zero.
    ///
    /// Negative values shift their magnitude and re-negate, so `-1.5` yields
    /// `-1` where an arithmetic shift would give `-2`.
    pub fn integer_part(self) -> S {
        let raw = self.raw.to_i128();
        let int = if raw < 0 { -((-raw) >> FRAC) } else { raw >> FRAC };
        S::wrap_i128(int)
    }

    /// Fractional part as a raw scaled value carrying the sign of `self`.
    ///
    /// `from_int(integer_part) + from_raw(fractional_part) == self`.
    pub fn fractional_part(self) -> S {
        let raw = self.raw.to_i128();
        let frac = if raw < 0 {
            -((-raw) & Self::frac_mask())
        } else {
            raw & Self::frac_mask()
        };
        S::wrap_i128(frac)
    }

    /// Converts to `f64` as `integer_part + fractional_part × 2^-FRAC`.
    #[allow(clippy::cast_possible_wrap)]
    pub fn to_f64(self) -> f64 {
        self.integer_part().to_f64() + self.fractional_part().to_f64() * pow2(-(FRAC as i32))
    }

    /// Converts to `f32` through [`Self::to_f64`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }

    /// Converts from `f64`, truncating toward zero.
    ///
    /// NaN maps to zero; values beyond the store range saturate.
    #[allow(clippy::cast_possible_wrap)]
    pub fn from_f64(value: f64) -> Self {
        Self::from_raw(S::saturating_from_f64(value * pow2(FRAC as i32)))
    }

    /// Converts from `f32`; see [`Self::from_f64`].
    pub fn from_f32(value: f32) -> Self {
        Self::from_f64(f64::from(value))
    }

    /// Re-encodes into another store and fractional-bit count.
    ///
    /// Reducing `FRAC` shifts the magnitude right and so truncates toward
    /// zero. Increasing it shifts left. The result wraps into the target
    /// store.
    pub fn convert<S2: Store, const F2: u32>(self) -> FixedPoint<S2, F2> {
        let raw = self.raw.to_i128();
        let shifted = if F2 >= FRAC {
            raw << (F2 - FRAC)
        } else if raw < 0 {
            -((-raw) >> (FRAC - F2))
        } else {
            raw >> (FRAC - F2)
        };
        FixedPoint::from_raw(S2::wrap_i128(shifted))
    }

    /// Largest integral value not above `self`.
    pub fn floor(self) -> Self {
        Self::from_raw(S::wrap_i128(self.raw.to_i128() & !Self::frac_mask()))
    }

    /// Smallest integral value not below `self` (wraps at the top of the range).
    pub fn ceil(self) -> Self {
        let mask = Self::frac_mask();
        let raw = S::wrap_i128(self.raw.to_i128() + mask).to_i128();
        Self::from_raw(S::wrap_i128(raw & !mask))
    }

    /// Nearest integral value, halfway cases away from zero.
    pub fn round(self) -> Self {
        let raw = self.raw.to_i128();
        let half = 1_i128 << (FRAC - 1);
        let magnitude = (raw.abs() + half) & !Self::frac_mask();
        Self::from_raw(S::wrap_i128(if raw < 0 { -magnitude } else { magnitude }))
    }

    /// `-1`, `0` or `1` matching the sign of `self`.
    pub fn signum(self) -> Self {
        let raw = self.raw.to_i128();
        Self::from_raw(S::wrap_i128(raw.signum() << FRAC))
    }

    /// Square root on the widened raw value; negative inputs yield zero.
    pub fn sqrt(self) -> Self {
        let raw = self.raw.to_i128();
        if raw <= 0 {
            return Self::zero();
        }
        // raw < 2^64 and FRAC < 64, so the radicand fits in u128.
        #[allow(clippy::cast_sign_loss)]
        let radicand = (raw as u128) << FRAC;
        #[allow(clippy::cast_possible_wrap)]
        let root = isqrt(radicand) as i128;
        Self::from_raw(S::wrap_i128(root))
    }

    /// Multiplication that reports results outside the store range.
    pub fn checked_mul(self, rhs: Self) -> Result<Self, MathError> {
        match S::mul_floor(self.raw, rhs.raw, FRAC) {
            (raw, false) => Ok(Self::from_raw(raw)),
            (_, true) => {
                tracing::trace!(lhs = %self, rhs = %rhs, "fixed-point multiply overflow");
                Err(MathError::Overflow { bits: S::BITS })
            }
        }
    }

    /// Division that reports a zero divisor or a quotient outside the store.
    pub fn checked_div(self, rhs: Self) -> Result<Self, MathError> {
        match S::div_trunc(self.raw, rhs.raw, FRAC) {
            Ok((raw, false)) => Ok(Self::from_raw(raw)),
            Ok((_, true)) => {
                tracing::trace!(lhs = %self, rhs = %rhs, "fixed-point divide overflow");
                Err(MathError::Overflow { bits: S::BITS })
            }
            Err(err) => {
                tracing::trace!(lhs = %self, "fixed-point divide by zero");
                Err(err)
            }
        }
    }

    /// Division that wraps on quotient overflow and yields zero for a zero
    /// divisor. Vector lanes use this so padding lanes never trap.
    pub fn wrapping_div(self, rhs: Self) -> Self {
        S::div_trunc(self.raw, rhs.raw, FRAC)
            .map_or_else(|_| Self::zero(), |(raw, _)| Self::from_raw(raw))
    }
}

impl<S: SignedStore, const FRAC: u32> FixedPoint<S, FRAC> {
    /// Absolute value (wraps at the most negative value).
    pub fn abs(self) -> Self {
        let raw = self.raw.to_i128();
        Self::from_raw(S::wrap_i128(raw.abs()))
    }
}

/// Integer square root (floor) by the digit-by-digit method.
fn isqrt(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    let mut remainder = n;
    let mut root = 0_u128;
    let mut bit = 1_u128 << ((127 - n.leading_zeros()) & !1);
    while bit != 0 {
        if remainder >= root + bit {
            remainder -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }
    root
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    type F16 = Fx32<16>;

    #[test]
    fn three_over_two_is_one_and_a_half() {
        let q = F16::from_int(3) / F16::from_int(2);
        assert_eq!(q.to_f32(), 1.5);
    }

    #[test]
    fn integer_and_fractional_parts_truncate_toward_zero() {
        let v = F16::from_f64(-1.5);
        assert_eq!(v.integer_part(), -1);
        assert_eq!(v.fractional_part(), -(1 << 15));
        assert_eq!(v.to_f64(), -1.5);
        let w = F16::from_f64(2.25);
        assert_eq!(w.integer_part(), 2);
        assert_eq!(w.fractional_part(), 1 << 14);
    }

    #[test]
    fn float_conversion_policy() {
        assert_eq!(F16::from_f64(f64::NAN).raw(), 0);
        assert_eq!(F16::from_f64(f64::INFINITY).raw(), i32::MAX);
        assert_eq!(F16::from_f64(f64::NEG_INFINITY).raw(), i32::MIN);
        // Truncation toward zero at the last fractional bit.
        let tiny = 1.0 / 65536.0;
        assert_eq!(F16::from_f64(tiny * 1.9).raw(), 1);
        assert_eq!(F16::from_f64(-tiny * 1.9).raw(), -1);
    }

    #[test]
    fn rounding_family() {
        let cases = [
            (2.5, 2.0, 3.0, 3.0),
            (-2.5, -3.0, -2.0, -3.0),
            (-2.25, -3.0, -2.0, -2.0),
            (0.75, 0.0, 1.0, 1.0),
            (4.0, 4.0, 4.0, 4.0),
        ];
        for &(x, floor, ceil, round) in &cases {
            let v = F16::from_f64(x);
            assert_eq!(v.floor().to_f64(), floor, "floor({x})");
            assert_eq!(v.ceil().to_f64(), ceil, "ceil({x})");
            assert_eq!(v.round().to_f64(), round, "round({x})");
        }
    }

    #[test]
    fn sqrt_of_perfect_squares_is_exact() {
        assert_eq!(F16::from_int(9).sqrt(), F16::from_int(3));
        assert_eq!(Fx64::<32>::from_int(16).sqrt(), Fx64::<32>::from_int(4));
        assert_eq!(F16::from_int(-4).sqrt(), F16::zero());
        let half = F16::from_f64(0.25).sqrt();
        assert_eq!(half.to_f64(), 0.5);
    }

    #[test]
    fn checked_division_reports_errors() {
        assert_eq!(
            F16::one().checked_div(F16::zero()),
            Err(MathError::DivisionByZero)
        );
        assert_eq!(
            F16::from_int(20_000).checked_div(F16::from_f64(0.25)),
            Err(MathError::Overflow { bits: 32 })
        );
        assert_eq!(F16::one().wrapping_div(F16::zero()), F16::zero());
    }

    #[test]
    fn checked_multiply_reports_overflow() {
        let big = F16::from_int(30_000);
        assert_eq!(big.checked_mul(big), Err(MathError::Overflow { bits: 32 }));
        assert_eq!(
            F16::from_int(3).checked_mul(F16::from_f64(-0.5)).unwrap(),
            F16::from_f64(-1.5)
        );
    }

    #[test]
    fn convert_changes_precision_by_shifting() {
        let v = Fx32::<16>::from_f64(-1.999);
        let narrow: Fx32<8> = v.convert();
        assert_eq!(narrow.raw(), -((1999 * 65536 / 1000) >> 8));
        let wide: Fx64<32> = v.convert();
        assert_eq!(wide.raw(), i64::from(v.raw()) << 16);
    }

    #[test]
    fn isqrt_matches_float_sqrt_on_small_inputs() {
        for n in 0_u128..2000 {
            let r = isqrt(n);
            assert!(r * r <= n && (r + 1) * (r + 1) > n, "isqrt({n}) = {r}");
        }
    }
}
