// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scalar element types accepted by the vector kernel.
//!
//! [`Element`] is implemented for `f32`, `f64` and every signed
//! [`FixedPoint`] configuration. It carries the per-type tolerances used by
//! equality and the degenerate-input clamps, plus scalar versions of every
//! lane operation; the portable backend is written entirely in terms of it.
//!
//! Float tolerances:
//!
//! | type | `epsilon_high` | `epsilon_low` | `min_positive` |
//! |---|---|---|---|
//! | `f32` | `1e-5` | `1e-3` | `f32::MIN_POSITIVE` |
//! | `f64` | `1e-12` | `1e-6` | `f64::MIN_POSITIVE` |
//! | fixed | 1 raw unit | `2^-(FRAC - FRAC/2)` | 1 raw unit |
//!
//! A fixed-point element needs at least three integer bits, sign included,
//! so that π is representable: `FRAC <= S::BITS - 3`, i.e. up to `Fx32<29>`
//! and `Fx64<61>`. Narrower integer parts fail to compile once a kernel
//! operation is instantiated for them.
//!
//! ```compile_fail
//! use warp_math::{op, Fx32, Vec3};
//! let x = Vec3::<Fx32<30>>::unit_x();
//! let _ = op::slerp(x, Vec3::unit_y(), Fx32::<30>::from_f64(0.5));
//! ```

use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::fixed::{FixedPoint, SignedStore};
use crate::trig;

/// Numeric type usable as a vector/matrix/quaternion component.
pub trait Element:
    Copy
    + fmt::Debug
    + fmt::Display
    + PartialEq
    + PartialOrd
    + Default
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
{
    /// `true` for IEEE-754 types; `false` for exact fixed-point types.
    const IS_FLOAT: bool;

    /// Additive identity.
    fn zero() -> Self;
    /// Multiplicative identity.
    fn one() -> Self;
    /// Smallest positive value; every clamped divisor is at least this.
    fn min_positive() -> Self;
    /// Tight tolerance: vector equality and cross-backend agreement.
    fn epsilon_high() -> Self;
    /// Loose tolerance: degeneracy thresholds such as slerp's fallback.
    fn epsilon_low() -> Self;

    /// Converts from `f64` (fixed point truncates toward zero).
    fn from_f64(value: f64) -> Self;
    /// Converts to `f64`.
    fn to_f64(self) -> f64;

    /// Absolute value.
    fn abs(self) -> Self;
    /// `+1` or `-1` from the sign bit; `sign(+0) = 1`, `sign(-0) = -1`.
    fn sign(self) -> Self;
    /// Round toward negative infinity.
    fn floor(self) -> Self;
    /// Round toward positive infinity.
    fn ceil(self) -> Self;
    /// Round to nearest, halfway cases away from zero.
    fn round(self) -> Self;
    /// Square root (fixed point yields zero for negative inputs).
    fn sqrt(self) -> Self;
    /// Lesser of two values.
    fn min(self, other: Self) -> Self;
    /// Greater of two values.
    fn max(self, other: Self) -> Self;
    /// Lane division that never traps: fixed point yields zero for a zero
    /// divisor and wraps on overflow.
    fn div_lane(self, rhs: Self) -> Self;

    /// Sine (radians).
    fn sin(self) -> Self;
    /// Cosine (radians).
    fn cos(self) -> Self;
    /// Arc cosine; the input is clamped to `[-1, 1]`.
    fn acos(self) -> Self;
    /// Four-quadrant arc tangent of `self / x`.
    fn atan2(self, x: Self) -> Self;

    /// `1 / sqrt(max(self, min_positive))`.
    fn rsqrt(self) -> Self {
        Self::one() / self.max(Self::min_positive()).sqrt()
    }

    /// `1` when `x >= edge`, else `0`.
    fn step(edge: Self, x: Self) -> Self {
        if x >= edge {
            Self::one()
        } else {
            Self::zero()
        }
    }

    /// Clamps into `[lo, hi]`.
    fn clamp(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }

    /// Sine and cosine together.
    fn sin_cos(self) -> (Self, Self) {
        (self.sin(), self.cos())
    }

    /// `0.5`.
    fn half() -> Self {
        Self::from_f64(0.5)
    }

    /// `2`.
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// π.
    fn pi() -> Self {
        Self::from_f64(core::f64::consts::PI)
    }

    /// Divisor clamp: keeps the sign of `self`, raises the magnitude to at
    /// least `min_positive`.
    fn clamp_divisor(self) -> Self {
        self.sign() * self.abs().max(Self::min_positive())
    }
}

macro_rules! float_element {
    (
        $t:ty, $high:expr, $low:expr,
        sin = $sin:path, cos = $cos:path, acos = $acos:path, atan2 = $atan2:path
    ) => {
        impl Element for $t {
            const IS_FLOAT: bool = true;

            fn zero() -> Self {
                0.0
            }
            fn one() -> Self {
                1.0
            }
            fn min_positive() -> Self {
                <$t>::MIN_POSITIVE
            }
            fn epsilon_high() -> Self {
                $high
            }
            fn epsilon_low() -> Self {
                $low
            }

            #[allow(clippy::cast_possible_truncation)]
            fn from_f64(value: f64) -> Self {
                value as $t
            }
            fn to_f64(self) -> f64 {
                f64::from(self)
            }

            fn abs(self) -> Self {
                <$t>::from_bits(self.to_bits() & !SIGN_MASK)
            }
            fn sign(self) -> Self {
                <$t>::from_bits((self.to_bits() & SIGN_MASK) | <$t>::to_bits(1.0))
            }
            fn floor(self) -> Self {
                <$t>::floor(self)
            }
            fn ceil(self) -> Self {
                <$t>::ceil(self)
            }
            fn round(self) -> Self {
                <$t>::round(self)
            }
            fn sqrt(self) -> Self {
                <$t>::sqrt(self)
            }
            fn min(self, other: Self) -> Self {
                <$t>::min(self, other)
            }
            fn max(self, other: Self) -> Self {
                <$t>::max(self, other)
            }
            fn div_lane(self, rhs: Self) -> Self {
                self / rhs
            }

            fn sin(self) -> Self {
                $sin(self)
            }
            fn cos(self) -> Self {
                $cos(self)
            }
            fn acos(self) -> Self {
                $acos(Element::clamp(self, -1.0, 1.0))
            }
            fn atan2(self, x: Self) -> Self {
                $atan2(self, x)
            }
        }
    };
}

mod f32_bits {
    pub(super) const SIGN_MASK: u32 = 1 << 31;
}

mod f64_bits {
    pub(super) const SIGN_MASK: u64 = 1 << 63;
}

mod f32_impl {
    use super::f32_bits::SIGN_MASK;
    use super::Element;

    float_element!(
        f32, 1e-5, 1e-3,
        sin = libm::sinf, cos = libm::cosf, acos = libm::acosf, atan2 = libm::atan2f
    );
}

mod f64_impl {
    use super::f64_bits::SIGN_MASK;
    use super::Element;

    float_element!(
        f64, 1e-12, 1e-6,
        sin = libm::sin, cos = libm::cos, acos = libm::acos, atan2 = libm::atan2
    );
}

impl<S: SignedStore, const FRAC: u32> FixedPoint<S, FRAC> {
    const ELEMENT_RANGE: () = assert!(
        FRAC + 3 <= S::BITS,
        "vector elements need three integer bits so that pi fits"
    );
}

impl<S: SignedStore, const FRAC: u32> Element for FixedPoint<S, FRAC> {
    const IS_FLOAT: bool = false;

    fn zero() -> Self {
        let () = Self::ELEMENT_RANGE;
        Self::from_raw(S::ZERO)
    }
    fn one() -> Self {
        let () = Self::ELEMENT_RANGE;
        Self::from_raw(S::wrap_i128(1_i128 << FRAC))
    }
    fn min_positive() -> Self {
        Self::epsilon()
    }
    fn epsilon_high() -> Self {
        Self::epsilon()
    }
    fn epsilon_low() -> Self {
        Self::from_raw(S::wrap_i128(1_i128 << (FRAC / 2)))
    }

    fn from_f64(value: f64) -> Self {
        let () = Self::ELEMENT_RANGE;
        Self::from_f64(value)
    }
    fn to_f64(self) -> f64 {
        Self::to_f64(self)
    }

    fn abs(self) -> Self {
        Self::abs(self)
    }
    fn sign(self) -> Self {
        let unit = if self.raw() < S::ZERO { -1_i128 } else { 1 };
        Self::from_raw(S::wrap_i128(unit << FRAC))
    }
    fn floor(self) -> Self {
        Self::floor(self)
    }
    fn ceil(self) -> Self {
        Self::ceil(self)
    }
    fn round(self) -> Self {
        Self::round(self)
    }
    fn sqrt(self) -> Self {
        Self::sqrt(self)
    }
    fn min(self, other: Self) -> Self {
        Ord::min(self, other)
    }
    fn max(self, other: Self) -> Self {
        Ord::max(self, other)
    }
    fn div_lane(self, rhs: Self) -> Self {
        self.wrapping_div(rhs)
    }

    fn sin(self) -> Self {
        let () = Self::ELEMENT_RANGE;
        trig::sin_poly(self)
    }
    fn cos(self) -> Self {
        trig::cos_poly(self)
    }
    fn acos(self) -> Self {
        let () = Self::ELEMENT_RANGE;
        trig::acos_poly(self)
    }
    fn atan2(self, x: Self) -> Self {
        trig::atan2_poly(self, x)
    }
}

/// Explicit conversion between element types.
///
/// Float ⇄ float uses `as`; float → fixed truncates toward zero; fixed →
/// fixed is a pure shift ([`FixedPoint::convert`]).
pub trait ElementCast<U: Element>: Element {
    /// Converts `self` into `U`.
    fn cast(self) -> U;
}

impl ElementCast<f32> for f32 {
    fn cast(self) -> f32 {
        self
    }
}

impl ElementCast<f64> for f64 {
    fn cast(self) -> f64 {
        self
    }
}

impl ElementCast<f64> for f32 {
    fn cast(self) -> f64 {
        f64::from(self)
    }
}

impl ElementCast<f32> for f64 {
    #[allow(clippy::cast_possible_truncation)]
    fn cast(self) -> f32 {
        self as f32
    }
}

impl<S: SignedStore, const F: u32> ElementCast<FixedPoint<S, F>> for f32 {
    fn cast(self) -> FixedPoint<S, F> {
        FixedPoint::from_f32(self)
    }
}

impl<S: SignedStore, const F: u32> ElementCast<FixedPoint<S, F>> for f64 {
    fn cast(self) -> FixedPoint<S, F> {
        FixedPoint::from_f64(self)
    }
}

impl<S: SignedStore, const F: u32> ElementCast<f32> for FixedPoint<S, F> {
    fn cast(self) -> f32 {
        self.to_f32()
    }
}

impl<S: SignedStore, const F: u32> ElementCast<f64> for FixedPoint<S, F> {
    fn cast(self) -> f64 {
        FixedPoint::to_f64(self)
    }
}

impl<S1: SignedStore, const F1: u32, S2: SignedStore, const F2: u32>
    ElementCast<FixedPoint<S2, F2>> for FixedPoint<S1, F1>
{
    fn cast(self) -> FixedPoint<S2, F2> {
        self.convert()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{Fx32, Fx64};

    #[test]
    fn float_sign_reads_the_sign_bit() {
        assert_eq!(Element::sign(0.0_f32), 1.0);
        assert_eq!(Element::sign(-0.0_f32), -1.0);
        assert_eq!(Element::sign(-3.5_f64), -1.0);
        assert_eq!(Element::sign(f32::INFINITY), 1.0);
        assert_eq!(Element::abs(-0.0_f32).to_bits(), 0);
    }

    #[test]
    fn fixed_sign_of_zero_is_positive() {
        assert_eq!(Element::sign(Fx32::<16>::zero()), Fx32::<16>::one());
        assert_eq!(
            Element::sign(Fx32::<16>::from_f64(-0.001)),
            -Fx32::<16>::one()
        );
    }

    #[test]
    fn rsqrt_clamps_zero() {
        assert!(Element::rsqrt(0.0_f32).is_finite());
        assert_eq!(Element::rsqrt(4.0_f64), 0.5);
        assert_eq!(Element::rsqrt(Fx32::<16>::from_int(4)), Fx32::<16>::from_f64(0.5));
        assert!(Element::rsqrt(Fx32::<16>::zero()) > Fx32::<16>::zero());
    }

    #[test]
    fn step_and_clamp() {
        assert_eq!(<f32 as Element>::step(1.0, 1.0), 1.0);
        assert_eq!(<f32 as Element>::step(1.0, 0.999), 0.0);
        let lo = Fx64::<32>::from_int(-1);
        let hi = Fx64::<32>::from_int(1);
        assert_eq!(Element::clamp(Fx64::<32>::from_int(5), lo, hi), hi);
    }

    #[test]
    fn clamp_divisor_keeps_sign() {
        assert_eq!(Element::clamp_divisor(0.0_f32), f32::MIN_POSITIVE);
        assert_eq!(Element::clamp_divisor(-0.0_f32), -f32::MIN_POSITIVE);
        assert_eq!(Element::clamp_divisor(-2.0_f32), -2.0);
    }

    #[test]
    fn casts_between_element_types() {
        let v: Fx32<16> = 1.25_f32.cast();
        assert_eq!(v.raw(), 5 << 14);
        let back: f64 = v.cast();
        assert_eq!(back, 1.25);
        let wide: Fx64<32> = v.cast();
        assert_eq!(wide.raw(), 5 << 30);
    }
}
