// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Polynomial transcendentals evaluated in the element's own arithmetic.
//!
//! Float elements route `sin`/`cos`/`acos`/`atan2` through `libm`, which is
//! pure Rust and bit-stable across targets. Fixed-point elements cannot, so
//! they use the approximations below, written only in terms of `+ - * /`,
//! `sqrt` and comparisons. Every step is integer arithmetic for fixed point,
//! which keeps the results bit-reproducible.
//!
//! Strategy:
//! - `sin`: reduce to `[-π, π]` by whole turns, fold into `[-π/2, π/2]` with
//!   `sin(π - x) = sin(x)`, then a degree-9 odd Taylor polynomial
//!   (truncation error below `4e-6`).
//! - `cos(x) = sin(π/2 - |x|)` on the reduced angle.
//! - `acos`: Abramowitz & Stegun 4.4.45, `|error| <= 7e-5`.
//! - `atan`: Abramowitz & Stegun 4.4.49 on `[0, 1]`, `|error| <= 1e-5`,
//!   extended with `atan(x) = π/2 - atan(1/x)`.
//!
//! No intermediate leaves `[-π, π]` except the input itself, so a fixed-point
//! element with three integer bits (range `[-4, 4)`) is enough.

use core::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::element::Element;

fn c<T: Element>(value: f64) -> T {
    T::from_f64(value)
}

/// Horner evaluation, highest coefficient first.
fn horner<T: Element>(x: T, coeffs: &[f64]) -> T {
    coeffs
        .iter()
        .fold(T::zero(), |acc, &k| acc * x + c::<T>(k))
}

/// Angle minus the nearest whole number of turns, in `[-π, π]`.
///
/// The turn is subtracted as two half turns so τ itself is never formed.
fn reduce<T: Element>(angle: T) -> T {
    let turns = (angle * c::<T>(1.0 / TAU)).round();
    let half_turns = turns * c::<T>(PI);
    angle - half_turns - half_turns
}

/// Taylor polynomial for `x` already in `[-π/2, π/2]`.
fn sin_kernel<T: Element>(r: T) -> T {
    let r2 = r * r;
    // x − x³/3! + x⁵/5! − x⁷/7! + x⁹/9!
    let poly = horner(
        r2,
        &[
            1.0 / 362_880.0,
            -1.0 / 5040.0,
            1.0 / 120.0,
            -1.0 / 6.0,
            1.0,
        ],
    );
    (r * poly).clamp(-T::one(), T::one())
}

/// Sine by range reduction and a degree-9 Taylor polynomial.
pub fn sin_poly<T: Element>(angle: T) -> T {
    let mut r = reduce(angle);
    let half_pi = c::<T>(FRAC_PI_2);
    if r > half_pi {
        r = c::<T>(PI) - r;
    } else if r < -half_pi {
        r = -c::<T>(PI) - r;
    }
    sin_kernel(r)
}

/// Cosine as the sine of the complementary reduced angle.
pub fn cos_poly<T: Element>(angle: T) -> T {
    sin_kernel(c::<T>(FRAC_PI_2) - reduce(angle).abs())
}

/// Arc cosine on the clamped input.
pub fn acos_poly<T: Element>(x: T) -> T {
    let x = x.clamp(-T::one(), T::one());
    let negative = x < T::zero();
    let a = x.abs();
    let poly = horner(a, &[-0.018_729_3, 0.074_261_0, -0.212_114_4, 1.570_728_8]);
    let positive = (T::one() - a).sqrt() * poly;
    if negative {
        c::<T>(PI) - positive
    } else {
        positive
    }
}

/// Arc tangent of `x`.
pub fn atan_poly<T: Element>(x: T) -> T {
    let a = x.abs();
    let (t, invert) = if a > T::one() {
        (T::one() / a, true)
    } else {
        (a, false)
    };
    let t2 = t * t;
    let base = t * horner(
        t2,
        &[0.020_835_1, -0.085_133_0, 0.180_141_0, -0.330_299_5, 0.999_866_0],
    );
    let folded = if invert {
        c::<T>(FRAC_PI_2) - base
    } else {
        base
    };
    if x < T::zero() {
        -folded
    } else {
        folded
    }
}

/// Four-quadrant arc tangent of `y / x`; `atan2(0, 0) = 0`.
pub fn atan2_poly<T: Element>(y: T, x: T) -> T {
    let zero = T::zero();
    if x == zero && y == zero {
        return zero;
    }
    if x.abs() >= y.abs() {
        let base = atan_poly(y / x);
        if x >= zero {
            base
        } else if y >= zero {
            base + c::<T>(PI)
        } else {
            base - c::<T>(PI)
        }
    } else {
        let base = atan_poly(x / y);
        if y > zero {
            c::<T>(FRAC_PI_2) - base
        } else {
            -c::<T>(FRAC_PI_2) - base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::{Fx32, Fx64};

    fn sweep() -> impl Iterator<Item = f64> {
        (-400..=400).map(|i| f64::from(i) * 0.025)
    }

    #[test]
    fn sin_cos_track_libm_in_f64() {
        for x in sweep() {
            assert!((sin_poly(x) - libm::sin(x)).abs() < 5e-6, "sin({x})");
            assert!((cos_poly(x) - libm::cos(x)).abs() < 5e-6, "cos({x})");
        }
    }

    #[test]
    fn fixed_sin_tracks_libm() {
        for x in sweep() {
            let got = sin_poly(Fx64::<32>::from_f64(x)).to_f64();
            assert!((got - libm::sin(x)).abs() < 1e-5, "sin({x}) = {got}");
            let got32 = sin_poly(Fx32::<16>::from_f64(x)).to_f64();
            assert!((got32 - libm::sin(x)).abs() < 5e-4, "sin32({x}) = {got32}");
        }
    }

    #[test]
    fn three_integer_bits_cover_the_whole_circle() {
        type F = Fx32<29>;
        for i in -38..=38 {
            let x = f64::from(i) * 0.1;
            let (s, c) = F::from_f64(x).sin_cos();
            assert!((s.to_f64() - libm::sin(x)).abs() < 1e-5, "sin({x})");
            assert!((c.to_f64() - libm::cos(x)).abs() < 1e-5, "cos({x})");
        }
        let obtuse = acos_poly(Fx64::<61>::from_f64(-0.5)).to_f64();
        assert!((obtuse - libm::acos(-0.5)).abs() < 1e-4);
    }

    #[test]
    fn acos_error_bound() {
        for i in -100..=100 {
            let x = f64::from(i) / 100.0;
            assert!((acos_poly(x) - libm::acos(x)).abs() < 1e-4, "acos({x})");
        }
        assert_eq!(acos_poly(Fx32::<16>::one()), Fx32::<16>::zero());
    }

    #[test]
    fn atan2_quadrants() {
        let pts = [(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0), (0.5, 3.0), (-3.0, 0.2)];
        for &(y, x) in &pts {
            assert!(
                (atan2_poly(y, x) - libm::atan2(y, x)).abs() < 2e-5,
                "atan2({y}, {x})"
            );
        }
        assert_eq!(atan2_poly(0.0, 0.0), 0.0);
    }
}
