// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Compile-time backend dispatch for four-lane arithmetic.
//!
//! Every vector type is generic over a backend `B` implementing
//! [`Lanes<T>`] for its element type `T`. One impl exists per
//! (element, backend) pair and the choice is monomorphized, so there is no
//! runtime dispatch:
//!
//! - [`ScalarBackend`]: portable `[T; 4]` arrays, available everywhere.
//! - [`Sse2`] (`x86_64`): `__m128` / `__m128d` pairs / `__m128i`.
//! - [`Neon`] (`aarch64`): `float32x4_t` / `float64x2_t` pairs / `int32x4_t`.
//!
//! [`DefaultBackend`] is the native backend of the build target, or
//! `ScalarBackend` when the `scalar-backend` feature is enabled. The native
//! backends remain nameable so tests can compare them against the portable
//! one in a single build.
//!
//! Contract shared by every backend:
//! - floats agree with `ScalarBackend` within `epsilon_high`; everything
//!   except `rsqrt` is bit-identical on SSE2;
//! - fixed-point lanes agree bit-for-bit (products floor, `round` is half
//!   away from zero, division truncates toward zero);
//! - `sum` and `lanes_eq` only read the first `lanes` lanes.

use core::fmt;

use crate::element::Element;

/// Implements `Lanes<FixedPoint<i64, F>>` for a SIMD backend by running the
/// portable lanes: no target has a 64×64→128 lane multiply.
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
macro_rules! portable_fixed64_lanes {
    ($backend:ty) => {
        impl<const F: u32> $crate::simd::Lanes<$crate::fixed::Fx64<F>> for $backend {
            type Reg = [$crate::fixed::Fx64<F>; 4];

            fn load(lanes: [$crate::fixed::Fx64<F>; 4]) -> Self::Reg {
                lanes
            }
            fn store(reg: Self::Reg) -> [$crate::fixed::Fx64<F>; 4] {
                reg
            }
            fn splat(value: $crate::fixed::Fx64<F>) -> Self::Reg {
                [value; 4]
            }
            fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::add(a, b)
            }
            fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::sub(a, b)
            }
            fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::mul(a, b)
            }
            fn div(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::div(a, b)
            }
            fn neg(a: Self::Reg) -> Self::Reg {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::neg(a)
            }
            fn abs(a: Self::Reg) -> Self::Reg {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::abs(a)
            }
            fn sign(a: Self::Reg) -> Self::Reg {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::sign(a)
            }
            fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::min(a, b)
            }
            fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::max(a, b)
            }
            fn floor(a: Self::Reg) -> Self::Reg {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::floor(a)
            }
            fn ceil(a: Self::Reg) -> Self::Reg {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::ceil(a)
            }
            fn round(a: Self::Reg) -> Self::Reg {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::round(a)
            }
            fn sqrt(a: Self::Reg) -> Self::Reg {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::sqrt(a)
            }
            fn rsqrt(a: Self::Reg) -> Self::Reg {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::rsqrt(a)
            }
            fn step(edge: Self::Reg, x: Self::Reg) -> Self::Reg {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::step(edge, x)
            }
            fn sum(reg: Self::Reg, lanes: usize) -> $crate::fixed::Fx64<F> {
                <Portable as Lanes<$crate::fixed::Fx64<F>>>::sum(reg, lanes)
            }
        }
    };
}

pub(crate) mod lanes;
mod scalar;

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "x86_64")]
mod sse2;

#[cfg(target_arch = "aarch64")]
pub use neon::Neon;
pub use scalar::ScalarBackend;
#[cfg(target_arch = "x86_64")]
pub use sse2::Sse2;

/// Marker for a compile-time arithmetic backend.
pub trait Backend:
    Copy + Clone + Default + fmt::Debug + PartialEq + Eq + Send + Sync + 'static
{
    /// Human-readable backend name.
    const NAME: &'static str;
}

/// Four-lane arithmetic over element type `T`.
///
/// Registers always hold four lanes. Two- and three-component vectors keep
/// their unused lanes at zero and pass their lane count to the reductions.
pub trait Lanes<T: Element>: Backend {
    /// Native register (or register group) holding four `T` lanes.
    type Reg: Copy;

    /// Loads lanes in field order (`x, y, z, w`).
    fn load(lanes: [T; 4]) -> Self::Reg;
    /// Stores lanes in field order.
    fn store(reg: Self::Reg) -> [T; 4];
    /// Broadcasts one value to every lane.
    fn splat(value: T) -> Self::Reg;

    /// Lane-wise `a + b`.
    fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise `a - b`.
    fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise `a * b`.
    fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise `a / b` (see [`Element::div_lane`]).
    fn div(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise negation.
    fn neg(a: Self::Reg) -> Self::Reg;
    /// Lane-wise absolute value.
    fn abs(a: Self::Reg) -> Self::Reg;
    /// Lane-wise [`Element::sign`].
    fn sign(a: Self::Reg) -> Self::Reg;
    /// Lane-wise minimum.
    fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise maximum.
    fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg;
    /// Lane-wise floor.
    fn floor(a: Self::Reg) -> Self::Reg;
    /// Lane-wise ceiling.
    fn ceil(a: Self::Reg) -> Self::Reg;
    /// Lane-wise round, halfway cases away from zero.
    fn round(a: Self::Reg) -> Self::Reg;
    /// Lane-wise square root.
    fn sqrt(a: Self::Reg) -> Self::Reg;
    /// Lane-wise `1 / sqrt(max(a, min_positive))`.
    fn rsqrt(a: Self::Reg) -> Self::Reg;
    /// Lane-wise `x >= edge ? 1 : 0`.
    fn step(edge: Self::Reg, x: Self::Reg) -> Self::Reg;
    /// Sum of the first `lanes` lanes, pairwise: `(l0 + l2) + (l1 + l3)`.
    fn sum(reg: Self::Reg, lanes: usize) -> T;

    /// Equality over the first `lanes` lanes.
    ///
    /// Floats: the sum of absolute differences is at most `epsilon_high`.
    /// Fixed point: exact.
    fn lanes_eq(a: Self::Reg, b: Self::Reg, lanes: usize) -> bool {
        if T::IS_FLOAT {
            Self::sum(Self::abs(Self::sub(a, b)), lanes) <= T::epsilon_high()
        } else {
            let (a, b) = (Self::store(a), Self::store(b));
            a[..lanes] == b[..lanes]
        }
    }
}

/// Backend selected for this build.
#[cfg(all(target_arch = "x86_64", not(feature = "scalar-backend")))]
pub type DefaultBackend = Sse2;

/// Backend selected for this build.
#[cfg(all(target_arch = "aarch64", not(feature = "scalar-backend")))]
pub type DefaultBackend = Neon;

/// Backend selected for this build.
#[cfg(any(
    feature = "scalar-backend",
    not(any(target_arch = "x86_64", target_arch = "aarch64"))
))]
pub type DefaultBackend = ScalarBackend;

/// Emits a `debug` event naming the compiled backend.
///
/// Call once at startup; the arithmetic paths themselves never log.
pub fn log_active_backend() {
    tracing::debug!(
        backend = <DefaultBackend as Backend>::NAME,
        target_arch = std::env::consts::ARCH,
        "warp-math backend selected"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Fx32;

    fn check_round_trip<B: Lanes<f32> + Lanes<Fx32<16>>>() {
        let lanes = [1.0_f32, -2.5, 3.25, 0.0];
        assert_eq!(<B as Lanes<f32>>::store(<B as Lanes<f32>>::load(lanes)), lanes);
        let fixed = lanes.map(Fx32::<16>::from_f32);
        assert_eq!(
            <B as Lanes<Fx32<16>>>::store(<B as Lanes<Fx32<16>>>::load(fixed)),
            fixed
        );
    }

    #[test]
    fn default_backend_round_trips_lanes() {
        check_round_trip::<DefaultBackend>();
        check_round_trip::<ScalarBackend>();
    }

    #[test]
    fn masked_sum_ignores_tail_lanes() {
        let reg = <DefaultBackend as Lanes<f32>>::load([1.0, 2.0, 3.0, 100.0]);
        assert_eq!(<DefaultBackend as Lanes<f32>>::sum(reg, 3), 6.0);
        assert_eq!(<DefaultBackend as Lanes<f32>>::sum(reg, 2), 3.0);
        assert_eq!(<DefaultBackend as Lanes<f32>>::sum(reg, 4), 106.0);
    }

    #[test]
    fn lanes_eq_respects_tolerance_and_mask() {
        type L = DefaultBackend;
        let a = <L as Lanes<f32>>::load([1.0, 2.0, 3.0, 9.0]);
        let b = <L as Lanes<f32>>::load([1.0, 2.000_001, 3.0, -9.0]);
        assert!(<L as Lanes<f32>>::lanes_eq(a, b, 3));
        assert!(!<L as Lanes<f32>>::lanes_eq(a, b, 4));
        let fa = <L as Lanes<Fx32<16>>>::load([Fx32::<16>::from_raw(1); 4]);
        let fb = <L as Lanes<Fx32<16>>>::load([Fx32::<16>::from_raw(2); 4]);
        assert!(!<L as Lanes<Fx32<16>>>::lanes_eq(fa, fb, 1));
    }
}
