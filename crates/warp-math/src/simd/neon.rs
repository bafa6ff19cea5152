// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! NEON backend (aarch64 baseline).
//!
//! AArch64 NEON has native directed rounding (`frintm`/`frintp`/`frinta`),
//! a reciprocal square-root estimate with a Newton step instruction, and a
//! signed widening multiply, so no emulation is needed. Horizontal sums are
//! spelled out as `(l0 + l2) + (l1 + l3)` to match the other backends
//! instead of using the pairwise `faddp` order.

#![allow(unsafe_code, unused_unsafe)]

use core::arch::aarch64::*;

use super::lanes::{arm, fixed_from_raw, fixed_raw, lane_mask, lane_mask64};
use super::{Backend, Lanes, ScalarBackend as Portable};
use crate::element::Element;
use crate::fixed::Fx32;

/// NEON backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Neon;

impl Backend for Neon {
    const NAME: &'static str = "neon";
}

const SIGN_F32: u32 = 1 << 31;
const SIGN_F64: u64 = 1 << 63;

impl Lanes<f32> for Neon {
    type Reg = float32x4_t;

    #[inline(always)]
    fn load(lanes: [f32; 4]) -> float32x4_t {
        arm::f32x4(lanes)
    }

    #[inline(always)]
    fn store(reg: float32x4_t) -> [f32; 4] {
        arm::from_f32x4(reg)
    }

    #[inline(always)]
    fn splat(value: f32) -> float32x4_t {
        unsafe { vdupq_n_f32(value) }
    }

    #[inline(always)]
    fn add(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vaddq_f32(a, b) }
    }

    #[inline(always)]
    fn sub(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vsubq_f32(a, b) }
    }

    #[inline(always)]
    fn mul(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vmulq_f32(a, b) }
    }

    #[inline(always)]
    fn div(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vdivq_f32(a, b) }
    }

    #[inline(always)]
    fn neg(a: float32x4_t) -> float32x4_t {
        unsafe { vnegq_f32(a) }
    }

    #[inline(always)]
    fn abs(a: float32x4_t) -> float32x4_t {
        unsafe { vabsq_f32(a) }
    }

    #[inline(always)]
    fn sign(a: float32x4_t) -> float32x4_t {
        unsafe {
            let bits = vandq_u32(vreinterpretq_u32_f32(a), vdupq_n_u32(SIGN_F32));
            vreinterpretq_f32_u32(vorrq_u32(bits, vdupq_n_u32(1.0_f32.to_bits())))
        }
    }

    #[inline(always)]
    fn min(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vminq_f32(a, b) }
    }

    #[inline(always)]
    fn max(a: float32x4_t, b: float32x4_t) -> float32x4_t {
        unsafe { vmaxq_f32(a, b) }
    }

    #[inline(always)]
    fn floor(a: float32x4_t) -> float32x4_t {
        unsafe { vrndmq_f32(a) }
    }

    #[inline(always)]
    fn ceil(a: float32x4_t) -> float32x4_t {
        unsafe { vrndpq_f32(a) }
    }

    #[inline(always)]
    fn round(a: float32x4_t) -> float32x4_t {
        unsafe { vrndaq_f32(a) }
    }

    #[inline(always)]
    fn sqrt(a: float32x4_t) -> float32x4_t {
        unsafe { vsqrtq_f32(a) }
    }

    /// Estimate refined by two `frsqrts` Newton steps.
    #[inline(always)]
    fn rsqrt(a: float32x4_t) -> float32x4_t {
        unsafe {
            let x = vmaxq_f32(a, vdupq_n_f32(f32::MIN_POSITIVE));
            let mut y = vrsqrteq_f32(x);
            y = vmulq_f32(y, vrsqrtsq_f32(vmulq_f32(x, y), y));
            vmulq_f32(y, vrsqrtsq_f32(vmulq_f32(x, y), y))
        }
    }

    #[inline(always)]
    fn step(edge: float32x4_t, x: float32x4_t) -> float32x4_t {
        unsafe {
            let ge = vcgeq_f32(x, edge);
            vreinterpretq_f32_u32(vandq_u32(ge, vreinterpretq_u32_f32(vdupq_n_f32(1.0))))
        }
    }

    #[inline(always)]
    fn sum(reg: float32x4_t, lanes: usize) -> f32 {
        unsafe {
            let v = vreinterpretq_f32_u32(vandq_u32(
                vreinterpretq_u32_f32(reg),
                arm::mask_u32(lane_mask(lanes)),
            ));
            let pairs = vaddq_f32(v, vextq_f32::<2>(v, v));
            vgetq_lane_f32::<0>(pairs) + vgetq_lane_f32::<1>(pairs)
        }
    }
}

type F64x4 = [float64x2_t; 2];

#[inline(always)]
fn map_f64(a: F64x4, f: impl Fn(float64x2_t) -> float64x2_t) -> F64x4 {
    [f(a[0]), f(a[1])]
}

#[inline(always)]
fn zip_f64(a: F64x4, b: F64x4, f: impl Fn(float64x2_t, float64x2_t) -> float64x2_t) -> F64x4 {
    [f(a[0], b[0]), f(a[1], b[1])]
}

impl Lanes<f64> for Neon {
    type Reg = F64x4;

    #[inline(always)]
    fn load(lanes: [f64; 4]) -> F64x4 {
        arm::f64x4(lanes)
    }

    #[inline(always)]
    fn store(reg: F64x4) -> [f64; 4] {
        arm::from_f64x4(reg)
    }

    #[inline(always)]
    fn splat(value: f64) -> F64x4 {
        let v = unsafe { vdupq_n_f64(value) };
        [v, v]
    }

    #[inline(always)]
    fn add(a: F64x4, b: F64x4) -> F64x4 {
        zip_f64(a, b, |x, y| unsafe { vaddq_f64(x, y) })
    }

    #[inline(always)]
    fn sub(a: F64x4, b: F64x4) -> F64x4 {
        zip_f64(a, b, |x, y| unsafe { vsubq_f64(x, y) })
    }

    #[inline(always)]
    fn mul(a: F64x4, b: F64x4) -> F64x4 {
        zip_f64(a, b, |x, y| unsafe { vmulq_f64(x, y) })
    }

    #[inline(always)]
    fn div(a: F64x4, b: F64x4) -> F64x4 {
        zip_f64(a, b, |x, y| unsafe { vdivq_f64(x, y) })
    }

    #[inline(always)]
    fn neg(a: F64x4) -> F64x4 {
        map_f64(a, |x| unsafe { vnegq_f64(x) })
    }

    #[inline(always)]
    fn abs(a: F64x4) -> F64x4 {
        map_f64(a, |x| unsafe { vabsq_f64(x) })
    }

    #[inline(always)]
    fn sign(a: F64x4) -> F64x4 {
        map_f64(a, |x| unsafe {
            let bits = vandq_u64(vreinterpretq_u64_f64(x), vdupq_n_u64(SIGN_F64));
            vreinterpretq_f64_u64(vorrq_u64(bits, vdupq_n_u64(1.0_f64.to_bits())))
        })
    }

    #[inline(always)]
    fn min(a: F64x4, b: F64x4) -> F64x4 {
        zip_f64(a, b, |x, y| unsafe { vminq_f64(x, y) })
    }

    #[inline(always)]
    fn max(a: F64x4, b: F64x4) -> F64x4 {
        zip_f64(a, b, |x, y| unsafe { vmaxq_f64(x, y) })
    }

    #[inline(always)]
    fn floor(a: F64x4) -> F64x4 {
        map_f64(a, |x| unsafe { vrndmq_f64(x) })
    }

    #[inline(always)]
    fn ceil(a: F64x4) -> F64x4 {
        map_f64(a, |x| unsafe { vrndpq_f64(x) })
    }

    #[inline(always)]
    fn round(a: F64x4) -> F64x4 {
        map_f64(a, |x| unsafe { vrndaq_f64(x) })
    }

    #[inline(always)]
    fn sqrt(a: F64x4) -> F64x4 {
        map_f64(a, |x| unsafe { vsqrtq_f64(x) })
    }

    #[inline(always)]
    fn rsqrt(a: F64x4) -> F64x4 {
        map_f64(a, |x| unsafe {
            let clamped = vmaxq_f64(x, vdupq_n_f64(f64::MIN_POSITIVE));
            vdivq_f64(vdupq_n_f64(1.0), vsqrtq_f64(clamped))
        })
    }

    #[inline(always)]
    fn step(edge: F64x4, x: F64x4) -> F64x4 {
        zip_f64(edge, x, |e, v| unsafe {
            let ge = vcgeq_f64(v, e);
            vreinterpretq_f64_u64(vandq_u64(ge, vreinterpretq_u64_f64(vdupq_n_f64(1.0))))
        })
    }

    #[inline(always)]
    fn sum(reg: F64x4, lanes: usize) -> f64 {
        let mask = arm::mask_u64(lane_mask64(lanes));
        unsafe {
            let lo = vreinterpretq_f64_u64(vandq_u64(vreinterpretq_u64_f64(reg[0]), mask[0]));
            let hi = vreinterpretq_f64_u64(vandq_u64(vreinterpretq_u64_f64(reg[1]), mask[1]));
            let pairs = vaddq_f64(lo, hi);
            vgetq_lane_f64::<0>(pairs) + vgetq_lane_f64::<1>(pairs)
        }
    }
}

#[inline(always)]
fn frac_mask_s32<const F: u32>() -> int32x4_t {
    #[allow(clippy::cast_possible_wrap)]
    let mask = ((1_u32 << F) - 1) as i32;
    unsafe { vdupq_n_s32(mask) }
}

#[inline(always)]
#[allow(clippy::cast_possible_wrap)]
fn frac_bits<const F: u32>() -> i32 {
    F as i32
}

#[inline(always)]
fn lanewise<const F: u32>(a: int32x4_t, f: impl Fn(Fx32<F>) -> Fx32<F>) -> int32x4_t {
    arm::i32x4(fixed_raw(fixed_from_raw::<i32, F>(arm::from_i32x4(a)).map(f)))
}

impl<const F: u32> Lanes<Fx32<F>> for Neon {
    type Reg = int32x4_t;

    #[inline(always)]
    fn load(lanes: [Fx32<F>; 4]) -> int32x4_t {
        arm::i32x4(fixed_raw(lanes))
    }

    #[inline(always)]
    fn store(reg: int32x4_t) -> [Fx32<F>; 4] {
        fixed_from_raw(arm::from_i32x4(reg))
    }

    #[inline(always)]
    fn splat(value: Fx32<F>) -> int32x4_t {
        unsafe { vdupq_n_s32(value.raw()) }
    }

    #[inline(always)]
    fn add(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vaddq_s32(a, b) }
    }

    #[inline(always)]
    fn sub(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vsubq_s32(a, b) }
    }

    /// `smull`/`smull2` widening multiply, arithmetic shift by `F`, narrow.
    #[inline(always)]
    fn mul(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe {
            let shift = vdupq_n_s64(-i64::from(frac_bits::<F>()));
            let lo = vshlq_s64(vmull_s32(vget_low_s32(a), vget_low_s32(b)), shift);
            let hi = vshlq_s64(vmull_high_s32(a, b), shift);
            vcombine_s32(vmovn_s64(lo), vmovn_s64(hi))
        }
    }

    #[inline(always)]
    fn div(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        let a = fixed_from_raw::<i32, F>(arm::from_i32x4(a));
        let b = fixed_from_raw::<i32, F>(arm::from_i32x4(b));
        let q = [0, 1, 2, 3].map(|i| a[i].div_lane(b[i]));
        arm::i32x4(fixed_raw(q))
    }

    #[inline(always)]
    fn neg(a: int32x4_t) -> int32x4_t {
        unsafe { vnegq_s32(a) }
    }

    #[inline(always)]
    fn abs(a: int32x4_t) -> int32x4_t {
        unsafe { vabsq_s32(a) }
    }

    #[inline(always)]
    fn sign(a: int32x4_t) -> int32x4_t {
        unsafe {
            let unit = vorrq_s32(vshrq_n_s32::<31>(a), vdupq_n_s32(1));
            vshlq_s32(unit, vdupq_n_s32(frac_bits::<F>()))
        }
    }

    #[inline(always)]
    fn min(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vminq_s32(a, b) }
    }

    #[inline(always)]
    fn max(a: int32x4_t, b: int32x4_t) -> int32x4_t {
        unsafe { vmaxq_s32(a, b) }
    }

    #[inline(always)]
    fn floor(a: int32x4_t) -> int32x4_t {
        unsafe { vbicq_s32(a, frac_mask_s32::<F>()) }
    }

    #[inline(always)]
    fn ceil(a: int32x4_t) -> int32x4_t {
        let mask = frac_mask_s32::<F>();
        unsafe { vbicq_s32(vaddq_s32(a, mask), mask) }
    }

    /// Sign-magnitude round so halves move away from zero.
    #[inline(always)]
    fn round(a: int32x4_t) -> int32x4_t {
        unsafe {
            let s = vshrq_n_s32::<31>(a);
            let magnitude = vsubq_s32(veorq_s32(a, s), s);
            let half = vdupq_n_s32(1 << (F - 1));
            let rounded = vbicq_s32(vaddq_s32(magnitude, half), frac_mask_s32::<F>());
            vsubq_s32(veorq_s32(rounded, s), s)
        }
    }

    #[inline(always)]
    fn sqrt(a: int32x4_t) -> int32x4_t {
        lanewise::<F>(a, Fx32::<F>::sqrt)
    }

    #[inline(always)]
    fn rsqrt(a: int32x4_t) -> int32x4_t {
        lanewise::<F>(a, <Fx32<F> as Element>::rsqrt)
    }

    #[inline(always)]
    fn step(edge: int32x4_t, x: int32x4_t) -> int32x4_t {
        unsafe {
            let below = vreinterpretq_s32_u32(vcltq_s32(x, edge));
            vbicq_s32(vdupq_n_s32(1 << F), below)
        }
    }

    #[inline(always)]
    fn sum(reg: int32x4_t, lanes: usize) -> Fx32<F> {
        unsafe {
            let mask = vreinterpretq_s32_u32(arm::mask_u32(lane_mask(lanes)));
            Fx32::from_raw(vaddvq_s32(vandq_s32(reg, mask)))
        }
    }
}

portable_fixed64_lanes!(Neon);
