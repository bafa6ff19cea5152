// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! SSE2 backend (x86_64 baseline).
//!
//! - `f32`: one `__m128`. SSE2 has no rounding instruction, so
//!   floor/ceil/round use the magic-number sequence: adding then subtracting
//!   2^23 rounds a magnitude below 2^23 to an integer; a compare corrects it
//!   to a truncation, and magnitudes at or above 2^23 are already integral.
//!   The sign bit of the input is copied onto every result so `-0.0` and
//!   negative fractions match `std` bit-for-bit.
//! - `f64`: two `__m128d`, same sequence with 2^52.
//! - `Fx32<F>`: one `__m128i`. SSE2 only has the unsigned even-lane
//!   32×32→64 multiply, so the signed product subtracts `b << 32` for
//!   negative `a` (and symmetrically) before shifting right by `F` and
//!   repacking the four low halves.
//! - `Fx64<F>`: portable lanes.

#![allow(unsafe_code, unused_unsafe)]

use core::arch::x86_64::*;

use super::lanes::{fixed_from_raw, fixed_raw, lane_mask, lane_mask64, x86};
use super::{Backend, Lanes, ScalarBackend as Portable};
use crate::element::Element;
use crate::fixed::Fx32;

/// SSE2 backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Sse2;

impl Backend for Sse2 {
    const NAME: &'static str = "sse2";
}

const MAGIC_F32: f32 = 8_388_608.0;
const MAGIC_F64: f64 = 4_503_599_627_370_496.0;

// ── f32 helpers ─────────────────────────────────────────────────────

#[inline(always)]
fn sign_ps() -> __m128 {
    unsafe { _mm_castsi128_ps(_mm_set1_epi32(i32::MIN)) }
}

#[inline(always)]
fn copysign_ps(magnitude: __m128, from: __m128) -> __m128 {
    let sign = sign_ps();
    unsafe { _mm_or_ps(_mm_andnot_ps(sign, magnitude), _mm_and_ps(sign, from)) }
}

#[inline(always)]
fn trunc_ps(x: __m128) -> __m128 {
    unsafe {
        let sign = sign_ps();
        let magic = _mm_set1_ps(MAGIC_F32);
        let one = _mm_set1_ps(1.0);
        let ax = _mm_andnot_ps(sign, x);
        let nearest = _mm_sub_ps(_mm_add_ps(ax, magic), magic);
        let floored = _mm_sub_ps(nearest, _mm_and_ps(_mm_cmpgt_ps(nearest, ax), one));
        let truncated = _mm_or_ps(floored, _mm_and_ps(sign, x));
        let integral = _mm_cmpge_ps(ax, magic);
        _mm_or_ps(_mm_and_ps(integral, x), _mm_andnot_ps(integral, truncated))
    }
}

impl Lanes<f32> for Sse2 {
    type Reg = __m128;

    #[inline(always)]
    fn load(lanes: [f32; 4]) -> __m128 {
        x86::f32x4(lanes)
    }

    #[inline(always)]
    fn store(reg: __m128) -> [f32; 4] {
        x86::from_f32x4(reg)
    }

    #[inline(always)]
    fn splat(value: f32) -> __m128 {
        unsafe { _mm_set1_ps(value) }
    }

    #[inline(always)]
    fn add(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_add_ps(a, b) }
    }

    #[inline(always)]
    fn sub(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_sub_ps(a, b) }
    }

    #[inline(always)]
    fn mul(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_mul_ps(a, b) }
    }

    #[inline(always)]
    fn div(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_div_ps(a, b) }
    }

    #[inline(always)]
    fn neg(a: __m128) -> __m128 {
        unsafe { _mm_xor_ps(a, sign_ps()) }
    }

    #[inline(always)]
    fn abs(a: __m128) -> __m128 {
        unsafe { _mm_andnot_ps(sign_ps(), a) }
    }

    #[inline(always)]
    fn sign(a: __m128) -> __m128 {
        unsafe { _mm_or_ps(_mm_and_ps(a, sign_ps()), _mm_set1_ps(1.0)) }
    }

    #[inline(always)]
    fn min(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_min_ps(a, b) }
    }

    #[inline(always)]
    fn max(a: __m128, b: __m128) -> __m128 {
        unsafe { _mm_max_ps(a, b) }
    }

    #[inline(always)]
    fn floor(a: __m128) -> __m128 {
        let t = trunc_ps(a);
        let r = unsafe { _mm_sub_ps(t, _mm_and_ps(_mm_cmpgt_ps(t, a), _mm_set1_ps(1.0))) };
        copysign_ps(r, a)
    }

    #[inline(always)]
    fn ceil(a: __m128) -> __m128 {
        let t = trunc_ps(a);
        let r = unsafe { _mm_add_ps(t, _mm_and_ps(_mm_cmplt_ps(t, a), _mm_set1_ps(1.0))) };
        copysign_ps(r, a)
    }

    #[inline(always)]
    fn round(a: __m128) -> __m128 {
        let t = trunc_ps(a);
        let r = unsafe {
            let sign = sign_ps();
            let frac = _mm_andnot_ps(sign, _mm_sub_ps(a, t));
            let bump = _mm_and_ps(_mm_cmpge_ps(frac, _mm_set1_ps(0.5)), _mm_set1_ps(1.0));
            _mm_add_ps(_mm_andnot_ps(sign, t), bump)
        };
        copysign_ps(r, a)
    }

    #[inline(always)]
    fn sqrt(a: __m128) -> __m128 {
        unsafe { _mm_sqrt_ps(a) }
    }

    /// Hardware estimate refined by one Newton-Raphson step.
    #[inline(always)]
    fn rsqrt(a: __m128) -> __m128 {
        unsafe {
            let x = _mm_max_ps(a, _mm_set1_ps(f32::MIN_POSITIVE));
            let y = _mm_rsqrt_ps(x);
            let xyy = _mm_mul_ps(_mm_mul_ps(x, y), y);
            let correction = _mm_sub_ps(_mm_set1_ps(1.5), _mm_mul_ps(_mm_set1_ps(0.5), xyy));
            _mm_mul_ps(y, correction)
        }
    }

    #[inline(always)]
    fn step(edge: __m128, x: __m128) -> __m128 {
        unsafe { _mm_and_ps(_mm_cmpge_ps(x, edge), _mm_set1_ps(1.0)) }
    }

    #[inline(always)]
    fn sum(reg: __m128, lanes: usize) -> f32 {
        unsafe {
            let v = _mm_and_ps(reg, x86::mask_ps(lane_mask(lanes)));
            let pairs = _mm_add_ps(v, _mm_movehl_ps(v, v));
            let total = _mm_add_ss(pairs, _mm_shuffle_ps::<0b01_01_01_01>(pairs, pairs));
            _mm_cvtss_f32(total)
        }
    }
}

// ── f64 helpers ─────────────────────────────────────────────────────

type Pd = [__m128d; 2];

#[inline(always)]
fn map_pd(a: Pd, f: impl Fn(__m128d) -> __m128d) -> Pd {
    [f(a[0]), f(a[1])]
}

#[inline(always)]
fn zip_pd(a: Pd, b: Pd, f: impl Fn(__m128d, __m128d) -> __m128d) -> Pd {
    [f(a[0], b[0]), f(a[1], b[1])]
}

#[inline(always)]
fn sign_pd() -> __m128d {
    unsafe { _mm_castsi128_pd(_mm_set1_epi64x(i64::MIN)) }
}

#[inline(always)]
fn copysign_pd(magnitude: __m128d, from: __m128d) -> __m128d {
    let sign = sign_pd();
    unsafe { _mm_or_pd(_mm_andnot_pd(sign, magnitude), _mm_and_pd(sign, from)) }
}

#[inline(always)]
fn trunc_pd(x: __m128d) -> __m128d {
    unsafe {
        let sign = sign_pd();
        let magic = _mm_set1_pd(MAGIC_F64);
        let one = _mm_set1_pd(1.0);
        let ax = _mm_andnot_pd(sign, x);
        let nearest = _mm_sub_pd(_mm_add_pd(ax, magic), magic);
        let floored = _mm_sub_pd(nearest, _mm_and_pd(_mm_cmpgt_pd(nearest, ax), one));
        let truncated = _mm_or_pd(floored, _mm_and_pd(sign, x));
        let integral = _mm_cmpge_pd(ax, magic);
        _mm_or_pd(_mm_and_pd(integral, x), _mm_andnot_pd(integral, truncated))
    }
}

#[inline(always)]
fn floor_pd(a: __m128d) -> __m128d {
    let t = trunc_pd(a);
    let r = unsafe { _mm_sub_pd(t, _mm_and_pd(_mm_cmpgt_pd(t, a), _mm_set1_pd(1.0))) };
    copysign_pd(r, a)
}

#[inline(always)]
fn ceil_pd(a: __m128d) -> __m128d {
    let t = trunc_pd(a);
    let r = unsafe { _mm_add_pd(t, _mm_and_pd(_mm_cmplt_pd(t, a), _mm_set1_pd(1.0))) };
    copysign_pd(r, a)
}

#[inline(always)]
fn round_pd(a: __m128d) -> __m128d {
    let t = trunc_pd(a);
    let r = unsafe {
        let sign = sign_pd();
        let frac = _mm_andnot_pd(sign, _mm_sub_pd(a, t));
        let bump = _mm_and_pd(_mm_cmpge_pd(frac, _mm_set1_pd(0.5)), _mm_set1_pd(1.0));
        _mm_add_pd(_mm_andnot_pd(sign, t), bump)
    };
    copysign_pd(r, a)
}

impl Lanes<f64> for Sse2 {
    type Reg = Pd;

    #[inline(always)]
    fn load(lanes: [f64; 4]) -> Pd {
        x86::f64x4(lanes)
    }

    #[inline(always)]
    fn store(reg: Pd) -> [f64; 4] {
        x86::from_f64x4(reg)
    }

    #[inline(always)]
    fn splat(value: f64) -> Pd {
        let v = unsafe { _mm_set1_pd(value) };
        [v, v]
    }

    #[inline(always)]
    fn add(a: Pd, b: Pd) -> Pd {
        zip_pd(a, b, |x, y| unsafe { _mm_add_pd(x, y) })
    }

    #[inline(always)]
    fn sub(a: Pd, b: Pd) -> Pd {
        zip_pd(a, b, |x, y| unsafe { _mm_sub_pd(x, y) })
    }

    #[inline(always)]
    fn mul(a: Pd, b: Pd) -> Pd {
        zip_pd(a, b, |x, y| unsafe { _mm_mul_pd(x, y) })
    }

    #[inline(always)]
    fn div(a: Pd, b: Pd) -> Pd {
        zip_pd(a, b, |x, y| unsafe { _mm_div_pd(x, y) })
    }

    #[inline(always)]
    fn neg(a: Pd) -> Pd {
        map_pd(a, |x| unsafe { _mm_xor_pd(x, sign_pd()) })
    }

    #[inline(always)]
    fn abs(a: Pd) -> Pd {
        map_pd(a, |x| unsafe { _mm_andnot_pd(sign_pd(), x) })
    }

    #[inline(always)]
    fn sign(a: Pd) -> Pd {
        map_pd(a, |x| unsafe { _mm_or_pd(_mm_and_pd(x, sign_pd()), _mm_set1_pd(1.0)) })
    }

    #[inline(always)]
    fn min(a: Pd, b: Pd) -> Pd {
        zip_pd(a, b, |x, y| unsafe { _mm_min_pd(x, y) })
    }

    #[inline(always)]
    fn max(a: Pd, b: Pd) -> Pd {
        zip_pd(a, b, |x, y| unsafe { _mm_max_pd(x, y) })
    }

    #[inline(always)]
    fn floor(a: Pd) -> Pd {
        map_pd(a, floor_pd)
    }

    #[inline(always)]
    fn ceil(a: Pd) -> Pd {
        map_pd(a, ceil_pd)
    }

    #[inline(always)]
    fn round(a: Pd) -> Pd {
        map_pd(a, round_pd)
    }

    #[inline(always)]
    fn sqrt(a: Pd) -> Pd {
        map_pd(a, |x| unsafe { _mm_sqrt_pd(x) })
    }

    /// SSE2 has no double-precision estimate; this is the exact quotient.
    #[inline(always)]
    fn rsqrt(a: Pd) -> Pd {
        map_pd(a, |x| unsafe {
            let clamped = _mm_max_pd(x, _mm_set1_pd(f64::MIN_POSITIVE));
            _mm_div_pd(_mm_set1_pd(1.0), _mm_sqrt_pd(clamped))
        })
    }

    #[inline(always)]
    fn step(edge: Pd, x: Pd) -> Pd {
        zip_pd(edge, x, |e, v| unsafe { _mm_and_pd(_mm_cmpge_pd(v, e), _mm_set1_pd(1.0)) })
    }

    #[inline(always)]
    fn sum(reg: Pd, lanes: usize) -> f64 {
        let mask = x86::mask_pd(lane_mask64(lanes));
        unsafe {
            let lo = _mm_and_pd(reg[0], mask[0]);
            let hi = _mm_and_pd(reg[1], mask[1]);
            let pairs = _mm_add_pd(lo, hi);
            _mm_cvtsd_f64(_mm_add_sd(pairs, _mm_unpackhi_pd(pairs, pairs)))
        }
    }
}

// ── Fx32 helpers ────────────────────────────────────────────────────

/// Signed 32×32→64 products of the even lanes (0 and 2).
#[inline(always)]
fn mul_even_i32(a: __m128i, b: __m128i) -> __m128i {
    unsafe {
        let unsigned = _mm_mul_epu32(a, b);
        let a_neg = _mm_srai_epi32::<31>(a);
        let b_neg = _mm_srai_epi32::<31>(b);
        let fix = _mm_add_epi32(_mm_and_si128(a_neg, b), _mm_and_si128(b_neg, a));
        _mm_sub_epi64(unsigned, _mm_slli_epi64::<32>(fix))
    }
}

#[inline(always)]
fn frac_mask_epi32<const F: u32>() -> __m128i {
    #[allow(clippy::cast_possible_wrap)]
    let mask = ((1_u32 << F) - 1) as i32;
    unsafe { _mm_set1_epi32(mask) }
}

#[inline(always)]
fn shift_count<const F: u32>() -> __m128i {
    #[allow(clippy::cast_possible_wrap)]
    let count = F as i32;
    unsafe { _mm_cvtsi32_si128(count) }
}

#[inline(always)]
fn select_epi32(mask: __m128i, a: __m128i, b: __m128i) -> __m128i {
    unsafe { _mm_or_si128(_mm_and_si128(mask, a), _mm_andnot_si128(mask, b)) }
}

#[inline(always)]
fn lanewise<const F: u32>(a: __m128i, f: impl Fn(Fx32<F>) -> Fx32<F>) -> __m128i {
    x86::i32x4(fixed_raw(fixed_from_raw::<i32, F>(x86::from_i32x4(a)).map(f)))
}

impl<const F: u32> Lanes<Fx32<F>> for Sse2 {
    type Reg = __m128i;

    #[inline(always)]
    fn load(lanes: [Fx32<F>; 4]) -> __m128i {
        x86::i32x4(fixed_raw(lanes))
    }

    #[inline(always)]
    fn store(reg: __m128i) -> [Fx32<F>; 4] {
        fixed_from_raw(x86::from_i32x4(reg))
    }

    #[inline(always)]
    fn splat(value: Fx32<F>) -> __m128i {
        unsafe { _mm_set1_epi32(value.raw()) }
    }

    #[inline(always)]
    fn add(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_add_epi32(a, b) }
    }

    #[inline(always)]
    fn sub(a: __m128i, b: __m128i) -> __m128i {
        unsafe { _mm_sub_epi32(a, b) }
    }

    /// Widening multiply, logical shift by `F` (bits `F..F+32` of the
    /// product are the same under either shift for `F <= 30`), repack.
    #[inline(always)]
    fn mul(a: __m128i, b: __m128i) -> __m128i {
        unsafe {
            let count = shift_count::<F>();
            let even = _mm_srl_epi64(mul_even_i32(a, b), count);
            let odd = _mm_srl_epi64(
                mul_even_i32(_mm_srli_epi64::<32>(a), _mm_srli_epi64::<32>(b)),
                count,
            );
            let even = _mm_shuffle_epi32::<0b00_00_10_00>(even);
            let odd = _mm_shuffle_epi32::<0b00_00_10_00>(odd);
            _mm_unpacklo_epi32(even, odd)
        }
    }

    #[inline(always)]
    fn div(a: __m128i, b: __m128i) -> __m128i {
        let a = fixed_from_raw::<i32, F>(x86::from_i32x4(a));
        let b = fixed_from_raw::<i32, F>(x86::from_i32x4(b));
        let q = [0, 1, 2, 3].map(|i| a[i].div_lane(b[i]));
        x86::i32x4(fixed_raw(q))
    }

    #[inline(always)]
    fn neg(a: __m128i) -> __m128i {
        unsafe { _mm_sub_epi32(_mm_setzero_si128(), a) }
    }

    #[inline(always)]
    fn abs(a: __m128i) -> __m128i {
        unsafe {
            let s = _mm_srai_epi32::<31>(a);
            _mm_sub_epi32(_mm_xor_si128(a, s), s)
        }
    }

    #[inline(always)]
    fn sign(a: __m128i) -> __m128i {
        unsafe {
            let unit = _mm_or_si128(_mm_srai_epi32::<31>(a), _mm_set1_epi32(1));
            _mm_sll_epi32(unit, shift_count::<F>())
        }
    }

    #[inline(always)]
    fn min(a: __m128i, b: __m128i) -> __m128i {
        select_epi32(unsafe { _mm_cmplt_epi32(a, b) }, a, b)
    }

    #[inline(always)]
    fn max(a: __m128i, b: __m128i) -> __m128i {
        select_epi32(unsafe { _mm_cmpgt_epi32(a, b) }, a, b)
    }

    #[inline(always)]
    fn floor(a: __m128i) -> __m128i {
        unsafe { _mm_andnot_si128(frac_mask_epi32::<F>(), a) }
    }

    #[inline(always)]
    fn ceil(a: __m128i) -> __m128i {
        let mask = frac_mask_epi32::<F>();
        unsafe { _mm_andnot_si128(mask, _mm_add_epi32(a, mask)) }
    }

    /// Sign-magnitude round so halves move away from zero.
    #[inline(always)]
    fn round(a: __m128i) -> __m128i {
        unsafe {
            let s = _mm_srai_epi32::<31>(a);
            let magnitude = _mm_sub_epi32(_mm_xor_si128(a, s), s);
            let half = _mm_set1_epi32(1 << (F - 1));
            let rounded = _mm_andnot_si128(frac_mask_epi32::<F>(), _mm_add_epi32(magnitude, half));
            _mm_sub_epi32(_mm_xor_si128(rounded, s), s)
        }
    }

    #[inline(always)]
    fn sqrt(a: __m128i) -> __m128i {
        lanewise::<F>(a, Fx32::<F>::sqrt)
    }

    #[inline(always)]
    fn rsqrt(a: __m128i) -> __m128i {
        lanewise::<F>(a, <Fx32<F> as Element>::rsqrt)
    }

    #[inline(always)]
    fn step(edge: __m128i, x: __m128i) -> __m128i {
        unsafe {
            let below = _mm_cmplt_epi32(x, edge);
            _mm_andnot_si128(below, _mm_set1_epi32(1 << F))
        }
    }

    #[inline(always)]
    fn sum(reg: __m128i, lanes: usize) -> Fx32<F> {
        unsafe {
            let v = _mm_and_si128(reg, x86::mask_si(lane_mask(lanes)));
            let pairs = _mm_add_epi32(v, _mm_shuffle_epi32::<0b01_00_11_10>(v));
            let total = _mm_add_epi32(pairs, _mm_shuffle_epi32::<0b10_11_00_01>(pairs));
            Fx32::from_raw(_mm_cvtsi128_si32(total))
        }
    }
}

portable_fixed64_lanes!(Sse2);
