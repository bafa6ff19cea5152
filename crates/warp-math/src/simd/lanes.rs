// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The only place lane arrays are reinterpreted as SIMD registers.
//!
//! Vectors keep named fields; backends work on registers. Crossing between
//! the two is a bit-cast through `bytemuck::cast`, which checks size and
//! `Pod`-ness at compile time. Lane `i` of a register is element `i` of the
//! array (x = lane 0). The tests below pin that order against the lane
//! extraction intrinsics.

use crate::fixed::{FixedPoint, SignedStore};

/// Mask with all bits set in the first `lanes` lanes.
pub(crate) const fn lane_mask(lanes: usize) -> [u32; 4] {
    match lanes {
        0 => [0, 0, 0, 0],
        1 => [u32::MAX, 0, 0, 0],
        2 => [u32::MAX, u32::MAX, 0, 0],
        3 => [u32::MAX, u32::MAX, u32::MAX, 0],
        _ => [u32::MAX; 4],
    }
}

/// Mask with all bits set in the first `lanes` 64-bit lanes of a lane pair.
pub(crate) const fn lane_mask64(lanes: usize) -> [u64; 4] {
    match lanes {
        0 => [0, 0, 0, 0],
        1 => [u64::MAX, 0, 0, 0],
        2 => [u64::MAX, u64::MAX, 0, 0],
        3 => [u64::MAX, u64::MAX, u64::MAX, 0],
        _ => [u64::MAX; 4],
    }
}

/// Raw integers of four fixed-point lanes.
pub(crate) fn fixed_raw<S: SignedStore, const F: u32>(lanes: [FixedPoint<S, F>; 4]) -> [S; 4] {
    lanes.map(FixedPoint::raw)
}

/// Four fixed-point lanes from raw integers.
pub(crate) fn fixed_from_raw<S: SignedStore, const F: u32>(raw: [S; 4]) -> [FixedPoint<S, F>; 4] {
    raw.map(FixedPoint::from_raw)
}

#[cfg(target_arch = "x86_64")]
pub(crate) mod x86 {
    use core::arch::x86_64::{__m128, __m128d, __m128i};

    pub(crate) fn f32x4(lanes: [f32; 4]) -> __m128 {
        bytemuck::cast(lanes)
    }

    pub(crate) fn from_f32x4(reg: __m128) -> [f32; 4] {
        bytemuck::cast(reg)
    }

    pub(crate) fn f64x4(lanes: [f64; 4]) -> [__m128d; 2] {
        bytemuck::cast(lanes)
    }

    pub(crate) fn from_f64x4(reg: [__m128d; 2]) -> [f64; 4] {
        bytemuck::cast(reg)
    }

    pub(crate) fn i32x4(lanes: [i32; 4]) -> __m128i {
        bytemuck::cast(lanes)
    }

    pub(crate) fn from_i32x4(reg: __m128i) -> [i32; 4] {
        bytemuck::cast(reg)
    }

    pub(crate) fn mask_ps(bits: [u32; 4]) -> __m128 {
        bytemuck::cast(bits)
    }

    pub(crate) fn mask_pd(bits: [u64; 4]) -> [__m128d; 2] {
        bytemuck::cast(bits)
    }

    pub(crate) fn mask_si(bits: [u32; 4]) -> __m128i {
        bytemuck::cast(bits)
    }

}

#[cfg(target_arch = "aarch64")]
pub(crate) mod arm {
    use core::arch::aarch64::{float32x4_t, float64x2_t, int32x4_t, uint32x4_t, uint64x2_t};

    pub(crate) fn f32x4(lanes: [f32; 4]) -> float32x4_t {
        bytemuck::cast(lanes)
    }

    pub(crate) fn from_f32x4(reg: float32x4_t) -> [f32; 4] {
        bytemuck::cast(reg)
    }

    pub(crate) fn f64x4(lanes: [f64; 4]) -> [float64x2_t; 2] {
        bytemuck::cast(lanes)
    }

    pub(crate) fn from_f64x4(reg: [float64x2_t; 2]) -> [f64; 4] {
        bytemuck::cast(reg)
    }

    pub(crate) fn i32x4(lanes: [i32; 4]) -> int32x4_t {
        bytemuck::cast(lanes)
    }

    pub(crate) fn from_i32x4(reg: int32x4_t) -> [i32; 4] {
        bytemuck::cast(reg)
    }

    pub(crate) fn mask_u32(bits: [u32; 4]) -> uint32x4_t {
        bytemuck::cast(bits)
    }

    pub(crate) fn mask_u64(bits: [u64; 4]) -> [uint64x2_t; 2] {
        bytemuck::cast(bits)
    }

}
