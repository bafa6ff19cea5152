// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Color conversions on `Vec4` (`x = r, y = g, z = b, w = a`, each in
//! `[0, 1]`).
//!
//! Packed colors are `0xRRGGBBAA`. The sRGB transfer functions are the
//! IEC 61966-2-1 piecewise curves evaluated with `libm::powf`; alpha is
//! always linear and passes through untouched.

use crate::simd::Lanes;
use crate::vec::Vec4;

fn channel_to_unorm8(c: f32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let byte = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    byte
}

/// Color from four 8-bit channels `[r, g, b, a]`.
pub fn from_rgba8<B: Lanes<f32>>(rgba: [u8; 4]) -> Vec4<f32, B> {
    Vec4::from_array(rgba.map(|c| f32::from(c) / 255.0))
}

/// Quantizes to four 8-bit channels, clamping to `[0, 1]` and rounding to
/// nearest.
pub fn to_rgba8<B: Lanes<f32>>(color: Vec4<f32, B>) -> [u8; 4] {
    color.to_array().map(channel_to_unorm8)
}

/// Color from a packed `0xRRGGBBAA` word.
pub fn from_packed<B: Lanes<f32>>(packed: u32) -> Vec4<f32, B> {
    from_rgba8(packed.to_be_bytes())
}

/// Packs to `0xRRGGBBAA`.
pub fn to_packed<B: Lanes<f32>>(color: Vec4<f32, B>) -> u32 {
    u32::from_be_bytes(to_rgba8(color))
}

/// sRGB-encoded channel to linear light.
pub fn srgb_to_linear_channel(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        libm::powf((c + 0.055) / 1.055, 2.4)
    }
}

/// Linear-light channel to sRGB encoding.
pub fn linear_to_srgb_channel(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * libm::powf(c, 1.0 / 2.4) - 0.055
    }
}

/// Decodes the color channels from sRGB to linear; alpha is unchanged.
pub fn srgb_to_linear<B: Lanes<f32>>(color: Vec4<f32, B>) -> Vec4<f32, B> {
    let rgb = color.truncate().map(srgb_to_linear_channel);
    rgb.extend(color.w)
}

/// Encodes the color channels from linear to sRGB; alpha is unchanged.
pub fn linear_to_srgb<B: Lanes<f32>>(color: Vec4<f32, B>) -> Vec4<f32, B> {
    let rgb = color.truncate().map(linear_to_srgb_channel);
    rgb.extend(color.w)
}
