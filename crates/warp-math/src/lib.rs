// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! warp-math: Echo's numeric kernel.
//!
//! - [`WideUint128`]: portable 128-bit unsigned integer used for wide
//!   intermediates.
//! - [`FixedPoint`]: scaled-integer scalars (`Fx32<F>`, `Fx64<F>`, ...) with
//!   floor-rounded products and truncating division.
//! - [`Vec2`]/[`Vec3`]/[`Vec4`], [`Mat2`]/[`Mat3`]/[`Mat4`], [`Quat`]:
//!   generic over the element type (`f32`, `f64`, signed fixed point) and a
//!   compile-time arithmetic backend (scalar, SSE2, NEON).
//! - [`op`]: the free-function surface every consumer calls (`dot`, `cross`,
//!   `normalize`, `slerp`, `move_towards`, `move_slerp`, ...).
//!
//! Every backend produces the same results: fixed point bit-for-bit, floats
//! within `epsilon_high`. Degenerate inputs (zero-length vectors, parallel or
//! antipodal interpolation endpoints, empty smoothstep ranges) are clamped to
//! a per-type minimum instead of failing.
//!
//! ```
//! use warp_math::{op, Vec3};
//!
//! let x = Vec3::<f32>::unit_x();
//! let y = Vec3::<f32>::unit_y();
//! assert_eq!(op::cross(x, y), Vec3::unit_z());
//! ```

pub mod color;
pub mod element;
mod error;
pub mod fixed;
mod mat;
pub mod op;
mod quat;
pub mod simd;
pub mod trig;
mod vec;
pub mod wide;

pub use element::{Element, ElementCast};
pub use error::MathError;
pub use fixed::{FixedPoint, Fx32, Fx64, Q16_16, Q32_32, UFx32, UFx64};
pub use mat::{Mat2, Mat3, Mat4};
pub use quat::Quat;
pub use simd::{log_active_backend, Backend, DefaultBackend, Lanes, ScalarBackend};
pub use vec::{Vec2, Vec3, Vec4, Vector};
pub use wide::WideUint128;
