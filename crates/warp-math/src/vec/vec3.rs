// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::fmt;
use core::marker::PhantomData;
use core::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use super::{Vec2, Vec4, Vector};
use crate::element::{Element, ElementCast};
use crate::op;
use crate::simd::{DefaultBackend, Lanes};

/// Three-component vector: points, directions, Euler triples.
///
/// * Use [`crate::Mat4::transform_point`] for points (homogeneous `w = 1`)
///   and [`crate::Mat4::transform_direction`] for directions (`w = 0`).
/// * The fourth lane is padding and always zero.
#[derive(Clone, Copy)]
#[repr(C, align(16))]
pub struct Vec3<T: Element = f32, B: Lanes<T> = DefaultBackend> {
    /// X component.
    pub x: T,
    /// Y component.
    pub y: T,
    /// Z component.
    pub z: T,
    pad: T,
    backend: PhantomData<B>,
}

impl<T: Element, B: Lanes<T>> Vec3<T, B> {
    /// Creates a vector from components.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z, pad: T::zero(), backend: PhantomData }
    }

    /// Unit vector along +X.
    pub fn unit_x() -> Self {
        Self::new(T::one(), T::zero(), T::zero())
    }

    /// Unit vector along +Y.
    pub fn unit_y() -> Self {
        Self::new(T::zero(), T::one(), T::zero())
    }

    /// Unit vector along +Z.
    pub fn unit_z() -> Self {
        Self::new(T::zero(), T::zero(), T::one())
    }

    /// All four storage lanes, pad included.
    pub fn lanes(self) -> [T; 4] {
        [self.x, self.y, self.z, self.pad]
    }

    /// Builds from four lanes; the fourth is discarded.
    pub fn from_lanes(lanes: [T; 4]) -> Self {
        Self::new(lanes[0], lanes[1], lanes[2])
    }

    /// Appends a `w` component.
    pub fn extend(self, w: T) -> Vec4<T, B> {
        Vec4::new(self.x, self.y, self.z, w)
    }

    /// Drops `z`.
    pub fn truncate(self) -> Vec2<T, B> {
        Vec2::new(self.x, self.y)
    }

    /// See [`op::cross`].
    pub fn cross(self, rhs: Self) -> Self {
        op::cross(self, rhs)
    }

    /// See [`op::move_slerp`].
    pub fn move_slerp(self, target: Self, max_angle: T) -> Self {
        op::move_slerp(self, target, max_angle)
    }
}

vector_common!(Vec3, 3, [0 => x, 1 => y, 2 => z]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::Q16_16;

    #[test]
    fn layout_is_four_lanes_aligned() {
        assert_eq!(core::mem::size_of::<Vec3<f32>>(), 16);
        assert_eq!(core::mem::align_of::<Vec3<f32>>(), 16);
        assert_eq!(core::mem::size_of::<Vec3<f64>>(), 32);
        assert_eq!(core::mem::size_of::<Vec3<Q16_16>>(), 16);
    }

    #[test]
    fn extend_and_truncate() {
        let v = Vec3::<f32>::new(1.0, 2.0, 3.0);
        assert_eq!(v.extend(4.0).to_array(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(v.truncate().to_array(), [1.0, 2.0]);
        assert_eq!(v.extend(9.0).truncate(), v);
    }

    #[test]
    fn debug_lists_named_fields_only() {
        let v = Vec3::<f32>::new(1.0, 2.0, 3.0);
        assert_eq!(format!("{v:?}"), "Vec3 { x: 1.0, y: 2.0, z: 3.0 }");
    }
}
