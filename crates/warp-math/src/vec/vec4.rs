// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::fmt;
use core::marker::PhantomData;
use core::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use super::{Vec3, Vector};
use crate::element::{Element, ElementCast};
use crate::op;
use crate::simd::{DefaultBackend, Lanes};

/// Four-component vector: homogeneous coordinates, colors, matrix columns.
#[derive(Clone, Copy)]
#[repr(C, align(16))]
pub struct Vec4<T: Element = f32, B: Lanes<T> = DefaultBackend> {
    /// X component.
    pub x: T,
    /// Y component.
    pub y: T,
    /// Z component.
    pub z: T,
    /// W component.
    pub w: T,
    backend: PhantomData<B>,
}

impl<T: Element, B: Lanes<T>> Vec4<T, B> {
    /// Creates a vector from components.
    pub fn new(x: T, y: T, z: T, w: T) -> Self {
        Self { x, y, z, w, backend: PhantomData }
    }

    /// Unit vector along +X.
    pub fn unit_x() -> Self {
        Self::new(T::one(), T::zero(), T::zero(), T::zero())
    }

    /// Unit vector along +Y.
    pub fn unit_y() -> Self {
        Self::new(T::zero(), T::one(), T::zero(), T::zero())
    }

    /// Unit vector along +Z.
    pub fn unit_z() -> Self {
        Self::new(T::zero(), T::zero(), T::one(), T::zero())
    }

    /// Unit vector along +W.
    pub fn unit_w() -> Self {
        Self::new(T::zero(), T::zero(), T::zero(), T::one())
    }

    /// The four lanes.
    pub fn lanes(self) -> [T; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Builds from four lanes.
    pub fn from_lanes(lanes: [T; 4]) -> Self {
        Self::new(lanes[0], lanes[1], lanes[2], lanes[3])
    }

    /// Drops `w`.
    pub fn truncate(self) -> Vec3<T, B> {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Perspective divide: `xyz / w` with `w` clamped away from zero.
    pub fn project(self) -> Vec3<T, B> {
        self.truncate() * (T::one() / self.w.clamp_divisor())
    }
}

vector_common!(Vec4, 4, [0 => x, 1 => y, 2 => z, 3 => w]);
