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

/// Two-component vector. Lanes two and three are zero padding.
#[derive(Clone, Copy)]
#[repr(C, align(16))]
pub struct Vec2<T: Element = f32, B: Lanes<T> = DefaultBackend> {
    /// X component.
    pub x: T,
    /// Y component.
    pub y: T,
    pad: [T; 2],
    backend: PhantomData<B>,
}

impl<T: Element, B: Lanes<T>> Vec2<T, B> {
    /// Creates a vector from components.
    pub fn new(x: T, y: T) -> Self {
        Self { x, y, pad: [T::zero(); 2], backend: PhantomData }
    }

    /// Unit vector along +X.
    pub fn unit_x() -> Self {
        Self::new(T::one(), T::zero())
    }

    /// Unit vector along +Y.
    pub fn unit_y() -> Self {
        Self::new(T::zero(), T::one())
    }

    /// All four storage lanes, pad included.
    pub fn lanes(self) -> [T; 4] {
        [self.x, self.y, self.pad[0], self.pad[1]]
    }

    /// Builds from four lanes; the last two are discarded.
    pub fn from_lanes(lanes: [T; 4]) -> Self {
        Self::new(lanes[0], lanes[1])
    }

    /// Appends a `z` component.
    pub fn extend(self, z: T) -> Vec3<T, B> {
        Vec3::new(self.x, self.y, z)
    }

    /// Counter-clockwise perpendicular `(-y, x)`.
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// 2D cross product `x0 * y1 - y0 * x1`.
    pub fn perp_dot(self, rhs: Self) -> T {
        op::dot(self.perp(), rhs)
    }
}

vector_common!(Vec2, 2, [0 => x, 1 => y]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perp_dot_is_signed_area() {
        let a = Vec2::<f32>::unit_x();
        let b = Vec2::<f32>::unit_y();
        assert_eq!(a.perp_dot(b), 1.0);
        assert_eq!(b.perp_dot(a), -1.0);
        assert_eq!(a.perp(), b);
    }

    #[test]
    fn length_ignores_padding() {
        assert_eq!(Vec2::<f64>::new(3.0, 4.0).length(), 5.0);
        assert_eq!(Vec2::<f32>::new(1.0, 2.0).extend(3.0).to_array(), [1.0, 2.0, 3.0]);
    }
}
