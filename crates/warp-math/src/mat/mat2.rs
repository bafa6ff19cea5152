// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::fmt;
use core::ops::{Add, Index, IndexMut, Mul, MulAssign, Neg, Sub};

use super::inverse_determinant;
use crate::element::Element;
use crate::simd::{DefaultBackend, Lanes};
use crate::vec::Vec2;

/// Column-major 2×2 matrix.
#[derive(Clone, Copy)]
pub struct Mat2<T: Element = f32, B: Lanes<T> = DefaultBackend> {
    cols: [Vec2<T, B>; 2],
}

impl<T: Element, B: Lanes<T>> Mat2<T, B> {
    /// Counter-clockwise rotation by `angle` radians.
    pub fn rotation(angle: T) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols([Vec2::new(c, s), Vec2::new(-s, c)])
    }

    /// `ad - bc`.
    pub fn determinant(self) -> T {
        let [a, b] = self.cols;
        a.x * b.y - b.x * a.y
    }

    /// Adjugate over the determinant; a singular matrix uses a determinant
    /// clamped to `min_positive` instead of failing.
    pub fn inverse(self) -> Self {
        let [a, b] = self.cols;
        let inv_det = inverse_determinant(self.determinant());
        Self::from_cols([Vec2::new(b.y, -a.y), Vec2::new(-b.x, a.x)]) * inv_det
    }
}

matrix_common!(Mat2, Vec2, 2, 4);

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    #[test]
    fn rotation_and_inverse() {
        let r = Mat2::<f32>::rotation(FRAC_PI_2);
        assert_eq!(r * Vec2::unit_x(), Vec2::unit_y());
        assert_eq!(r.inverse(), r.transpose());
        let m = Mat2::<f64>::from_cols_array([4.0, 2.0, 7.0, 6.0]);
        assert_eq!(m.determinant(), 10.0);
        assert_eq!(m * m.inverse(), Mat2::identity());
    }
}
