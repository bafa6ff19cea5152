// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::fmt;
use core::ops::{Add, Index, IndexMut, Mul, MulAssign, Neg, Sub};

use super::{inverse_determinant, Mat4};
use crate::element::Element;
use crate::op;
use crate::quat::Quat;
use crate::simd::{DefaultBackend, Lanes};
use crate::vec::Vec3;

/// Column-major 3×3 matrix: rotations, scales and normal transforms.
#[derive(Clone, Copy)]
pub struct Mat3<T: Element = f32, B: Lanes<T> = DefaultBackend> {
    cols: [Vec3<T, B>; 3],
}

impl<T: Element, B: Lanes<T>> Mat3<T, B> {
    /// Rotation about +X by `angle` radians.
    pub fn rotation_x(angle: T) -> Self {
        let (s, c) = angle.sin_cos();
        let (zero, one) = (T::zero(), T::one());
        Self::from_cols([
            Vec3::new(one, zero, zero),
            Vec3::new(zero, c, s),
            Vec3::new(zero, -s, c),
        ])
    }

    /// Rotation about +Y by `angle` radians.
    pub fn rotation_y(angle: T) -> Self {
        let (s, c) = angle.sin_cos();
        let (zero, one) = (T::zero(), T::one());
        Self::from_cols([
            Vec3::new(c, zero, -s),
            Vec3::new(zero, one, zero),
            Vec3::new(s, zero, c),
        ])
    }

    /// Rotation about +Z by `angle` radians.
    pub fn rotation_z(angle: T) -> Self {
        let (s, c) = angle.sin_cos();
        let (zero, one) = (T::zero(), T::one());
        Self::from_cols([
            Vec3::new(c, s, zero),
            Vec3::new(-s, c, zero),
            Vec3::new(zero, zero, one),
        ])
    }

    /// Rotation matrix of a quaternion (normalized first).
    pub fn from_quat(q: Quat<T, B>) -> Self {
        q.to_mat3()
    }

    /// Rotation of `angle` radians about `axis` (normalized internally).
    pub fn from_axis_angle(axis: Vec3<T, B>, angle: T) -> Self {
        Quat::from_axis_angle(axis, angle).to_mat3()
    }

    /// `R = R_y(yaw) * R_x(pitch) * R_z(roll)`.
    pub fn rotation_from_euler(yaw: T, pitch: T, roll: T) -> Self {
        Self::rotation_y(yaw) * Self::rotation_x(pitch) * Self::rotation_z(roll)
    }

    /// Non-uniform scale.
    pub fn from_scale(scale: Vec3<T, B>) -> Self {
        Self::from_diagonal(scale)
    }

    /// Upper-left 3×3 block of a 4×4 matrix.
    pub fn from_mat4(m: Mat4<T, B>) -> Self {
        m.to_mat3()
    }

    /// Scalar triple product of the columns.
    pub fn determinant(self) -> T {
        let [a, b, c] = self.cols;
        op::dot(a, op::cross(b, c))
    }

    /// Inverse from column cross products; a singular matrix uses a
    /// determinant clamped to `min_positive` instead of failing.
    pub fn inverse(self) -> Self {
        let [a, b, c] = self.cols;
        let rows = Self::from_cols([op::cross(b, c), op::cross(c, a), op::cross(a, b)]);
        rows.transpose() * inverse_determinant(self.determinant())
    }
}

impl<T: Element, B: Lanes<T>> From<Mat4<T, B>> for Mat3<T, B> {
    fn from(m: Mat4<T, B>) -> Self {
        m.to_mat3()
    }
}

matrix_common!(Mat3, Vec3, 3, 9);

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    type M = Mat3<f32>;
    type V = Vec3<f32>;

    #[test]
    fn axis_rotations_follow_the_right_hand_rule() {
        assert_eq!(M::rotation_z(FRAC_PI_2) * V::unit_x(), V::unit_y());
        assert_eq!(M::rotation_y(FRAC_PI_2) * V::unit_z(), V::unit_x());
        assert_eq!(M::rotation_x(FRAC_PI_2) * V::unit_y(), V::unit_z());
        assert_eq!(M::from_axis_angle(V::unit_y(), FRAC_PI_2), M::rotation_y(FRAC_PI_2));
    }

    #[test]
    fn inverse_of_general_matrix() {
        let m = Mat3::<f64>::from_cols_array([2.0, 0.0, 1.0, 1.0, 3.0, 0.0, 0.0, 1.0, 4.0]);
        assert_eq!(m.determinant(), 25.0);
        assert_eq!(m * m.inverse(), Mat3::identity());
        assert_eq!(m.inverse() * m, Mat3::identity());
    }

    #[test]
    fn rotation_inverse_is_transpose() {
        let r = M::rotation_from_euler(0.4, -0.9, 1.7);
        assert_eq!(r.inverse(), r.transpose());
        assert!((r.determinant() - 1.0).abs() < 1e-5);
    }
}
