// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::fmt;
use core::ops::{Add, Index, IndexMut, Mul, MulAssign, Neg, Sub};

use super::{inverse_determinant, Mat3};
use crate::element::Element;
use crate::op;
use crate::quat::Quat;
use crate::simd::{DefaultBackend, Lanes};
use crate::vec::{Vec3, Vec4};

/// Column-major 4×4 matrix for affine and projective transforms.
///
/// - Translation occupies the last column.
/// - [`Mat4::transform_point`] treats the input as `w = 1` (no perspective
///   divide); [`Mat4::transform_direction`] as `w = 0`.
/// - Rotation helpers agree with the [`Quat`] conversions.
///
/// ```
/// use warp_math::{Mat4, Vec3};
/// let t = Mat4::<f32>::translation(Vec3::new(5.0, -3.0, 2.0));
/// let p = Vec3::new(2.0, 4.0, -1.0);
/// assert_eq!(t.transform_point(p).to_array(), [7.0, 1.0, 1.0]);
/// ```
#[derive(Clone, Copy)]
pub struct Mat4<T: Element = f32, B: Lanes<T> = DefaultBackend> {
    cols: [Vec4<T, B>; 4],
}

impl<T: Element, B: Lanes<T>> Mat4<T, B> {
    /// Translation by `offset`.
    pub fn translation(offset: Vec3<T, B>) -> Self {
        let mut m = Self::identity();
        m.cols[3] = offset.extend(T::one());
        m
    }

    /// Non-uniform scale.
    pub fn scale(scale: Vec3<T, B>) -> Self {
        Self::from_diagonal(scale.extend(T::one()))
    }

    /// Rotation about +X by `angle` radians.
    pub fn rotation_x(angle: T) -> Self {
        Self::from_mat3(Mat3::rotation_x(angle))
    }

    /// Rotation about +Y by `angle` radians.
    pub fn rotation_y(angle: T) -> Self {
        Self::from_mat3(Mat3::rotation_y(angle))
    }

    /// Rotation about +Z by `angle` radians.
    pub fn rotation_z(angle: T) -> Self {
        Self::from_mat3(Mat3::rotation_z(angle))
    }

    /// Rotation matrix of a quaternion (normalized first).
    pub fn from_quat(q: Quat<T, B>) -> Self {
        q.to_mat4()
    }

    /// Rotation of `angle` radians about `axis`. A zero axis gives the
    /// identity.
    pub fn from_axis_angle(axis: Vec3<T, B>, angle: T) -> Self {
        Quat::from_axis_angle(axis, angle).to_mat4()
    }

    /// Rotation from Euler angles:
    /// `R = R_y(yaw) * R_x(pitch) * R_z(roll)`.
    ///
    /// - `yaw` rotates about +Y
    /// - `pitch` rotates about +X
    /// - `roll` rotates about +Z
    pub fn rotation_from_euler(yaw: T, pitch: T, roll: T) -> Self {
        Self::from_mat3(Mat3::rotation_from_euler(yaw, pitch, roll))
    }

    /// Embeds a 3×3 matrix in the upper-left block; the rest is identity.
    pub fn from_mat3(m: Mat3<T, B>) -> Self {
        Self::from_cols([
            m.col(0).extend(T::zero()),
            m.col(1).extend(T::zero()),
            m.col(2).extend(T::zero()),
            Vec4::unit_w(),
        ])
    }

    /// Upper-left 3×3 block.
    pub fn to_mat3(self) -> Mat3<T, B> {
        Mat3::from_cols([self.cols[0].truncate(), self.cols[1].truncate(), self.cols[2].truncate()])
    }

    /// Transforms a point (`w = 1`, no perspective divide).
    pub fn transform_point(self, point: Vec3<T, B>) -> Vec3<T, B> {
        (self * point.extend(T::one())).truncate()
    }

    /// Transforms a direction (`w = 0`): translation is ignored.
    pub fn transform_direction(self, direction: Vec3<T, B>) -> Vec3<T, B> {
        (self * direction.extend(T::zero())).truncate()
    }

    /// Right-handed view matrix looking from `eye` towards `target`.
    pub fn look_at_rh(eye: Vec3<T, B>, target: Vec3<T, B>, up: Vec3<T, B>) -> Self {
        let f = op::normalize(target - eye);
        let s = op::normalize(op::cross(f, up));
        let u = op::cross(s, f);
        let zero = T::zero();
        Self::from_cols([
            Vec4::new(s.x, u.x, -f.x, zero),
            Vec4::new(s.y, u.y, -f.y, zero),
            Vec4::new(s.z, u.z, -f.z, zero),
            Vec4::new(-op::dot(s, eye), -op::dot(u, eye), op::dot(f, eye), T::one()),
        ])
    }

    /// Right-handed perspective projection with depth mapped to `[0, 1]`.
    ///
    /// `fov_y` is the vertical field of view in radians. Each divisor
    /// (`sin(fov_y / 2)`, `aspect`, `near - far`) is clamped away from zero.
    pub fn perspective_rh(fov_y: T, aspect: T, near: T, far: T) -> Self {
        let (sin, cos) = (fov_y * T::half()).sin_cos();
        let h = cos / sin.clamp_divisor();
        let w = h / aspect.clamp_divisor();
        let r = far / (near - far).clamp_divisor();
        let zero = T::zero();
        Self::from_cols([
            Vec4::new(w, zero, zero, zero),
            Vec4::new(zero, h, zero, zero),
            Vec4::new(zero, zero, r, -T::one()),
            Vec4::new(zero, zero, r * near, zero),
        ])
    }

    /// Cofactor expansion through the 2×2 minors of the top and bottom row
    /// pairs, shared by [`Mat4::determinant`] and [`Mat4::inverse`].
    fn minors(self) -> ([T; 6], [T; 6]) {
        let a = |r: usize, c: usize| self.cols[c][r];
        let s = [
            a(0, 0) * a(1, 1) - a(1, 0) * a(0, 1),
            a(0, 0) * a(1, 2) - a(1, 0) * a(0, 2),
            a(0, 0) * a(1, 3) - a(1, 0) * a(0, 3),
            a(0, 1) * a(1, 2) - a(1, 1) * a(0, 2),
            a(0, 1) * a(1, 3) - a(1, 1) * a(0, 3),
            a(0, 2) * a(1, 3) - a(1, 2) * a(0, 3),
        ];
        let c = [
            a(2, 0) * a(3, 1) - a(3, 0) * a(2, 1),
            a(2, 0) * a(3, 2) - a(3, 0) * a(2, 2),
            a(2, 0) * a(3, 3) - a(3, 0) * a(2, 3),
            a(2, 1) * a(3, 2) - a(3, 1) * a(2, 2),
            a(2, 1) * a(3, 3) - a(3, 1) * a(2, 3),
            a(2, 2) * a(3, 3) - a(3, 2) * a(2, 3),
        ];
        (s, c)
    }

    /// Determinant.
    pub fn determinant(self) -> T {
        let (s, c) = self.minors();
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    /// Adjugate over the determinant; a singular matrix uses a determinant
    /// clamped to `min_positive` instead of failing.
    pub fn inverse(self) -> Self {
        let (s, c) = self.minors();
        let det = s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0];
        let a = |r: usize, c: usize| self.cols[c][r];
        // b(r, c) of the inverse, laid out column by column.
        let inv = Self::from_cols([
            Vec4::new(
                a(1, 1) * c[5] - a(1, 2) * c[4] + a(1, 3) * c[3],
                -a(1, 0) * c[5] + a(1, 2) * c[2] - a(1, 3) * c[1],
                a(1, 0) * c[4] - a(1, 1) * c[2] + a(1, 3) * c[0],
                -a(1, 0) * c[3] + a(1, 1) * c[1] - a(1, 2) * c[0],
            ),
            Vec4::new(
                -a(0, 1) * c[5] + a(0, 2) * c[4] - a(0, 3) * c[3],
                a(0, 0) * c[5] - a(0, 2) * c[2] + a(0, 3) * c[1],
                -a(0, 0) * c[4] + a(0, 1) * c[2] - a(0, 3) * c[0],
                a(0, 0) * c[3] - a(0, 1) * c[1] + a(0, 2) * c[0],
            ),
            Vec4::new(
                a(3, 1) * s[5] - a(3, 2) * s[4] + a(3, 3) * s[3],
                -a(3, 0) * s[5] + a(3, 2) * s[2] - a(3, 3) * s[1],
                a(3, 0) * s[4] - a(3, 1) * s[2] + a(3, 3) * s[0],
                -a(3, 0) * s[3] + a(3, 1) * s[1] - a(3, 2) * s[0],
            ),
            Vec4::new(
                -a(2, 1) * s[5] + a(2, 2) * s[4] - a(2, 3) * s[3],
                a(2, 0) * s[5] - a(2, 2) * s[2] + a(2, 3) * s[1],
                -a(2, 0) * s[4] + a(2, 1) * s[2] - a(2, 3) * s[0],
                a(2, 0) * s[3] - a(2, 1) * s[1] + a(2, 2) * s[0],
            ),
        ]);
        inv * inverse_determinant(det)
    }
}

impl<T: Element, B: Lanes<T>> From<Mat3<T, B>> for Mat4<T, B> {
    fn from(m: Mat3<T, B>) -> Self {
        Self::from_mat3(m)
    }
}

matrix_common!(Mat4, Vec4, 4, 16);

#[cfg(test)]
mod tests {
    use super::*;

    type M = Mat4<f32>;
    type V = Vec3<f32>;

    #[test]
    fn translation_moves_points_not_directions() {
        let t = M::translation(V::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_point(V::zero()), V::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_direction(V::unit_x()), V::unit_x());
    }

    #[test]
    fn inverse_undoes_affine_transform() {
        let m = Mat4::<f64>::translation(Vec3::new(4.0, -2.0, 0.5))
            * Mat4::rotation_from_euler(0.3, 1.2, -0.7)
            * Mat4::scale(Vec3::new(2.0, 0.5, 3.0));
        assert_eq!(m * m.inverse(), Mat4::identity());
        assert!((m.determinant() - 3.0).abs() < 1e-9);
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(m.inverse().transform_point(m.transform_point(p)), p);
    }

    #[test]
    fn mat3_embedding_round_trips() {
        let r = Mat3::<f32>::rotation_from_euler(0.1, 0.2, 0.3);
        assert_eq!(M::from_mat3(r).to_mat3(), r);
        assert_eq!(Mat3::from(M::from(r)), r);
        assert_eq!(M::from_mat3(r).col(3).to_array(), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn look_at_maps_target_to_negative_z() {
        let eye = V::new(0.0, 0.0, 5.0);
        let view = M::look_at_rh(eye, V::zero(), V::unit_y());
        assert_eq!(view.transform_point(V::zero()), V::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn perspective_maps_near_and_far_to_unit_depth() {
        let p = M::perspective_rh(core::f32::consts::FRAC_PI_2, 1.0, 1.0, 10.0);
        let near = p * Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far = p * Vec4::new(0.0, 0.0, -10.0, 1.0);
        assert!((near.z / near.w).abs() < 1e-6);
        assert!((far.z / far.w - 1.0).abs() < 1e-6);
        let flat = M::perspective_rh(core::f32::consts::FRAC_PI_2, 1.0, 1.0, 1.0);
        assert!(flat.to_cols_array().iter().all(|c| c.is_finite()));
    }
}
