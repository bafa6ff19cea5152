// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rotation quaternions.

use core::fmt;
use core::marker::PhantomData;
use core::ops::{Mul, MulAssign, Neg};

use crate::element::Element;
use crate::mat::{Mat3, Mat4};
use crate::op;
use crate::simd::{DefaultBackend, Lanes};
use crate::vec::{Vec3, Vec4, Vector};

/// Quaternion stored as `(x, y, z, w)` with `w` the scalar part.
///
/// * All angles are radians.
/// * Only unit quaternions represent rotations. Nothing enforces that;
///   re-normalize after long chains of products.
/// * Usable with every [`op`] function through [`Vector`].
#[derive(Clone, Copy)]
#[repr(C, align(16))]
pub struct Quat<T: Element = f32, B: Lanes<T> = DefaultBackend> {
    /// Vector part, X.
    pub x: T,
    /// Vector part, Y.
    pub y: T,
    /// Vector part, Z.
    pub z: T,
    /// Scalar part.
    pub w: T,
    backend: PhantomData<B>,
}

impl<T: Element, B: Lanes<T>> Quat<T, B> {
    /// Creates a quaternion from raw components.
    pub fn new(x: T, y: T, z: T, w: T) -> Self {
        Self { x, y, z, w, backend: PhantomData }
    }

    /// The identity rotation `(0, 0, 0, 1)`.
    pub fn identity() -> Self {
        Self::new(T::zero(), T::zero(), T::zero(), T::one())
    }

    /// Builds from `[x, y, z, w]`.
    pub fn from_array(array: [T; 4]) -> Self {
        Self::new(array[0], array[1], array[2], array[3])
    }

    /// Components as `[x, y, z, w]`.
    pub fn to_array(self) -> [T; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// The components as a four-vector.
    pub fn to_vec4(self) -> Vec4<T, B> {
        Vec4::new(self.x, self.y, self.z, self.w)
    }

    /// The vector part.
    pub fn xyz(self) -> Vec3<T, B> {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// The axis is normalized internally; a (near) zero axis yields the
    /// identity.
    pub fn from_axis_angle(axis: Vec3<T, B>, angle: T) -> Self {
        let valid = T::step(T::epsilon_high(), op::length_squared(axis));
        let (sin_half, cos_half) = (angle * T::half()).sin_cos();
        let v = op::normalize(axis) * sin_half;
        let rotation = Self::new(v.x, v.y, v.z, cos_half);
        op::select(valid, rotation, Self::identity())
    }

    /// Rotation from Euler angles: `yaw` about +Y, then `pitch` about +X,
    /// then `roll` about +Z, composed as `q_y * q_x * q_z`. Matches
    /// [`Mat4::rotation_from_euler`].
    pub fn from_euler(yaw: T, pitch: T, roll: T) -> Self {
        let qy = Self::from_axis_angle(Vec3::unit_y(), yaw);
        let qx = Self::from_axis_angle(Vec3::unit_x(), pitch);
        let qz = Self::from_axis_angle(Vec3::unit_z(), roll);
        qy * qx * qz
    }

    /// Rotation axis and angle in `[0, 2π]`.
    ///
    /// For the identity (no unique axis) the axis is +X.
    pub fn to_axis_angle(self) -> (Vec3<T, B>, T) {
        let q = op::normalize(self);
        let one = T::one();
        let angle = T::two() * q.w.clamp(-one, one).acos();
        let sin_half = (one - q.w * q.w).max(T::zero()).sqrt();
        let defined = T::step(T::epsilon_low(), sin_half);
        let axis = q.xyz() * (one / sin_half.max(T::min_positive()));
        (op::select(defined, axis, Vec3::unit_x()), angle)
    }

    /// Hamilton product `self * rhs`: rotates by `rhs`, then by `self`.
    pub fn multiply(self, rhs: Self) -> Self {
        let (ax, ay, az, aw) = (self.x, self.y, self.z, self.w);
        let (bx, by, bz, bw) = (rhs.x, rhs.y, rhs.z, rhs.w);
        Self::new(
            aw * bx + ax * bw + ay * bz - az * by,
            aw * by - ax * bz + ay * bw + az * bx,
            aw * bz + ax * by - ay * bx + az * bw,
            aw * bw - ax * bx - ay * by - az * bz,
        )
    }

    /// `(-x, -y, -z, w)`.
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Multiplicative inverse: `conjugate / |q|²`, with the squared norm
    /// clamped to `min_positive`.
    pub fn inverse(self) -> Self {
        let norm_sq = op::length_squared(self).max(T::min_positive());
        let c = self.conjugate().to_vec4() * (T::one() / norm_sq);
        Self::new(c.x, c.y, c.z, c.w)
    }

    /// Unit quaternion in the same direction (zero stays zero).
    pub fn normalize(self) -> Self {
        op::normalize(self)
    }

    /// Four-component dot product.
    pub fn dot(self, rhs: Self) -> T {
        op::dot(self, rhs)
    }

    /// Norm `|q|`.
    pub fn length(self) -> T {
        op::length(self)
    }

    /// Rotates a vector: `q v q*` in the expanded form
    /// `v + w·t + u × t` with `t = 2 (u × v)`.
    pub fn rotate(self, v: Vec3<T, B>) -> Vec3<T, B> {
        let u = self.xyz();
        let t = op::cross(u, v) * T::two();
        v + t * self.w + op::cross(u, t)
    }

    /// Column-major 3×3 rotation matrix of the normalized quaternion.
    pub fn to_mat3(self) -> Mat3<T, B> {
        let q = self.normalize();
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);
        let one = T::one();
        let two = T::two();
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);
        Mat3::from_cols([
            Vec3::new(one - two * (yy + zz), two * (xy + wz), two * (xz - wy)),
            Vec3::new(two * (xy - wz), one - two * (xx + zz), two * (yz + wx)),
            Vec3::new(two * (xz + wy), two * (yz - wx), one - two * (xx + yy)),
        ])
    }

    /// Column-major 4×4 rotation matrix.
    pub fn to_mat4(self) -> Mat4<T, B> {
        Mat4::from_mat3(self.to_mat3())
    }

    /// Shortest-path spherical interpolation.
    ///
    /// `rhs` is negated when `dot(self, rhs) < 0` (by a sign multiply, not a
    /// branch). Falls back to linear interpolation for nearly equal
    /// rotations. The result is not re-normalized.
    pub fn slerp(self, rhs: Self, t: T) -> Self {
        let d = self.dot(rhs);
        let s = d.sign();
        let b = Self::from_array((rhs.to_vec4() * s).to_array());
        op::slerp_with_cos(self, b, d * s, t)
    }

    /// Shortest-path normalized linear interpolation.
    pub fn nlerp(self, rhs: Self, t: T) -> Self {
        let s = self.dot(rhs).sign();
        let b = Self::from_array((rhs.to_vec4() * s).to_array());
        op::nlerp(self, b, t)
    }

    /// Same components on another backend.
    pub fn with_backend<B2: Lanes<T>>(self) -> Quat<T, B2> {
        Quat::new(self.x, self.y, self.z, self.w)
    }
}

impl<T: Element, B: Lanes<T>> Vector for Quat<T, B> {
    type Elem = T;
    type Backend = B;
    const LANES: usize = 4;

    fn to_reg(self) -> B::Reg {
        B::load(self.to_array())
    }

    fn from_reg(reg: B::Reg) -> Self {
        Self::from_array(B::store(reg))
    }
}

impl<T: Element, B: Lanes<T>> Default for Quat<T, B> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Element, B: Lanes<T>> fmt::Debug for Quat<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quat")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("z", &self.z)
            .field("w", &self.w)
            .finish()
    }
}

impl<T: Element, B: Lanes<T>> PartialEq for Quat<T, B> {
    fn eq(&self, other: &Self) -> bool {
        B::lanes_eq(self.to_reg(), other.to_reg(), 4)
    }
}

impl<T: Element, B: Lanes<T>> From<[T; 4]> for Quat<T, B> {
    fn from(array: [T; 4]) -> Self {
        Self::from_array(array)
    }
}

impl<T: Element, B: Lanes<T>> Mul for Quat<T, B> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiply(rhs)
    }
}

impl<T: Element, B: Lanes<T>> MulAssign for Quat<T, B> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.multiply(rhs);
    }
}

impl<T: Element, B: Lanes<T>> Mul<Vec3<T, B>> for Quat<T, B> {
    type Output = Vec3<T, B>;
    fn mul(self, rhs: Vec3<T, B>) -> Vec3<T, B> {
        self.rotate(rhs)
    }
}

impl<T: Element, B: Lanes<T>> Neg for Quat<T, B> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}
