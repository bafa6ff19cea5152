// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use warp_math::{op, DefaultBackend, Element, Lanes, Mat4, Quat, Vec3};

use super::aabb::Aabb;
use super::sphere::Sphere;

/// Oriented bounding box: a box with half-extents `half_extents` in its
/// local frame, rotated by `rotation` and centered at `center`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Obb<T: Element = f32, B: Lanes<T> = DefaultBackend> {
    center: Vec3<T, B>,
    half_extents: Vec3<T, B>,
    rotation: Quat<T, B>,
}

impl<T: Element, B: Lanes<T>> Obb<T, B> {
    /// Box from its parts; half-extent signs are dropped and the rotation is
    /// normalized.
    pub fn new(center: Vec3<T, B>, half_extents: Vec3<T, B>, rotation: Quat<T, B>) -> Self {
        Self {
            center,
            half_extents: op::abs(half_extents),
            rotation: rotation.normalize(),
        }
    }

    /// Unrotated box covering `aabb`.
    pub fn from_aabb(aabb: &Aabb<T, B>) -> Self {
        Self::new(aabb.center(), aabb.half_extents(), Quat::identity())
    }

    /// Center.
    pub fn center(&self) -> Vec3<T, B> {
        self.center
    }

    /// Local half-extents.
    pub fn half_extents(&self) -> Vec3<T, B> {
        self.half_extents
    }

    /// Orientation.
    pub fn rotation(&self) -> Quat<T, B> {
        self.rotation
    }

    /// Local X, Y and Z axes in world space.
    pub fn axes(&self) -> [Vec3<T, B>; 3] {
        let m = self.rotation.to_mat3();
        [m.col(0), m.col(1), m.col(2)]
    }

    /// World-space `point` expressed in the box frame.
    pub fn to_local(&self, point: Vec3<T, B>) -> Vec3<T, B> {
        self.rotation.conjugate().rotate(point - self.center)
    }

    /// `true` when `point` lies inside or on the boundary.
    pub fn contains_point(&self, point: Vec3<T, B>) -> bool {
        let local = op::abs(self.to_local(point)).to_array();
        let half = self.half_extents.to_array();
        (0..3).all(|i| local[i] <= half[i])
    }

    /// Point of the box nearest to `point`.
    pub fn closest_point(&self, point: Vec3<T, B>) -> Vec3<T, B> {
        let local = op::clamp(self.to_local(point), -self.half_extents, self.half_extents);
        self.center + self.rotation.rotate(local)
    }

    /// `true` when the sphere touches or overlaps the box.
    pub fn intersects_sphere(&self, sphere: &Sphere<T, B>) -> bool {
        let r = sphere.radius();
        op::length_squared(sphere.center() - self.closest_point(sphere.center())) <= r * r
    }

    /// Tight axis-aligned bounds of the rotated box.
    pub fn bounding_aabb(&self) -> Aabb<T, B> {
        let [x, y, z] = self.axes();
        let h = self.half_extents;
        let reach = op::abs(x) * h.x + op::abs(y) * h.y + op::abs(z) * h.z;
        Aabb::from_center_half_extents(self.center, reach)
    }

    /// World transform mapping the cube `[-1, 1]^3` onto this box.
    pub fn to_mat4(&self) -> Mat4<T, B> {
        Mat4::translation(self.center) * self.rotation.to_mat4() * Mat4::scale(self.half_extents)
    }

    /// Separating-axis overlap test (15 candidate axes). Touching boxes
    /// overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        let a = self.axes();
        let b = other.axes();
        let ea = self.half_extents.to_array();
        let eb = other.half_extents.to_array();

        // Rotation of `other` in the frame of `self`; the epsilon keeps
        // near-parallel edge pairs from producing a null cross axis.
        let r: [[T; 3]; 3] = core::array::from_fn(|i| core::array::from_fn(|j| op::dot(a[i], b[j])));
        let abs_r: [[T; 3]; 3] =
            core::array::from_fn(|i| core::array::from_fn(|j| r[i][j].abs() + T::epsilon_high()));
        let d = other.center - self.center;
        let t: [T; 3] = core::array::from_fn(|i| op::dot(d, a[i]));

        for ((ti, e), row) in t.into_iter().zip(ea).zip(abs_r) {
            let rb = eb[0] * row[0] + eb[1] * row[1] + eb[2] * row[2];
            if ti.abs() > e + rb {
                return false;
            }
        }

        for (j, e) in eb.into_iter().enumerate() {
            let ra = ea[0] * abs_r[0][j] + ea[1] * abs_r[1][j] + ea[2] * abs_r[2][j];
            let dist = t[0] * r[0][j] + t[1] * r[1][j] + t[2] * r[2][j];
            if dist.abs() > ra + e {
                return false;
            }
        }

        for i in 0..3 {
            let (i1, i2) = ((i + 1) % 3, (i + 2) % 3);
            for j in 0..3 {
                let (j1, j2) = ((j + 1) % 3, (j + 2) % 3);
                let ra = ea[i1] * abs_r[i2][j] + ea[i2] * abs_r[i1][j];
                let rb = eb[j1] * abs_r[i][j2] + eb[j2] * abs_r[i][j1];
                let dist = t[i2] * r[i1][j] - t[i1] * r[i2][j];
                if dist.abs() > ra + rb {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_4;

    type V = Vec3<f32>;
    type Q = Quat<f32>;

    fn cube(center: V, angle_z: f32) -> Obb {
        Obb::new(center, V::one(), Q::from_axis_angle(V::unit_z(), angle_z))
    }

    #[test]
    fn rotated_box_contains_its_diagonal_tip() {
        let b = cube(V::zero(), FRAC_PI_4);
        let tip = core::f32::consts::SQRT_2 - 1e-4;
        assert!(b.contains_point(V::new(tip, 0.0, 0.0)));
        assert!(!b.contains_point(V::new(1.0, 1.0, 0.0)));
        let bounds = b.bounding_aabb();
        assert_eq!(bounds.max(), V::new(core::f32::consts::SQRT_2, core::f32::consts::SQRT_2, 1.0));
    }

    #[test]
    fn closest_point_lies_on_the_surface() {
        let b = cube(V::zero(), 0.0);
        assert_eq!(b.closest_point(V::new(5.0, 0.5, -3.0)), V::new(1.0, 0.5, -1.0));
        assert!(b.intersects_sphere(&Sphere::new(V::new(2.0, 0.0, 0.0), 1.0)));
        assert!(!b.intersects_sphere(&Sphere::new(V::new(2.0, 2.0, 0.0), 1.0)));
    }

    #[test]
    fn separating_axis_cases() {
        let a = cube(V::zero(), 0.0);
        assert!(a.overlaps(&cube(V::new(1.9, 0.0, 0.0), 0.0)));
        assert!(!a.overlaps(&cube(V::new(2.1, 0.0, 0.0), 0.0)));
        // Rotated 45°: reaches sqrt(2) towards `a`.
        assert!(a.overlaps(&cube(V::new(2.3, 0.0, 0.0), FRAC_PI_4)));
        assert!(!a.overlaps(&cube(V::new(2.5, 0.0, 0.0), FRAC_PI_4)));
        // Separated only along an edge-edge cross axis.
        let tilted = Obb::new(
            V::new(1.6, 1.6, 0.0),
            V::one(),
            Q::from_axis_angle(V::new(1.0, -1.0, 0.0), FRAC_PI_4),
        );
        assert_eq!(a.overlaps(&tilted), tilted.overlaps(&a));
    }

    #[test]
    fn unit_cube_maps_onto_the_box() {
        let b = Obb::new(V::new(1.0, 2.0, 3.0), V::new(2.0, 1.0, 1.0), Q::identity());
        let corner = b.to_mat4().transform_point(V::one());
        assert_eq!(corner, V::new(3.0, 3.0, 4.0));
        assert_eq!(Obb::from_aabb(&b.bounding_aabb()), b);
    }
}
