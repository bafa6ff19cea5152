// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use warp_math::{DefaultBackend, Element, Lanes, Mat4, Vec3};

use super::aabb::Aabb;
use super::plane::{Halfspace, Plane};
use super::sphere::Sphere;

/// Convex view volume bounded by six planes whose normals point inward.
///
/// Plane order: left, right, bottom, top, near, far.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frustum<T: Element = f32, B: Lanes<T> = DefaultBackend> {
    planes: [Plane<T, B>; 6],
}

impl<T: Element, B: Lanes<T>> Frustum<T, B> {
    /// Frustum from six inward-facing planes.
    pub fn from_planes(planes: [Plane<T, B>; 6]) -> Self {
        Self { planes }
    }

    /// Extracts the planes of a view-projection matrix whose clip-space depth
    /// range is `[0, 1]` (as produced by [`Mat4::perspective_rh`]).
    ///
    /// Returns `None` when the matrix is degenerate and a plane has no
    /// normal.
    pub fn from_view_projection(m: &Mat4<T, B>) -> Option<Self> {
        let (r0, r1, r2, r3) = (m.row(0), m.row(1), m.row(2), m.row(3));
        let [left, right, bottom, top, near, far] =
            [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r2, r3 - r2].map(Plane::from_coefficients);
        Some(Self {
            planes: [left?, right?, bottom?, top?, near?, far?],
        })
    }

    /// The bounding planes.
    pub fn planes(&self) -> &[Plane<T, B>; 6] {
        &self.planes
    }

    /// `true` when `point` lies inside or on the boundary.
    pub fn contains_point(&self, point: Vec3<T, B>) -> bool {
        self.planes
            .iter()
            .all(|p| p.signed_distance(point) >= T::zero())
    }

    /// `true` unless the sphere lies entirely outside one plane.
    pub fn intersects_sphere(&self, sphere: &Sphere<T, B>) -> bool {
        self.planes
            .iter()
            .all(|p| p.classify_sphere(sphere) != Halfspace::Back)
    }

    /// `true` unless the box lies entirely outside one plane.
    ///
    /// Conservative: a box near a frustum corner can be reported as
    /// intersecting while lying just outside.
    pub fn intersects_aabb(&self, aabb: &Aabb<T, B>) -> bool {
        self.planes
            .iter()
            .all(|p| p.classify_aabb(aabb) != Halfspace::Back)
    }

    /// `true` when the box lies entirely inside.
    pub fn contains_aabb(&self, aabb: &Aabb<T, B>) -> bool {
        self.planes
            .iter()
            .all(|p| p.classify_aabb(aabb) == Halfspace::Front)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    type V = Vec3<f32>;

    fn camera() -> Frustum {
        let proj = Mat4::<f32>::perspective_rh(FRAC_PI_2, 1.0, 1.0, 10.0);
        let view = Mat4::look_at_rh(V::zero(), V::new(0.0, 0.0, -1.0), V::unit_y());
        Frustum::from_view_projection(&(proj * view))
            .unwrap_or_else(|| unreachable!("perspective planes are well formed"))
    }

    #[test]
    fn points_inside_and_outside() {
        let f = camera();
        assert!(f.contains_point(V::new(0.0, 0.0, -5.0)));
        assert!(f.contains_point(V::new(4.0, -4.0, -5.0)));
        assert!(!f.contains_point(V::new(6.0, 0.0, -5.0)));
        assert!(!f.contains_point(V::new(0.0, 0.0, 5.0)));
        assert!(!f.contains_point(V::new(0.0, 0.0, -0.5)));
        assert!(!f.contains_point(V::new(0.0, 0.0, -11.0)));
    }

    #[test]
    fn near_plane_faces_into_the_volume() {
        let near = camera().planes()[4];
        assert_eq!(near.normal(), V::new(0.0, 0.0, -1.0));
        assert!((near.d() + 1.0).abs() < 1e-5);
    }

    #[test]
    fn spheres_and_boxes_straddling_a_side() {
        let f = camera();
        assert!(f.intersects_sphere(&Sphere::new(V::new(6.0, 0.0, -5.0), 1.5)));
        assert!(!f.intersects_sphere(&Sphere::new(V::new(6.0, 0.0, -5.0), 0.5)));
        let inside = Aabb::from_center_half_extents(V::new(0.0, 0.0, -5.0), V::one());
        let edge = Aabb::from_center_half_extents(V::new(5.0, 0.0, -5.0), V::one());
        let behind = Aabb::from_center_half_extents(V::new(0.0, 0.0, 5.0), V::one());
        assert!(f.contains_aabb(&inside));
        assert!(f.intersects_aabb(&edge) && !f.contains_aabb(&edge));
        assert!(!f.intersects_aabb(&behind));
    }

    #[test]
    fn degenerate_matrix_has_no_frustum() {
        assert_eq!(Frustum::from_view_projection(&Mat4::<f32>::zero()), None);
    }
}
