// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use warp_math::{op, DefaultBackend, Element, Lanes, Vec3};

use super::aabb::Aabb;

/// Sphere given by center and non-negative radius.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere<T: Element = f32, B: Lanes<T> = DefaultBackend> {
    center: Vec3<T, B>,
    radius: T,
}

impl<T: Element, B: Lanes<T>> Sphere<T, B> {
    /// Sphere at `center`; the sign of `radius` is dropped.
    pub fn new(center: Vec3<T, B>, radius: T) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }

    /// Center.
    pub fn center(&self) -> Vec3<T, B> {
        self.center
    }

    /// Radius.
    pub fn radius(&self) -> T {
        self.radius
    }

    /// Sphere centered on the box that passes through its corners.
    pub fn from_aabb(aabb: &Aabb<T, B>) -> Self {
        Self::new(aabb.center(), op::length(aabb.half_extents()))
    }

    /// `true` when `point` lies inside or on the surface.
    pub fn contains_point(&self, point: Vec3<T, B>) -> bool {
        op::length_squared(point - self.center) <= self.radius * self.radius
    }

    /// `true` when the spheres touch or overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        let reach = self.radius + other.radius;
        op::length_squared(other.center - self.center) <= reach * reach
    }

    /// `true` when the box touches or overlaps the sphere.
    pub fn intersects_aabb(&self, aabb: &Aabb<T, B>) -> bool {
        aabb.intersects_sphere(self)
    }

    /// Tight axis-aligned bounds.
    pub fn bounding_aabb(&self) -> Aabb<T, B> {
        Aabb::from_center_half_extents(self.center, Vec3::splat(self.radius))
    }

    /// Smallest sphere containing both spheres.
    pub fn merge(&self, other: &Self) -> Self {
        let offset = other.center - self.center;
        let dist = op::length(offset);
        if dist + other.radius <= self.radius {
            return *self;
        }
        if dist + self.radius <= other.radius {
            return *other;
        }
        let radius = (dist + self.radius + other.radius) * T::half();
        let shift = (radius - self.radius) / dist.clamp_divisor();
        Self::new(self.center + offset * shift, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type V = Vec3<f32>;

    #[test]
    fn overlap_is_inclusive() {
        let a = Sphere::new(V::zero(), 1.0);
        assert!(a.overlaps(&Sphere::new(V::new(2.0, 0.0, 0.0), 1.0)));
        assert!(!a.overlaps(&Sphere::new(V::new(2.1, 0.0, 0.0), 1.0)));
        assert!(a.contains_point(V::new(0.0, -1.0, 0.0)));
    }

    #[test]
    fn negative_radius_is_made_positive() {
        assert_eq!(Sphere::new(V::zero(), -2.0).radius(), 2.0);
    }

    #[test]
    fn sphere_box_contact() {
        let s = Sphere::new(V::new(2.0, 0.5, 0.5), 1.0);
        let b = Aabb::new(V::zero(), V::one());
        assert!(s.intersects_aabb(&b));
        assert!(!Sphere::new(V::new(2.0, 2.0, 0.5), 1.0).intersects_aabb(&b));
        assert_eq!(s.bounding_aabb().min().to_array(), [1.0, -0.5, -0.5]);
    }

    #[test]
    fn merge_covers_both() {
        let a = Sphere::new(V::zero(), 1.0);
        let b = Sphere::new(V::new(4.0, 0.0, 0.0), 1.0);
        let m = a.merge(&b);
        assert_eq!(m.center(), V::new(2.0, 0.0, 0.0));
        assert_eq!(m.radius(), 3.0);
        assert_eq!(a.merge(&Sphere::new(V::new(0.2, 0.0, 0.0), 0.5)), a);
    }
}
