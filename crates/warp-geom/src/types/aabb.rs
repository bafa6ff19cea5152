// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use warp_math::{op, DefaultBackend, Element, Lanes, Mat4, Vec3};

use super::bounds;
use super::sphere::Sphere;

/// Axis-aligned bounding box.
///
/// Invariants:
/// - `min` components are less than or equal to `max` components.
/// - Containment and overlap are inclusive on faces.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb<T: Element = f32, B: Lanes<T> = DefaultBackend> {
    min: Vec3<T, B>,
    max: Vec3<T, B>,
}

impl<T: Element, B: Lanes<T>> Aabb<T, B> {
    /// Box spanned by two opposite corners, given in any order.
    pub fn new(a: Vec3<T, B>, b: Vec3<T, B>) -> Self {
        Self {
            min: op::min(a, b),
            max: op::max(a, b),
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3<T, B> {
        self.min
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3<T, B> {
        self.max
    }

    /// Box centered at `center` with the given half-extents (signs ignored).
    pub fn from_center_half_extents(center: Vec3<T, B>, half_extents: Vec3<T, B>) -> Self {
        let he = op::abs(half_extents);
        Self {
            min: center - he,
            max: center + he,
        }
    }

    /// Smallest box containing every point, or `None` for an empty slice.
    pub fn from_points(points: &[Vec3<T, B>]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (min, max) = bounds(*first, rest.iter().copied());
        Some(Self { min, max })
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Vec3<T, B> {
        (self.min + self.max) * T::half()
    }

    /// Half of the edge lengths.
    pub fn half_extents(&self) -> Vec3<T, B> {
        (self.max - self.min) * T::half()
    }

    /// Edge lengths.
    pub fn size(&self) -> Vec3<T, B> {
        self.max - self.min
    }

    /// `true` when `point` lies inside or on the boundary.
    pub fn contains_point(&self, point: Vec3<T, B>) -> bool {
        op::clamp(point, self.min, self.max).to_array() == point.to_array()
    }

    /// `true` when this box overlaps `other` (inclusive on faces).
    pub fn overlaps(&self, other: &Self) -> bool {
        let (a_min, a_max) = (self.min.to_array(), self.max.to_array());
        let (b_min, b_max) = (other.min.to_array(), other.max.to_array());
        (0..3).all(|i| a_max[i] >= b_min[i] && a_min[i] <= b_max[i])
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: op::min(self.min, other.min),
            max: op::max(self.max, other.max),
        }
    }

    /// Overlapping region, or `None` when the boxes are disjoint.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        self.overlaps(other).then(|| Self {
            min: op::max(self.min, other.min),
            max: op::min(self.max, other.max),
        })
    }

    /// Grows the box by `margin` on every side.
    pub fn inflate(&self, margin: T) -> Self {
        let delta = Vec3::splat(margin);
        Self::new(self.min - delta, self.max + delta)
    }

    /// Point of the box nearest to `point`.
    pub fn closest_point(&self, point: Vec3<T, B>) -> Vec3<T, B> {
        op::clamp(point, self.min, self.max)
    }

    /// Squared distance from `point` to the box; zero inside.
    pub fn distance_squared_to_point(&self, point: Vec3<T, B>) -> T {
        op::length_squared(point - self.closest_point(point))
    }

    /// `true` when the sphere touches or overlaps the box.
    pub fn intersects_sphere(&self, sphere: &Sphere<T, B>) -> bool {
        let r = sphere.radius();
        self.distance_squared_to_point(sphere.center()) <= r * r
    }

    /// The eight corners, `x` varying slowest.
    pub fn corners(&self) -> [Vec3<T, B>; 8] {
        let (lo, hi) = (self.min, self.max);
        core::array::from_fn(|i| {
            Vec3::new(
                if i & 4 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 1 == 0 { lo.z } else { hi.z },
            )
        })
    }

    /// Box bounding this one after the affine transform `mat`.
    ///
    /// Evaluates the eight corners under `mat` and re-bounds them.
    pub fn transformed(&self, mat: &Mat4<T, B>) -> Self {
        let [first, rest @ ..] = self.corners().map(|c| mat.transform_point(c));
        let (min, max) = bounds(first, rest);
        Self { min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type V = Vec3<f32>;

    #[test]
    fn corners_are_sorted_on_construction() {
        let b = Aabb::new(V::new(1.0, -1.0, 2.0), V::new(-1.0, 1.0, 0.0));
        assert_eq!(b.min().to_array(), [-1.0, -1.0, 0.0]);
        assert_eq!(b.max().to_array(), [1.0, 1.0, 2.0]);
        assert_eq!(b.center().to_array(), [0.0, 0.0, 1.0]);
        assert_eq!(b.size().to_array(), [2.0, 2.0, 2.0]);
    }

    #[test]
    fn touching_faces_overlap() {
        let a = Aabb::from_center_half_extents(V::zero(), V::one());
        let b = Aabb::from_center_half_extents(V::new(2.0, 0.0, 0.0), V::one());
        let c = Aabb::from_center_half_extents(V::new(2.5, 0.0, 0.0), V::one());
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert_eq!(a.intersection(&c), None);
        let i = a.intersection(&b).map(|i| i.size().to_array());
        assert_eq!(i, Some([0.0, 2.0, 2.0]));
    }

    #[test]
    fn empty_point_set_has_no_bounds() {
        assert_eq!(Aabb::<f32>::from_points(&[]), None);
        let b = Aabb::from_points(&[V::new(1.0, 5.0, -2.0), V::new(-3.0, 0.0, 4.0), V::zero()]);
        assert_eq!(b, Some(Aabb::new(V::new(-3.0, 0.0, -2.0), V::new(1.0, 5.0, 4.0))));
    }

    #[test]
    fn closest_point_and_distance() {
        let b = Aabb::new(V::zero(), V::one());
        assert_eq!(b.closest_point(V::new(2.0, 0.5, -1.0)).to_array(), [1.0, 0.5, 0.0]);
        assert_eq!(b.distance_squared_to_point(V::new(3.0, 0.5, 0.5)), 4.0);
        assert_eq!(b.distance_squared_to_point(V::splat(0.5)), 0.0);
        assert!(b.contains_point(V::one()));
        assert!(!b.contains_point(V::new(1.0, 1.0, 1.01)));
    }

    #[test]
    fn transformed_box_covers_rotated_corners() {
        let b = Aabb::from_center_half_extents(V::new(1.0, 0.0, 0.0), V::new(1.0, 0.1, 0.1));
        let m = Mat4::<f32>::rotation_z(core::f32::consts::FRAC_PI_2);
        let t = b.transformed(&m);
        assert_eq!(t.min(), V::new(-0.1, 0.0, -0.1));
        assert_eq!(t.max(), V::new(0.1, 2.0, 0.1));
    }
}
