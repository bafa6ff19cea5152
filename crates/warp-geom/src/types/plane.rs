// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use warp_math::{op, DefaultBackend, Element, Lanes, Vec3, Vec4};

use super::aabb::Aabb;
use super::sphere::Sphere;

/// Side of a plane occupied by a volume.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Halfspace {
    /// Entirely on the side the normal points to.
    Front,
    /// Entirely behind the plane.
    Back,
    /// Crosses or touches the plane.
    Straddling,
}

/// Plane `dot(normal, p) + d = 0` with a unit-length normal.
///
/// Signed distances are positive on the side the normal points to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane<T: Element = f32, B: Lanes<T> = DefaultBackend> {
    normal: Vec3<T, B>,
    d: T,
}

impl<T: Element, B: Lanes<T>> Plane<T, B> {
    /// Plane from an arbitrary normal and offset; both are scaled so the
    /// normal has unit length. Returns `None` for a zero normal.
    pub fn new(normal: Vec3<T, B>, d: T) -> Option<Self> {
        let len = op::length(normal);
        if len <= T::epsilon_high() {
            return None;
        }
        Some(Self {
            normal: normal / len,
            d: d / len,
        })
    }

    /// Plane through `point` facing `normal`.
    pub fn from_point_normal(point: Vec3<T, B>, normal: Vec3<T, B>) -> Option<Self> {
        let n = Self::new(normal, T::zero())?.normal;
        Some(Self {
            normal: n,
            d: -op::dot(n, point),
        })
    }

    /// Plane through three points; the normal follows the counter-clockwise
    /// winding `a -> b -> c`. `None` for collinear points.
    pub fn from_points(a: Vec3<T, B>, b: Vec3<T, B>, c: Vec3<T, B>) -> Option<Self> {
        Self::from_point_normal(a, op::cross(b - a, c - a))
    }

    /// Plane from packed coefficients `(a, b, c, d)`.
    pub fn from_coefficients(coefficients: Vec4<T, B>) -> Option<Self> {
        Self::new(coefficients.truncate(), coefficients.w)
    }

    /// Unit normal.
    pub fn normal(&self) -> Vec3<T, B> {
        self.normal
    }

    /// Offset term `d`.
    pub fn d(&self) -> T {
        self.d
    }

    /// Same plane facing the other way.
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            d: -self.d,
        }
    }

    /// Signed distance from `point`; positive in front.
    pub fn signed_distance(&self, point: Vec3<T, B>) -> T {
        op::dot(self.normal, point) + self.d
    }

    /// Orthogonal projection of `point` onto the plane.
    pub fn project_point(&self, point: Vec3<T, B>) -> Vec3<T, B> {
        point - self.normal * self.signed_distance(point)
    }

    /// Side occupied by the sphere.
    pub fn classify_sphere(&self, sphere: &Sphere<T, B>) -> Halfspace {
        classify(self.signed_distance(sphere.center()), sphere.radius())
    }

    /// Side occupied by the box.
    pub fn classify_aabb(&self, aabb: &Aabb<T, B>) -> Halfspace {
        // Projected radius of the box onto the normal.
        let reach = op::dot(aabb.half_extents(), op::abs(self.normal));
        classify(self.signed_distance(aabb.center()), reach)
    }
}

fn classify<T: Element>(distance: T, reach: T) -> Halfspace {
    if distance > reach {
        Halfspace::Front
    } else if distance < -reach {
        Halfspace::Back
    } else {
        Halfspace::Straddling
    }
}
