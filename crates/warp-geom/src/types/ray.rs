// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use warp_math::{op, DefaultBackend, Element, Lanes, Vec3};

use super::aabb::Aabb;
use super::plane::Plane;
use super::sphere::Sphere;
use super::triangle::Triangle;

/// Half-line `origin + t * direction`, `t >= 0`, with a unit direction.
///
/// Every `intersect_*` query returns the smallest non-negative `t` at which
/// the ray meets the target. Because the direction has unit length, `t` is
/// also the distance from the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray<T: Element = f32, B: Lanes<T> = DefaultBackend> {
    origin: Vec3<T, B>,
    direction: Vec3<T, B>,
}

impl<T: Element, B: Lanes<T>> Ray<T, B> {
    /// Ray from `origin` along `direction` (normalized here). `None` when the
    /// direction has zero length.
    pub fn new(origin: Vec3<T, B>, direction: Vec3<T, B>) -> Option<Self> {
        if op::length_squared(direction) <= T::epsilon_high() {
            return None;
        }
        Some(Self {
            origin,
            direction: op::normalize(direction),
        })
    }

    /// Origin.
    pub fn origin(&self) -> Vec3<T, B> {
        self.origin
    }

    /// Unit direction.
    pub fn direction(&self) -> Vec3<T, B> {
        self.direction
    }

    /// Point at parameter `t`.
    pub fn at(&self, t: T) -> Vec3<T, B> {
        self.origin + self.direction * t
    }

    /// Hit against a plane; `None` when parallel or behind the origin.
    pub fn intersect_plane(&self, plane: &Plane<T, B>) -> Option<T> {
        let denom = op::dot(plane.normal(), self.direction);
        if denom.abs() <= T::epsilon_high() {
            return None;
        }
        let t = -plane.signed_distance(self.origin) / denom;
        (t >= T::zero()).then_some(t)
    }

    /// Hit against a sphere. An origin inside the sphere hits at `t = 0`.
    pub fn intersect_sphere(&self, sphere: &Sphere<T, B>) -> Option<T> {
        let m = self.origin - sphere.center();
        let b = op::dot(m, self.direction);
        let c = op::length_squared(m) - sphere.radius() * sphere.radius();
        if c > T::zero() && b > T::zero() {
            return None;
        }
        let discriminant = b * b - c;
        if discriminant < T::zero() {
            return None;
        }
        Some((-b - discriminant.sqrt()).max(T::zero()))
    }

    /// Hit against a box by the slab method. An origin inside the box hits
    /// at `t = 0`.
    pub fn intersect_aabb(&self, aabb: &Aabb<T, B>) -> Option<T> {
        let slabs = self
            .origin
            .to_array()
            .into_iter()
            .zip(self.direction.to_array())
            .zip(aabb.min().to_array().into_iter().zip(aabb.max().to_array()));

        let mut t_near = T::zero();
        let mut t_far: Option<T> = None;
        for ((origin, direction), (lo, hi)) in slabs {
            if direction == T::zero() {
                // Parallel to this slab: the origin must already lie within it.
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }
            let inv = T::one() / direction;
            let t1 = (lo - origin) * inv;
            let t2 = (hi - origin) * inv;
            let (enter, exit) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            t_near = t_near.max(enter);
            let far = t_far.map_or(exit, |f| f.min(exit));
            if t_near > far {
                return None;
            }
            t_far = Some(far);
        }
        Some(t_near)
    }

    /// Hit against a triangle (Möller–Trumbore), from either side.
    pub fn intersect_triangle(&self, triangle: &Triangle<T, B>) -> Option<T> {
        let [a, b, c] = triangle.vertices();
        let (e1, e2) = (b - a, c - a);
        let p = op::cross(self.direction, e2);
        let det = op::dot(e1, p);
        if det.abs() <= T::epsilon_high() {
            return None;
        }
        let inv_det = T::one() / det;
        let s = self.origin - a;
        let u = op::dot(s, p) * inv_det;
        if u < T::zero() || u > T::one() {
            return None;
        }
        let q = op::cross(s, e1);
        let v = op::dot(self.direction, q) * inv_det;
        if v < T::zero() || u + v > T::one() {
            return None;
        }
        let t = op::dot(e2, q) * inv_det;
        (t >= T::zero()).then_some(t)
    }
}
