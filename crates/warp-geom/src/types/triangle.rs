// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use warp_math::{op, DefaultBackend, Element, Lanes, Vec3};

use super::aabb::Aabb;
use super::plane::Plane;

/// Triangle `a, b, c`; the front face follows counter-clockwise winding.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle<T: Element = f32, B: Lanes<T> = DefaultBackend> {
    a: Vec3<T, B>,
    b: Vec3<T, B>,
    c: Vec3<T, B>,
}

impl<T: Element, B: Lanes<T>> Triangle<T, B> {
    /// Triangle from its vertices.
    pub fn new(a: Vec3<T, B>, b: Vec3<T, B>, c: Vec3<T, B>) -> Self {
        Self { a, b, c }
    }

    /// Vertices in winding order.
    pub fn vertices(&self) -> [Vec3<T, B>; 3] {
        [self.a, self.b, self.c]
    }

    /// Unit face normal; zero for a degenerate triangle.
    pub fn normal(&self) -> Vec3<T, B> {
        op::normalize(op::cross(self.b - self.a, self.c - self.a))
    }

    /// Surface area.
    pub fn area(&self) -> T {
        op::length(op::cross(self.b - self.a, self.c - self.a)) * T::half()
    }

    /// Mean of the vertices.
    pub fn centroid(&self) -> Vec3<T, B> {
        (self.a + self.b + self.c) / (T::one() + T::two())
    }

    /// Supporting plane, or `None` when the vertices are collinear.
    pub fn plane(&self) -> Option<Plane<T, B>> {
        Plane::from_points(self.a, self.b, self.c)
    }

    /// Tight axis-aligned bounds.
    pub fn bounding_aabb(&self) -> Aabb<T, B> {
        let (min, max) = super::bounds(self.a, [self.b, self.c]);
        Aabb::new(min, max)
    }

    /// Barycentric weights `(u, v, w)` of `point` projected onto the
    /// triangle's plane, with `point ≈ u*a + v*b + w*c`. A degenerate
    /// triangle yields finite but meaningless weights.
    pub fn barycentric(&self, point: Vec3<T, B>) -> Vec3<T, B> {
        let (v0, v1, v2) = (self.b - self.a, self.c - self.a, point - self.a);
        let (d00, d01, d11) = (op::dot(v0, v0), op::dot(v0, v1), op::dot(v1, v1));
        let (d20, d21) = (op::dot(v2, v0), op::dot(v2, v1));
        let inv = T::one() / (d00 * d11 - d01 * d01).clamp_divisor();
        let v = (d11 * d20 - d01 * d21) * inv;
        let w = (d00 * d21 - d01 * d20) * inv;
        Vec3::new(T::one() - v - w, v, w)
    }

    /// `true` when the projection of `point` onto the plane falls inside
    /// the triangle or on its edges.
    pub fn contains_projection(&self, point: Vec3<T, B>) -> bool {
        let weights = self.barycentric(point);
        weights.to_array().iter().all(|&c| c >= T::zero())
    }

    /// Point of the triangle nearest to `point`, by Voronoi-region
    /// classification.
    pub fn closest_point(&self, point: Vec3<T, B>) -> Vec3<T, B> {
        let (a, b, c) = (self.a, self.b, self.c);
        let zero = T::zero();
        let (ab, ac, ap) = (b - a, c - a, point - a);

        let (d1, d2) = (op::dot(ab, ap), op::dot(ac, ap));
        if d1 <= zero && d2 <= zero {
            return a;
        }

        let bp = point - b;
        let (d3, d4) = (op::dot(ab, bp), op::dot(ac, bp));
        if d3 >= zero && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= zero && d1 >= zero && d3 <= zero {
            return a + ab * (d1 / (d1 - d3).clamp_divisor());
        }

        let cp = point - c;
        let (d5, d6) = (op::dot(ab, cp), op::dot(ac, cp));
        if d6 >= zero && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= zero && d2 >= zero && d6 <= zero {
            return a + ac * (d2 / (d2 - d6).clamp_divisor());
        }

        let va = d3 * d6 - d5 * d4;
        if va <= zero && d4 - d3 >= zero && d5 - d6 >= zero {
            let t = (d4 - d3) / ((d4 - d3) + (d5 - d6)).clamp_divisor();
            return b + (c - b) * t;
        }

        let inv = T::one() / (va + vb + vc).clamp_divisor();
        a + ab * (vb * inv) + ac * (vc * inv)
    }
}
