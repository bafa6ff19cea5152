// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Collision primitives for Echo.

This crate provides:
- Axis-aligned and oriented bounding boxes (`Aabb`, `Obb`).
- Spheres, planes, rays and triangles with overlap and intersection tests.
- View frusta extracted from a view-projection matrix (`Frustum`).

Design notes:
- Every primitive is generic over the `warp-math` element type and backend,
  so the same predicates run on `f32`, `f64` and fixed point.
- Predicates are built only on the kernel's `Vec3`/`Quat`/`Mat4`/`op`
  surface; nothing here touches raw lanes.
- Containment and overlap are inclusive on faces to avoid pair churn on
  contact boundaries.
- Degenerate inputs (zero normals, zero-length ray directions, empty point
  sets) are reported through `Option` or clamped, never panics.
"]

/// Foundational collision types.
pub mod types;

pub use types::aabb::Aabb;
pub use types::frustum::Frustum;
pub use types::obb::Obb;
pub use types::plane::{Halfspace, Plane};
pub use types::ray::Ray;
pub use types::sphere::Sphere;
pub use types::triangle::Triangle;
