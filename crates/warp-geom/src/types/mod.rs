// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core collision types.
//!
//! Determinism notes:
//! - Overlap semantics are inclusive on faces.
//! - Fixed-point elements give bit-identical answers on every backend; float
//!   elements agree within the kernel's `epsilon_high`.

#[doc = "Axis-aligned bounding boxes."]
pub mod aabb;
#[doc = "View frusta as six inward-facing planes."]
pub mod frustum;
#[doc = "Oriented bounding boxes."]
pub mod obb;
#[doc = "Planes in Hessian normal form."]
pub mod plane;
#[doc = "Rays and their intersection queries."]
pub mod ray;
#[doc = "Bounding spheres."]
pub mod sphere;
#[doc = "Triangles."]
pub mod triangle;

use warp_math::{op, Element, Lanes, Vec3};

/// Component-wise minimum and maximum of a non-empty point set.
pub(crate) fn bounds<T: Element, B: Lanes<T>>(
    first: Vec3<T, B>,
    rest: impl IntoIterator<Item = Vec3<T, B>>,
) -> (Vec3<T, B>, Vec3<T, B>) {
    rest.into_iter()
        .fold((first, first), |(lo, hi), p| (op::min(lo, p), op::max(hi, p)))
}
