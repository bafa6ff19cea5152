// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Free-function operations over every [`Vector`] type.
//!
//! Each function is written once against [`Lanes`], so it monomorphizes to
//! the backend and element type of its arguments. Reductions (`dot`,
//! `length`) sum lanes in the fixed order `(x + z) + (y + w)` on every
//! backend.
//!
//! All functions are total. Degenerate inputs are handled by clamping every
//! divisor to at least [`Element::min_positive`] and by selecting between
//! alternatives with [`step`]-style masks instead of branches:
//!
//! - `normalize(zero)` is zero;
//! - `slerp` falls back to `lerp` when `sin(angle) < epsilon_low`;
//! - `move_slerp` nudges exactly opposite vectors off the antipode first;
//! - `smoothstep` with `edge0 == edge1` is a hard step.

use crate::element::Element;
use crate::simd::Lanes;
use crate::vec::{Vec3, Vector};

/// Angle (radians) by which `move_slerp` rotates a vector that points
/// directly away from its target.
pub const ANTIPODAL_NUDGE: f64 = 0.01;

type Reg<V> = <<V as Vector>::Backend as Lanes<<V as Vector>::Elem>>::Reg;

macro_rules! lane {
    ($v:ident :: $f:ident) => {
        <<$v as Vector>::Backend as Lanes<<$v as Vector>::Elem>>::$f
    };
}

fn splat<V: Vector>(value: V::Elem) -> Reg<V> {
    lane!(V::splat)(value)
}

fn map<V: Vector>(v: V, f: impl FnOnce(Reg<V>) -> Reg<V>) -> V {
    V::from_reg(f(v.to_reg()))
}

fn zip<V: Vector>(a: V, b: V, f: impl FnOnce(Reg<V>, Reg<V>) -> Reg<V>) -> V {
    V::from_reg(f(a.to_reg(), b.to_reg()))
}

fn add<V: Vector>(a: V, b: V) -> V {
    zip(a, b, lane!(V::add))
}

fn sub<V: Vector>(a: V, b: V) -> V {
    zip(a, b, lane!(V::sub))
}

fn scale<V: Vector>(v: V, s: V::Elem) -> V {
    map(v, |r| lane!(V::mul)(r, splat::<V>(s)))
}

/// `a * wa + b * wb`.
fn weighted<V: Vector>(a: V, wa: V::Elem, b: V, wb: V::Elem) -> V {
    add(scale(a, wa), scale(b, wb))
}

/// Exact select: `a` when `mask == 1`, `b` when `mask == 0`.
pub(crate) fn select<V: Vector>(mask: V::Elem, a: V, b: V) -> V {
    weighted(a, mask, b, V::Elem::one() - mask)
}

/// Dot product over the used lanes.
pub fn dot<V: Vector>(a: V, b: V) -> V::Elem {
    lane!(V::sum)(lane!(V::mul)(a.to_reg(), b.to_reg()), V::LANES)
}

/// Cross product `a × b` (right-handed).
pub fn cross<T: Element, B: Lanes<T>>(a: Vec3<T, B>, b: Vec3<T, B>) -> Vec3<T, B> {
    let a_yzx = Vec3::<T, B>::new(a.y, a.z, a.x).to_reg();
    let a_zxy = Vec3::<T, B>::new(a.z, a.x, a.y).to_reg();
    let b_yzx = Vec3::<T, B>::new(b.y, b.z, b.x).to_reg();
    let b_zxy = Vec3::<T, B>::new(b.z, b.x, b.y).to_reg();
    Vec3::from_reg(B::sub(B::mul(a_yzx, b_zxy), B::mul(a_zxy, b_yzx)))
}

/// Squared Euclidean length.
pub fn length_squared<V: Vector>(v: V) -> V::Elem {
    dot(v, v)
}

/// Euclidean length.
pub fn length<V: Vector>(v: V) -> V::Elem {
    dot(v, v).sqrt()
}

/// Distance between two points.
pub fn distance<V: Vector>(a: V, b: V) -> V::Elem {
    length(sub(b, a))
}

/// Unit vector in the direction of `v`.
///
/// Scales by `rsqrt(max(|v|², min_positive))`, so the zero vector maps to
/// the zero vector.
pub fn normalize<V: Vector>(v: V) -> V {
    scale(v, dot(v, v).rsqrt())
}

/// Linear interpolation `a + (b - a) * t`. `t` is not clamped.
pub fn lerp<V: Vector>(a: V, b: V, t: V::Elem) -> V {
    add(a, scale(sub(b, a), t))
}

/// `normalize(lerp(a, b, t))`.
pub fn nlerp<V: Vector>(a: V, b: V, t: V::Elem) -> V {
    normalize(lerp(a, b, t))
}

/// Interpolates along the arc between `a` and `b` given the cosine of the
/// angle between them.
///
/// Uses the spherical weights when `sin(angle) >= epsilon_low` and plain
/// `lerp` otherwise. The choice is a mask multiply, not a branch.
pub(crate) fn slerp_with_cos<V: Vector>(a: V, b: V, cos: V::Elem, t: V::Elem) -> V {
    let one = V::Elem::one();
    let omega = cos.clamp(-one, one).acos();
    let sin_omega = omega.sin();
    let spherical = V::Elem::step(V::Elem::epsilon_low(), sin_omega);
    let inv_sin = one / sin_omega.max(V::Elem::min_positive());
    let wa = ((one - t) * omega).sin() * inv_sin * spherical;
    let wb = (t * omega).sin() * inv_sin * spherical;
    select(spherical, weighted(a, wa, b, wb), lerp(a, b, t))
}

/// Spherical linear interpolation between two directions.
///
/// Magnitudes are interpolated by the same weights. Nearly parallel inputs
/// (and nearly opposite ones, where no unique arc exists) fall back to
/// [`lerp`], so `slerp(a, a, t) == a` for every `t`.
pub fn slerp<V: Vector>(a: V, b: V, t: V::Elem) -> V {
    let lengths = (length(a) * length(b)).max(V::Elem::min_positive());
    slerp_with_cos(a, b, dot(a, b) / lengths, t)
}

/// Moves `current` towards `target` by at most `max_delta`.
///
/// Returns `target` exactly once it is within reach.
pub fn move_towards<V: Vector>(current: V, target: V, max_delta: V::Elem) -> V {
    let delta = sub(target, current);
    let dist = length(delta);
    let arrived = V::Elem::step(dist, max_delta);
    let t = max_delta / dist.max(V::Elem::min_positive());
    select(arrived, target, add(current, scale(delta, t)))
}

/// Rodrigues rotation of `v` about the unit `axis`.
fn rotate_about<T: Element, B: Lanes<T>>(v: Vec3<T, B>, axis: Vec3<T, B>, sin: T, cos: T) -> Vec3<T, B> {
    let along = scale(axis, dot(axis, v) * (T::one() - cos));
    add(add(scale(v, cos), scale(cross(axis, v), sin)), along)
}

/// Rotates `current` towards `target` by at most `max_angle` radians.
///
/// Returns `target` exactly once the remaining angle is within reach.
/// When the two point in opposite directions, `current` is first rotated by
/// [`ANTIPODAL_NUDGE`] about a perpendicular axis so the arc is well defined.
pub fn move_slerp<T: Element, B: Lanes<T>>(current: Vec3<T, B>, target: Vec3<T, B>, max_angle: T) -> Vec3<T, B> {
    let one = T::one();
    let dir = normalize(current);
    let goal = normalize(target);
    let angle = dot(dir, goal).clamp(-one, one).acos();

    let antipodal = T::step(dot(dir, goal), T::epsilon_low() - one);
    let use_y = T::step(T::half(), dir.x.abs());
    let seed = select(use_y, Vec3::<T, B>::unit_y(), Vec3::unit_x());
    let axis = normalize(cross(dir, seed));
    let nudged = rotate_about(
        current,
        axis,
        T::from_f64(libm::sin(ANTIPODAL_NUDGE)),
        T::from_f64(libm::cos(ANTIPODAL_NUDGE)),
    );
    let start = select(antipodal, nudged, current);

    let remaining = normalize(start);
    let remaining = dot(remaining, goal).clamp(-one, one).acos();
    let t = (max_angle / remaining.max(T::min_positive())).min(one);
    let arrived = T::step(angle, max_angle);
    select(arrived, target, slerp(start, target, t))
}

/// Component-wise minimum.
pub fn min<V: Vector>(a: V, b: V) -> V {
    zip(a, b, lane!(V::min))
}

/// Component-wise maximum.
pub fn max<V: Vector>(a: V, b: V) -> V {
    zip(a, b, lane!(V::max))
}

/// Component-wise clamp into `[lo, hi]`.
pub fn clamp<V: Vector>(v: V, lo: V, hi: V) -> V {
    min(max(v, lo), hi)
}

/// Component-wise absolute value.
pub fn abs<V: Vector>(v: V) -> V {
    map(v, lane!(V::abs))
}

/// Component-wise `±1` from the sign bit (`sign(-0.0) == -1`).
pub fn sign<V: Vector>(v: V) -> V {
    map(v, lane!(V::sign))
}

/// Component-wise floor.
pub fn floor<V: Vector>(v: V) -> V {
    map(v, lane!(V::floor))
}

/// Component-wise ceiling.
pub fn ceil<V: Vector>(v: V) -> V {
    map(v, lane!(V::ceil))
}

/// Component-wise round, halfway cases away from zero.
pub fn round<V: Vector>(v: V) -> V {
    map(v, lane!(V::round))
}

/// Component-wise `x >= edge ? 1 : 0`.
pub fn step<V: Vector>(edge: V, x: V) -> V {
    zip(edge, x, lane!(V::step))
}

/// Component-wise Hermite smoothstep between `edge0` and `edge1`.
///
/// The range is clamped away from zero (keeping its sign), so equal edges
/// give a hard step instead of a division by zero.
pub fn smoothstep<V: Vector>(edge0: V, edge1: V, x: V) -> V {
    let zero = splat::<V>(V::Elem::zero());
    let one = V::Elem::one();
    let range = sub(edge1, edge0).to_reg();
    let floor = splat::<V>(V::Elem::min_positive());
    let safe = lane!(V::mul)(lane!(V::sign)(range), lane!(V::max)(lane!(V::abs)(range), floor));
    let t = lane!(V::div)(sub(x, edge0).to_reg(), safe);
    let t = lane!(V::min)(lane!(V::max)(t, zero), splat::<V>(one));
    let three_minus_2t = lane!(V::sub)(splat::<V>(one + V::Elem::two()), lane!(V::mul)(splat::<V>(V::Elem::two()), t));
    V::from_reg(lane!(V::mul)(lane!(V::mul)(t, t), three_minus_2t))
}

/// Component-wise `1 / sqrt(max(v, min_positive))`.
pub fn rsqrt<V: Vector>(v: V) -> V {
    map(v, lane!(V::rsqrt))
}

/// Reflects `v` about the plane with unit normal `n`.
pub fn reflect<V: Vector>(v: V, n: V) -> V {
    sub(v, scale(n, V::Elem::two() * dot(v, n)))
}

/// Unsigned angle between two vectors in radians, `[0, π]`.
pub fn angle<V: Vector>(a: V, b: V) -> V::Elem {
    let one = V::Elem::one();
    let lengths = (length(a) * length(b)).max(V::Elem::min_positive());
    (dot(a, b) / lengths).clamp(-one, one).acos()
}
