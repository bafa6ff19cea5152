// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use core::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use proptest::prelude::*;
use warp_math::{op, Fx32, Fx64, ScalarBackend};

type Vec2 = warp_math::Vec2<f32>;
type Vec3 = warp_math::Vec3<f32>;
type Quat = warp_math::Quat<f32>;

fn finite3(v: Vec3) -> bool {
    v.to_array().iter().all(|c| c.is_finite())
}

#[test]
fn slerp_of_identical_vectors_is_identity() {
    for v in [Vec3::unit_x(), Vec3::new(0.3, -0.4, 0.5), Vec3::new(1e3, 2e3, -5e2)] {
        for t in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(op::slerp(v, v, t), v, "slerp({v:?}, {v:?}, {t})");
        }
    }
}

#[test]
fn slerp_of_identical_axis_aligned_fixed_vectors_is_exact() {
    type F = Fx32<16>;
    let v = warp_math::Vec3::<F, ScalarBackend>::new(F::zero(), F::from_int(2), F::zero());
    assert_eq!(op::slerp(v, v, F::from_f64(0.5)).to_array(), v.to_array());
}

#[test]
fn slerp_holds_with_three_integer_bits() {
    let h = core::f64::consts::FRAC_1_SQRT_2;

    type A = Fx32<29>;
    let (x, y) = (warp_math::Vec3::<A>::unit_x(), warp_math::Vec3::<A>::unit_y());
    let mid = op::slerp(x, y, A::from_f64(0.5));
    assert!((mid.x.to_f64() - h).abs() < 1e-3, "{mid:?}");
    assert!((mid.y.to_f64() - h).abs() < 1e-3, "{mid:?}");
    let obtuse = op::angle(x, y - x).to_f64();
    assert!((obtuse - 0.75 * core::f64::consts::PI).abs() < 1e-3);

    type B = Fx64<61>;
    let (x, y) = (warp_math::Vec3::<B>::unit_x(), warp_math::Vec3::<B>::unit_y());
    let mid = op::slerp(x, y, B::from_f64(0.5));
    assert!((mid.x.to_f64() - h).abs() < 1e-3, "{mid:?}");
    assert!((mid.y.to_f64() - h).abs() < 1e-3, "{mid:?}");
}

#[test]
fn slerp_keeps_unit_length_along_the_arc() {
    let (a, b) = (Vec3::unit_x(), Vec3::new(0.0, 0.6, 0.8));
    for t in (0_u8..=8).map(|i| f32::from(i) / 8.0) {
        let s = op::slerp(a, b, t);
        assert!((op::length(s) - 1.0).abs() < 1e-4, "t={t}: {s:?}");
        assert!((op::angle(a, s) - t * FRAC_PI_2).abs() < 1e-3);
    }
}

#[test]
fn slerp_of_antiparallel_vectors_stays_finite() {
    let s = op::slerp(Vec3::unit_x(), -Vec3::unit_x(), 0.5);
    assert!(finite3(s));
}

#[test]
fn normalize_of_zero_is_finite() {
    assert!(finite3(op::normalize(Vec3::zero())));
    assert_eq!(Vec2::zero().normalize(), Vec2::zero());
    type F = Fx64<32>;
    let zero = warp_math::Vec3::<F, ScalarBackend>::zero();
    assert_eq!(op::normalize(zero), zero);
}

#[test]
fn move_slerp_lands_exactly_on_target() {
    let target = Vec3::new(0.0, 0.6, 0.8);
    let landed = op::move_slerp(Vec3::unit_x(), target, PI);
    assert_eq!(landed.to_array(), target.to_array());
    let already = op::move_slerp(target, target, 0.0);
    assert_eq!(already.to_array(), target.to_array());
}

#[test]
fn move_slerp_converges_in_bounded_steps() {
    let target = Vec3::new(-0.2, 0.9, 0.1).normalize();
    let mut current = Vec3::unit_z();
    let mut steps = 0;
    while current.to_array() != target.to_array() {
        current = op::move_slerp(current, target, FRAC_PI_4 / 2.0);
        steps += 1;
        assert!(steps <= 32, "no convergence: {current:?}");
    }
    assert!(steps >= 2);
}

#[test]
fn move_towards_never_overshoots() {
    let target = Vec3::new(10.0, 0.0, 0.0);
    let mut p = Vec3::zero();
    for _ in 0..6 {
        p = op::move_towards(p, target, 3.0);
        assert!(p.x <= 10.0);
    }
    assert_eq!(p.to_array(), target.to_array());
}

#[test]
fn quat_slerp_takes_the_short_way() {
    let a = Quat::from_axis_angle(Vec3::unit_y(), 0.1);
    let b = -Quat::from_axis_angle(Vec3::unit_y(), 0.5);
    let mid = a.slerp(b, 0.5);
    let expected = Quat::from_axis_angle(Vec3::unit_y(), 0.3);
    assert!((mid.dot(expected).abs() - 1.0).abs() < 1e-5, "{mid:?}");
    assert_eq!(a.slerp(a, 0.7), a);
    assert!((a.nlerp(b, 0.5).length() - 1.0).abs() < 1e-5);
}

proptest! {
    #[test]
    fn lerp_hits_endpoints(a in prop::array::uniform3(-1e3_f32..1e3), b in prop::array::uniform3(-1e3_f32..1e3)) {
        let (a, b) = (Vec3::from_array(a), Vec3::from_array(b));
        prop_assert_eq!(op::lerp(a, b, 0.0).to_array(), a.to_array());
        prop_assert!(op::distance(op::lerp(a, b, 1.0), b) < 1e-3);
    }

    #[test]
    fn move_towards_respects_max_delta(
        a in prop::array::uniform3(-1e3_f32..1e3),
        b in prop::array::uniform3(-1e3_f32..1e3),
        max_delta in 0.0_f32..100.0,
    ) {
        let (a, b) = (Vec3::from_array(a), Vec3::from_array(b));
        let moved = op::move_towards(a, b, max_delta);
        prop_assert!(op::distance(a, moved) <= max_delta + 1e-3);
        prop_assert!(op::distance(moved, b) <= op::distance(a, b) + 1e-3);
    }

    #[test]
    fn smoothstep_stays_in_unit_range(x in -10.0_f32..10.0) {
        let s = op::smoothstep(Vec2::splat(-1.0), Vec2::splat(1.0), Vec2::splat(x));
        prop_assert!((0.0..=1.0).contains(&s.x));
    }
}
