// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use core::f32::consts::{FRAC_PI_2, FRAC_PI_3};
type Mat3 = warp_math::Mat3<f32>;
type Mat4 = warp_math::Mat4<f32>;
type Quat = warp_math::Quat<f32>;
type Vec3 = warp_math::Vec3<f32>;

fn approx_eq3(a: [f32; 3], b: [f32; 3]) {
    const ABS_TOL: f32 = 1e-6;
    const REL_TOL: f32 = 1e-5;
    for i in 0..3 {
        let ai = a[i];
        let bi = b[i];
        let diff = (ai - bi).abs();
        let scale = ai.abs().max(bi.abs());
        let tol = ABS_TOL.max(REL_TOL * scale);
        assert!(
            diff <= tol,
            "index {i}: {a:?} vs {b:?}, diff={diff}, tol={tol} (scale={scale})"
        );
    }
}

#[test]
fn rot_z_maps_x_to_y() {
    let y = Mat4::rotation_z(FRAC_PI_2).transform_direction(Vec3::unit_x());
    approx_eq3(y.to_array(), [0.0, 1.0, 0.0]);
}

#[test]
fn rot_y_maps_z_to_x() {
    let x = Mat4::rotation_y(FRAC_PI_2).transform_direction(Vec3::unit_z());
    approx_eq3(x.to_array(), [1.0, 0.0, 0.0]);
}

#[test]
fn rot_x_maps_y_to_z() {
    let z = Mat4::rotation_x(FRAC_PI_2).transform_direction(Vec3::unit_y());
    approx_eq3(z.to_array(), [0.0, 0.0, 1.0]);
}

#[test]
fn axis_angle_matches_axis_specific_rotation() {
    let aa = Mat4::from_axis_angle(Vec3::unit_y(), FRAC_PI_2);
    let ry = Mat4::rotation_y(FRAC_PI_2);
    let v = Vec3::unit_z();
    approx_eq3(
        aa.transform_direction(v).to_array(),
        ry.transform_direction(v).to_array(),
    );
}

#[test]
fn euler_matches_axis_specific_rotations() {
    // Yaw only
    let e = Mat4::rotation_from_euler(FRAC_PI_2, 0.0, 0.0);
    let y = Mat4::rotation_y(FRAC_PI_2);
    approx_eq3(
        e.transform_direction(Vec3::unit_z()).to_array(),
        y.transform_direction(Vec3::unit_z()).to_array(),
    );

    // Pitch only
    let e = Mat4::rotation_from_euler(0.0, FRAC_PI_2, 0.0);
    let x = Mat4::rotation_x(FRAC_PI_2);
    approx_eq3(
        e.transform_direction(Vec3::unit_y()).to_array(),
        x.transform_direction(Vec3::unit_y()).to_array(),
    );

    // Roll only
    let e = Mat4::rotation_from_euler(0.0, 0.0, FRAC_PI_2);
    let z = Mat4::rotation_z(FRAC_PI_2);
    approx_eq3(
        e.transform_direction(Vec3::unit_x()).to_array(),
        z.transform_direction(Vec3::unit_x()).to_array(),
    );
}

#[test]
fn quat_euler_matches_matrix_euler() {
    let (yaw, pitch, roll) = (0.4, -1.1, FRAC_PI_3);
    let q = Quat::from_euler(yaw, pitch, roll);
    let m = Mat3::rotation_from_euler(yaw, pitch, roll);
    let v = Vec3::new(0.25, -2.0, 1.5);
    approx_eq3(q.rotate(v).to_array(), (m * v).to_array());
    approx_eq3((q * v).to_array(), q.to_mat4().transform_direction(v).to_array());
}

#[test]
fn axis_angle_round_trip() {
    let axis = Vec3::new(1.0, -2.0, 0.5).normalize();
    let q = Quat::from_axis_angle(axis, 1.25);
    let (back_axis, back_angle) = q.to_axis_angle();
    approx_eq3(back_axis.to_array(), axis.to_array());
    assert!((back_angle - 1.25).abs() < 1e-5);
}

#[test]
fn quat_inverse_undoes_rotation() {
    let q = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 1.0), 0.7);
    let v = Vec3::new(3.0, -1.0, 2.0);
    approx_eq3(q.inverse().rotate(q.rotate(v)).to_array(), v.to_array());
    approx_eq3((q * q.conjugate()).xyz().to_array(), [0.0; 3]);
}

#[test]
fn zero_axis_gives_identity() {
    let q = Quat::from_axis_angle(Vec3::zero(), 1.0);
    assert_eq!(q, Quat::identity());
    assert_eq!(Mat3::from_axis_angle(Vec3::zero(), 1.0), Mat3::identity());
}

#[test]
fn quat_and_matrix_compose_in_the_same_order() {
    let a = Quat::from_axis_angle(Vec3::unit_x(), 0.3);
    let b = Quat::from_axis_angle(Vec3::unit_z(), -0.9);
    let v = Vec3::new(1.0, 2.0, 3.0);
    let via_quat = (a * b).rotate(v);
    let via_mat = (a.to_mat3() * b.to_mat3()) * v;
    approx_eq3(via_quat.to_array(), via_mat.to_array());
    approx_eq3(via_quat.to_array(), a.rotate(b.rotate(v)).to_array());
}
