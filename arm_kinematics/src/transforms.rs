//! Elementary rotations and angle helpers shared by forward and inverse
//! kinematics.
//!
//! All matrices are built explicitly from `sin`/`cos` rather than through
//! axis-angle constructors so that forward kinematics and the closed-form
//! extraction in the solver read exactly the same matrix entries.

use std::f64::consts::{PI, TAU};

use nalgebra::Matrix3;

/// Rotation about the x axis.
pub fn rot_x(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(
        1.0, 0.0, 0.0, //
        0.0, c, -s, //
        0.0, s, c,
    )
}

/// Rotation about the z axis.
pub fn rot_z(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(
        c, -s, 0.0, //
        s, c, 0.0, //
        0.0, 0.0, 1.0,
    )
}

/// Orientation induced by the shoulder yaw, shoulder pitch and elbow joints
/// with the wrist at zero, in the solver's native convention.
///
/// Column 0 points along the forearm, column 2 is the elbow axis.
pub fn arm_rotation(theta1: f64, theta2: f64, theta3: f64) -> Matrix3<f64> {
    let (s1, c1) = theta1.sin_cos();
    let (s23, c23) = (theta2 + theta3).sin_cos();
    Matrix3::new(
        c1 * c23, -c1 * s23, s1, //
        s1 * c23, -s1 * s23, -c1, //
        s23, c23, 0.0,
    )
}

/// Fixed rotation between the wrist pitch frame and the flange roll frame.
pub fn wrist_mount() -> Matrix3<f64> {
    Matrix3::new(
        0.0, 0.0, 1.0, //
        0.0, 1.0, 0.0, //
        -1.0, 0.0, 0.0,
    )
}

/// Rotation produced by the three wrist joints: `Rx(t4) * Rz(t5) * W * Rz(t6)`.
pub fn wrist_rotation(theta4: f64, theta5: f64, theta6: f64) -> Matrix3<f64> {
    rot_x(theta4) * rot_z(theta5) * wrist_mount() * rot_z(theta6)
}

/// Wrap an angle into `(-PI, PI]`.
///
/// Angles already in range are returned untouched. Non-finite input is
/// returned as is. Constant time for any finite magnitude.
pub fn wrap_angle(angle: f64) -> f64 {
    if !angle.is_finite() || (angle > -PI && angle <= PI) {
        return angle;
    }
    let mut a = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid lands in [-PI, PI); rounding can also give exactly +PI
    if a <= -PI {
        a += TAU;
    }
    a
}
