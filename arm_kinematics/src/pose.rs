//! Cartesian pose and joint-space value types.
//!
//! A [`Pose`] stores the end-effector position and its orientation as a
//! full 3x3 rotation matrix, which is the form the closed-form solver reads
//! its axes from. Conversions to and from `nalgebra` isometries and 4x4
//! homogeneous matrices are provided for callers that keep poses in those
//! forms.

use std::fmt;

use nalgebra::{Isometry3, Matrix3, Matrix4, Rotation3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Number of revolute joints in the arm.
pub const JOINT_COUNT: usize = 6;

/// Joint angles in radians, ordered base to wrist.
pub type JointVector = [f64; JOINT_COUNT];

/// End-effector pose: position plus orientation as a proper rotation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vector3<f64>,
    pub rotation: Matrix3<f64>,
}

impl Pose {
    pub fn new(position: Vector3<f64>, rotation: Matrix3<f64>) -> Self {
        Self { position, rotation }
    }

    pub fn identity() -> Self {
        Self::new(Vector3::zeros(), Matrix3::identity())
    }

    /// Build a pose from a 4x4 homogeneous transform.
    pub fn from_homogeneous(m: &Matrix4<f64>) -> Self {
        Self {
            position: Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]),
            rotation: m.fixed_view::<3, 3>(0, 0).into_owned(),
        }
    }

    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rotation);
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.position);
        m
    }

    /// Euclidean distance between the two positions.
    pub fn position_error(&self, other: &Pose) -> f64 {
        (self.position - other.position).norm()
    }

    /// Frobenius norm of the difference of the two rotation matrices.
    pub fn rotation_error(&self, other: &Pose) -> f64 {
        (self.rotation - other.rotation).norm()
    }

    /// Whether the rotation is orthonormal with determinant +1 within `tolerance`.
    pub fn is_proper_rotation(&self, tolerance: f64) -> bool {
        is_proper_rotation(&self.rotation, tolerance)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.position;
        write!(f, "pos=[{:.4}, {:.4}, {:.4}] rot=[", p.x, p.y, p.z)?;
        for (i, row) in self.rotation.row_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{:.4}, {:.4}, {:.4}]", row[0], row[1], row[2])?;
        }
        write!(f, "]")
    }
}

impl From<Isometry3<f64>> for Pose {
    fn from(iso: Isometry3<f64>) -> Self {
        Self {
            position: iso.translation.vector,
            rotation: iso.rotation.to_rotation_matrix().into_inner(),
        }
    }
}

impl From<&Isometry3<f64>> for Pose {
    fn from(iso: &Isometry3<f64>) -> Self {
        (*iso).into()
    }
}

/// The rotation is assumed proper; use [`Pose::is_proper_rotation`] first
/// when it comes from an untrusted source.
impl From<Pose> for Isometry3<f64> {
    fn from(pose: Pose) -> Self {
        let rotation = Rotation3::from_matrix_unchecked(pose.rotation);
        Isometry3::from_parts(
            Translation3::from(pose.position),
            UnitQuaternion::from_rotation_matrix(&rotation),
        )
    }
}

/// What a solve was attempting, attached to errors for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Target {
    /// Full end-effector pose in the external frame.
    Pose(Pose),
    /// Wrist-centre position only.
    Position(Vector3<f64>),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Pose(pose) => write!(f, "pose {pose}"),
            Target::Position(p) => write!(f, "position [{:.4}, {:.4}, {:.4}]", p.x, p.y, p.z),
        }
    }
}

pub(crate) fn is_proper_rotation(r: &Matrix3<f64>, tolerance: f64) -> bool {
    let orthonormal = (r.transpose() * r - Matrix3::identity()).norm() <= tolerance;
    orthonormal && (r.determinant() - 1.0).abs() <= tolerance
}
