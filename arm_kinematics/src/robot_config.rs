//! Kinematic parameters for 6R arms with a wrist offset
//!
//! The parameter set describes the family of arms whose first joint yaws
//! about the vertical axis, joints 2 and 3 pitch in the arm plane and the
//! last three joints form a wrist whose centre sits `a6` behind the end
//! effector along the tool axis. Values are normally produced once from a
//! robot description and then frozen inside an
//! [`ArmKinematics`](crate::ArmKinematics).

use std::f64::consts::TAU;
use std::path::Path;

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::errors::{KinematicsError, Result};
use crate::pose::{is_proper_rotation, JointVector, JOINT_COUNT};

/// Tolerance used when checking that the frame rotation is proper.
const FRAME_ROTATION_TOLERANCE: f64 = 1e-9;

/// A bias is a zero offset, so anything past one full turn is a unit or data error.
const MAX_BIAS: f64 = TAU;

/// Admissible open interval for one joint angle, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointLimit {
    pub min: f64,
    pub max: f64,
}

impl JointLimit {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the interval, used to normalize joint distances.
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Strict containment: angles on the boundary are rejected.
    pub fn contains(&self, angle: f64) -> bool {
        self.min < angle && angle < self.max
    }
}

/// Immutable per-arm constants shared by forward and inverse kinematics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicParameters {
    /// Human-readable arm name, used only for logging.
    #[serde(default)]
    pub name: String,

    // Link lengths in meters
    pub a1: f64, // base to shoulder, vertical
    pub a3: f64, // upper arm
    pub a4: f64, // forearm, elbow to wrist centre
    pub a6: f64, // wrist centre to end effector

    /// Offset between the solver's zero and the physical joint zero.
    pub bias: JointVector,

    pub joint_limits: [JointLimit; JOINT_COUNT],

    /// Rotation from the external end-effector convention to the solver's
    /// native one, stored row-major.
    pub frame_rotation: [[f64; 3]; 3],
}

impl KinematicParameters {
    /// Parameters of the AIRBOT Play arm.
    ///
    /// - Shoulder height (a1): 117.2 mm
    /// - Upper arm (a3): 270.09 mm
    /// - Forearm (a4): 290.15 mm
    /// - Wrist centre to flange (a6): 236.45 mm
    pub fn airbot_play() -> Self {
        Self {
            name: "AIRBOT Play".to_string(),
            a1: 0.1172,
            a3: 0.27009,
            a4: 0.29015,
            a6: 0.23645,
            bias: [0.0, -2.7549, 2.7549, 1.5708, 0.0, 0.0],
            joint_limits: [
                JointLimit::new(-3.09, 2.04),
                JointLimit::new(-2.92, 0.12),
                JointLimit::new(-0.04, 3.09),
                JointLimit::new(-2.95, 2.95),
                JointLimit::new(-1.8, 1.8),
                JointLimit::new(-2.90, 2.90),
            ],
            frame_rotation: [
                [0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0],
                [-1.0, 0.0, 0.0],
            ],
        }
    }

    /// Same geometry with every joint limit replaced by `limit`.
    pub fn with_uniform_limits(mut self, limit: JointLimit) -> Self {
        self.joint_limits = [limit; JOINT_COUNT];
        self
    }

    /// Parse parameters from JSON and validate them.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Read, parse and validate a JSON parameter file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| KinematicsError::Config(format!("{}: {}", path.display(), e)))?;
        let params = Self::from_json_str(&text)?;
        tracing::debug!(name = %params.name, path = %path.display(), "loaded kinematic parameters");
        Ok(params)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Frame-convention rotation as a matrix.
    pub fn frame_rotation_matrix(&self) -> Matrix3<f64> {
        let f = &self.frame_rotation;
        Matrix3::new(
            f[0][0], f[0][1], f[0][2], //
            f[1][0], f[1][1], f[1][2], //
            f[2][0], f[2][1], f[2][2],
        )
    }

    /// Whether every joint of `q` lies strictly inside its limit.
    pub fn within_limits(&self, q: &[f64]) -> bool {
        q.iter()
            .zip(self.joint_limits.iter())
            .all(|(angle, limit)| limit.contains(*angle))
    }

    /// Check the invariants the solver relies on.
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [("a1", self.a1), ("a3", self.a3), ("a4", self.a4), ("a6", self.a6)] {
            if !value.is_finite() {
                return Err(KinematicsError::InvalidParameters(format!("{label} must be finite")));
            }
        }
        // a1 and a6 may be zero; the two mid-chain links may not.
        if self.a3 <= 0.0 || self.a4 <= 0.0 {
            return Err(KinematicsError::InvalidParameters(
                "link lengths a3 and a4 must be positive".to_string(),
            ));
        }
        if self.a1 < 0.0 || self.a6 < 0.0 {
            return Err(KinematicsError::InvalidParameters(
                "offsets a1 and a6 must not be negative".to_string(),
            ));
        }
        if let Some(joint) = self.bias.iter().position(|b| !b.is_finite() || b.abs() > MAX_BIAS) {
            return Err(KinematicsError::InvalidParameters(format!(
                "bias of joint {} must be finite and within one turn",
                joint + 1
            )));
        }
        for (i, limit) in self.joint_limits.iter().enumerate() {
            if !(limit.min.is_finite() && limit.max.is_finite()) || limit.min >= limit.max {
                return Err(KinematicsError::InvalidParameters(format!(
                    "joint {} limit [{}, {}] is not a valid interval",
                    i + 1,
                    limit.min,
                    limit.max
                )));
            }
        }
        if !is_proper_rotation(&self.frame_rotation_matrix(), FRAME_ROTATION_TOLERANCE) {
            return Err(KinematicsError::InvalidParameters(
                "frame rotation must be orthonormal with determinant +1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for KinematicParameters {
    fn default() -> Self {
        Self::airbot_play()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_is_valid() {
        let params = KinematicParameters::airbot_play();
        assert!(params.validate().is_ok());
        assert_eq!(params, KinematicParameters::default());
    }

    #[test]
    fn joint_limit_is_strict() {
        let limit = JointLimit::new(-1.0, 2.0);
        assert_eq!(limit.width(), 3.0);
        assert!(limit.contains(0.0));
        assert!(!limit.contains(-1.0));
        assert!(!limit.contains(2.0));
        assert!(!limit.contains(f64::NAN));
    }

    #[test]
    fn within_limits_checks_every_joint() {
        let params = KinematicParameters::airbot_play();
        assert!(params.within_limits(&[0.0; 6]));
        assert!(!params.within_limits(&[0.0, 0.2, 0.0, 0.0, 0.0, 0.0]));
        assert!(params.within_limits(&[0.5, -1.0, 1.0]));
    }

    #[test]
    fn rejects_bad_link_lengths() {
        let mut params = KinematicParameters::airbot_play();
        params.a3 = 0.0;
        assert!(matches!(params.validate(), Err(KinematicsError::InvalidParameters(_))));

        let mut params = KinematicParameters::airbot_play();
        params.a6 = f64::NAN;
        assert!(matches!(params.validate(), Err(KinematicsError::InvalidParameters(_))));
    }

    #[test]
    fn rejects_out_of_range_bias() {
        for bias in [f64::NAN, f64::INFINITY, 1e17, -7.0] {
            let mut params = KinematicParameters::airbot_play();
            params.bias[5] = bias;
            let err = params.validate().unwrap_err();
            assert!(err.to_string().contains("joint 6"), "{err}");
        }

        let mut params = KinematicParameters::airbot_play();
        params.bias[5] = -6.0;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_limit() {
        let mut params = KinematicParameters::airbot_play();
        params.joint_limits[4] = JointLimit::new(1.0, -1.0);
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("joint 5"), "{err}");
    }

    #[test]
    fn rejects_improper_frame_rotation() {
        let mut params = KinematicParameters::airbot_play();
        params.frame_rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]];
        assert!(params.validate().is_err());
    }

    #[test]
    fn json_roundtrip() {
        let params = KinematicParameters::airbot_play();
        let json = params.to_json_pretty().unwrap();
        let back = KinematicParameters::from_json_str(&json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn json_without_name_uses_default() {
        let mut value = serde_json::to_value(KinematicParameters::airbot_play()).unwrap();
        value.as_object_mut().unwrap().remove("name");
        let params = KinematicParameters::from_json_str(&value.to_string()).unwrap();
        assert!(params.name.is_empty());
    }

    #[test]
    fn json_with_invalid_values_is_rejected() {
        let mut value = serde_json::to_value(KinematicParameters::airbot_play()).unwrap();
        value["a4"] = serde_json::json!(-0.2);
        let err = KinematicParameters::from_json_str(&value.to_string()).unwrap_err();
        assert!(matches!(err, KinematicsError::InvalidParameters(_)));
    }

    #[test]
    fn uniform_limits() {
        let params =
            KinematicParameters::airbot_play().with_uniform_limits(JointLimit::new(-4.0, 4.0));
        assert!(params.joint_limits.iter().all(|l| l.min == -4.0 && l.max == 4.0));
        assert!(params.validate().is_ok());
    }
}
