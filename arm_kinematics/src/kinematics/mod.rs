//! Closed-form kinematics for 6R arms with a wrist offset.
//!
//! [`ArmKinematics`] owns one validated [`KinematicParameters`] set and
//! exposes forward kinematics, the branch-enumerating inverse solver and the
//! nearest-solution selector as `&self` methods, so a single value can be
//! shared across threads or kept inside a control loop.

mod forward;
mod inverse;
mod select;

use std::fmt;

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::pose::JointVector;
use crate::robot_config::KinematicParameters;

/// Analytic FK/IK engine bound to one arm's parameters.
#[derive(Debug, Clone)]
pub struct ArmKinematics {
    params: KinematicParameters,

    // Cached from params.frame_rotation
    frame: Matrix3<f64>,
}

impl ArmKinematics {
    /// Validate `params` and build the engine.
    pub fn new(params: KinematicParameters) -> Result<Self> {
        params.validate()?;
        tracing::debug!(name = %params.name, "kinematics initialized");
        Ok(Self::from_config(params))
    }

    fn from_config(params: KinematicParameters) -> Self {
        Self {
            frame: params.frame_rotation_matrix(),
            params,
        }
    }

    /// Get the kinematic parameters
    pub fn params(&self) -> &KinematicParameters {
        &self.params
    }
}

impl Default for ArmKinematics {
    fn default() -> Self {
        // The built-in preset always validates
        Self::from_config(KinematicParameters::airbot_play())
    }
}

/// One sign choice of a branch selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// Enumeration order used by the solver.
    pub const BOTH: [Sign; 2] = [Sign::Positive, Sign::Negative];

    pub fn value(self) -> f64 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Positive => write!(f, "+"),
            Sign::Negative => write!(f, "-"),
        }
    }
}

/// Sign triple identifying one algebraic IK branch.
///
/// - `shoulder`: facing the wrist centre or reaching over the base
/// - `elbow`: elbow up or down
/// - `wrist`: wrist flip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Branch {
    pub shoulder: Sign,
    pub elbow: Sign,
    pub wrist: Sign,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{}{})", self.shoulder, self.elbow, self.wrist)
    }
}

/// Joint vector produced by one branch, biased and wrapped but not yet
/// checked against joint limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchSolution {
    pub branch: Branch,
    pub joints: JointVector,
}

/// Limit-compliant IK solutions for one target, in branch enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolutionSet(Vec<JointVector>);

impl SolutionSet {
    pub fn new(solutions: Vec<JointVector>) -> Self {
        Self(solutions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JointVector> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[JointVector] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<JointVector> {
        self.0
    }
}

impl From<Vec<JointVector>> for SolutionSet {
    fn from(solutions: Vec<JointVector>) -> Self {
        Self(solutions)
    }
}

impl IntoIterator for SolutionSet {
    type Item = JointVector;
    type IntoIter = std::vec::IntoIter<JointVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SolutionSet {
    type Item = &'a JointVector;
    type IntoIter = std::slice::Iter<'a, JointVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
