use super::{ArmKinematics, SolutionSet};
use crate::errors::{KinematicsError, Result};
use crate::pose::JointVector;

impl ArmKinematics {
    // ============================================================================
    // Solution Selection
    // ============================================================================

    /// Pick the solution closest to `reference` under [`Self::joint_distance`].
    ///
    /// Ties keep the earlier solution, so the result follows branch
    /// enumeration order when distances are equal.
    pub fn select(&self, solutions: &SolutionSet, reference: &JointVector) -> Result<JointVector> {
        let mut iter = solutions.iter();
        let first = iter.next().ok_or(KinematicsError::EmptySolutionSet)?;

        let mut best_solution = *first;
        let mut min_distance = self.joint_distance(first, reference);

        for solution in iter {
            let distance = self.joint_distance(solution, reference);
            if distance < min_distance {
                min_distance = distance;
                best_solution = *solution;
            }
        }

        tracing::debug!(distance = min_distance, joints = ?best_solution, "selected solution");
        Ok(best_solution)
    }

    /// Sum of per-joint absolute differences, each normalized by the width of
    /// that joint's limit interval.
    pub fn joint_distance(&self, a: &JointVector, b: &JointVector) -> f64 {
        a.iter()
            .zip(b.iter())
            .zip(self.params.joint_limits.iter())
            .map(|((x, y), limit)| (x - y).abs() / limit.width())
            .sum()
    }
}
