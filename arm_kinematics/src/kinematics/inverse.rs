use std::f64::consts::PI;

use nalgebra::{Matrix3, Vector3};

use super::{ArmKinematics, Branch, BranchSolution, SolutionSet, Sign};
use crate::errors::{KinematicsError, Result};
use crate::pose::{JointVector, Pose, Target};
use crate::transforms::{arm_rotation, rot_x, rot_z, wrap_angle, wrist_mount};

/// Elbow cosines this far outside `[-1, 1]` are rounding noise, not a miss.
const REACH_TOLERANCE: f64 = 1e-9;

/// Below this `1 - c3^2` both elbow branches coincide.
const ELBOW_SINGULAR_EPS: f64 = 1e-12;

/// Below this `sin(theta5)` magnitude joints 4 and 6 share an axis.
const WRIST_SINGULAR_EPS: f64 = 1e-9;

/// Shoulder and elbow angles of one arm branch, un-biased.
#[derive(Debug, Clone, Copy)]
struct ArmBranch {
    shoulder: Sign,
    elbow: Sign,
    theta: [f64; 3],
}

impl ArmKinematics {
    // ============================================================================
    // Inverse Kinematics
    // ============================================================================

    /// All limit-compliant joint vectors reaching `target`.
    ///
    /// `reference` only matters at a wrist singularity, where it pins the
    /// otherwise unobservable joint 4.
    ///
    /// # Errors
    /// * [`KinematicsError::Domain`] if the wrist centre is out of reach
    /// * [`KinematicsError::Unreachable`] if every branch violates a limit
    pub fn solve(&self, target: &Pose, reference: Option<&JointVector>) -> Result<SolutionSet> {
        let branches = self.solve_branches(target, reference)?;
        let candidates = branches.len();

        let solutions: Vec<JointVector> = branches
            .into_iter()
            .filter(|b| {
                let ok = self.params.within_limits(&b.joints);
                if !ok {
                    tracing::debug!(
                        branch = %b.branch,
                        joints = ?b.joints,
                        "branch rejected by joint limits"
                    );
                }
                ok
            })
            .map(|b| b.joints)
            .collect();

        if solutions.is_empty() {
            return Err(KinematicsError::Unreachable {
                target: Target::Pose(*target),
                candidates,
            });
        }
        Ok(SolutionSet::new(solutions))
    }

    /// Solve and return the solution closest to `reference`.
    pub fn solve_nearest(&self, target: &Pose, reference: &JointVector) -> Result<JointVector> {
        let solutions = self.solve(target, Some(reference))?;
        self.select(&solutions, reference)
    }

    /// Every algebraic branch for `target`, biased and wrapped but not
    /// filtered by joint limits.
    ///
    /// Yields 8 branches for a generic target and 4 when the wrist centre
    /// sits on the inner or outer reach boundary.
    pub fn solve_branches(
        &self,
        target: &Pose,
        reference: Option<&JointVector>,
    ) -> Result<Vec<BranchSolution>> {
        let rotation = target.rotation * self.frame;
        let tool_axis = rotation.column(2).into_owned();
        let wrist = target.position - self.params.a6 * tool_axis;

        let arms = self.arm_branches(&wrist, Target::Pose(*target))?;
        let theta4_hint = reference.map_or(0.0, |q| q[3] - self.params.bias[3]);

        let mut solutions = Vec::with_capacity(arms.len() * 2);
        for arm in arms {
            let [t1, t2, t3] = arm.theta;
            let residual = arm_rotation(t1, t2, t3).transpose() * rotation;

            for wrist_sign in Sign::BOTH {
                let [t4, t5, t6] = Self::wrist_angles(&residual, wrist_sign, theta4_hint);
                let branch = Branch {
                    shoulder: arm.shoulder,
                    elbow: arm.elbow,
                    wrist: wrist_sign,
                };
                let joints = self.rebias([t1, t2, t3, t4, t5, t6]);
                tracing::trace!(%branch, ?joints, "branch");
                solutions.push(BranchSolution { branch, joints });
            }
        }
        Ok(solutions)
    }

    /// Joints 1-3 placing the wrist centre at `wrist_center`.
    ///
    /// Returns up to 4 limit-compliant triples in enumeration order.
    pub fn solve_position(&self, wrist_center: &Vector3<f64>) -> Result<Vec<[f64; 3]>> {
        let target = Target::Position(*wrist_center);
        let arms = self.arm_branches(wrist_center, target)?;
        let candidates = arms.len();

        let solutions: Vec<[f64; 3]> = arms
            .into_iter()
            .map(|arm| {
                let mut joints = arm.theta;
                for (j, b) in joints.iter_mut().zip(self.params.bias.iter()) {
                    *j = wrap_angle(*j + b);
                }
                joints
            })
            .filter(|joints| self.params.within_limits(joints))
            .collect();

        if solutions.is_empty() {
            return Err(KinematicsError::Unreachable { target, candidates });
        }
        Ok(solutions)
    }

    // ============================================================================
    // Helper Functions
    // ============================================================================

    /// Shoulder/elbow branches for a wrist centre, shoulder sign outermost.
    fn arm_branches(&self, wrist: &Vector3<f64>, target: Target) -> Result<Vec<ArmBranch>> {
        let p = &self.params;
        let (x, y) = (wrist.x, wrist.y);
        let rho = x.hypot(y);
        let height = wrist.z - p.a1;

        let cosine =
            (rho * rho + height * height - p.a3 * p.a3 - p.a4 * p.a4) / (2.0 * p.a3 * p.a4);
        if cosine.is_nan() || cosine.abs() > 1.0 + REACH_TOLERANCE {
            tracing::debug!(cosine, %target, "wrist centre out of reach");
            return Err(KinematicsError::Domain { target, cosine });
        }
        let c3 = cosine.clamp(-1.0, 1.0);
        let sine_sq = (1.0 - c3 * c3).max(0.0);

        let elbows: &[Sign] = if sine_sq <= ELBOW_SINGULAR_EPS {
            tracing::debug!(c3, "wrist centre on reach boundary, single elbow branch");
            &[Sign::Positive]
        } else {
            &Sign::BOTH
        };

        let mut arms = Vec::with_capacity(4);
        for shoulder in Sign::BOTH {
            let i1 = shoulder.value();
            let t1 = (i1 * y).atan2(i1 * x);
            for &elbow in elbows {
                let s3 = elbow.value() * sine_sq.sqrt();
                let t3 = s3.atan2(c3);
                let k1 = p.a3 + p.a4 * c3;
                let k2 = p.a4 * s3;
                let t2 = (k1 * height - i1 * k2 * rho).atan2(i1 * k1 * rho + k2 * height);
                arms.push(ArmBranch {
                    shoulder,
                    elbow,
                    theta: [t1, t2, t3],
                });
            }
        }
        Ok(arms)
    }

    /// Wrist angles from the residual `O = R123^T * R` for one flip sign.
    fn wrist_angles(o: &Matrix3<f64>, sign: Sign, theta4_hint: f64) -> [f64; 3] {
        let i5 = sign.value();
        let s5 = o[(2, 2)].hypot(o[(1, 2)]);
        let t5 = (i5 * s5).atan2(o[(0, 2)]);

        if s5 >= WRIST_SINGULAR_EPS {
            let t4 = (i5 * o[(2, 2)]).atan2(i5 * o[(1, 2)]);
            let t6 = (-i5 * o[(0, 0)]).atan2(-i5 * o[(0, 1)]);
            return [t4, t5, t6];
        }

        // Joints 4 and 6 are collinear: pin joint 4, recover joint 6.
        let t4 = match sign {
            Sign::Positive => theta4_hint,
            Sign::Negative => theta4_hint + PI,
        };
        let q = (rot_x(t4) * rot_z(t5) * wrist_mount()).transpose() * o;
        let t6 = q[(1, 0)].atan2(q[(0, 0)]);
        tracing::debug!(t4, t6, "wrist singular, joint 4 pinned");
        [t4, t5, t6]
    }

    /// Back to physical joint angles: add bias, wrap into `(-PI, PI]`.
    fn rebias(&self, theta: JointVector) -> JointVector {
        let mut joints = theta;
        for (j, b) in joints.iter_mut().zip(self.params.bias.iter()) {
            *j = wrap_angle(*j + b);
        }
        joints
    }
}
