// Analytic forward and inverse kinematics for 6R wrist-offset arms

pub mod errors;
pub mod kinematics;
pub mod pose;
pub mod robot_config;
pub mod transforms;

pub use errors::{KinematicsError, Result};
pub use kinematics::{ArmKinematics, Branch, BranchSolution, Sign, SolutionSet};
pub use pose::{JointVector, Pose, Target, JOINT_COUNT};
pub use robot_config::{JointLimit, KinematicParameters};
