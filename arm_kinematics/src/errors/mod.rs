mod kinematics_error;

pub use kinematics_error::KinematicsError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, KinematicsError>;
