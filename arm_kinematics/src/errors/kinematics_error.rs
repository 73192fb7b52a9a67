use crate::pose::Target;

/// Errors returned by the kinematics engine.
///
/// Every solve failure carries the target that was attempted so a caller
/// (typically a task sequencer) can log it and fall back to a recovery state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KinematicsError {
    /// The law-of-cosines argument for the elbow fell outside `[-1, 1]`:
    /// the wrist centre is beyond the reach envelope.
    #[error("target out of reach (elbow cosine {cosine:.6}): {target}")]
    Domain { target: Target, cosine: f64 },

    /// Branches were generated but every one violated a joint limit.
    #[error("no branch within joint limits ({candidates} rejected): {target}")]
    Unreachable { target: Target, candidates: usize },

    /// Selection was asked to pick from zero candidates.
    #[error("cannot select from an empty solution set")]
    EmptySolutionSet,

    /// Kinematic parameters failed validation.
    #[error("invalid kinematic parameters: {0}")]
    InvalidParameters(String),

    /// Kinematic parameters could not be read or parsed.
    #[error("could not load kinematic parameters: {0}")]
    Config(String),
}

impl KinematicsError {
    /// The target attached to a solve failure, if any.
    pub fn target(&self) -> Option<&Target> {
        match self {
            KinematicsError::Domain { target, .. }
            | KinematicsError::Unreachable { target, .. } => Some(target),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for KinematicsError {
    fn from(err: serde_json::Error) -> Self {
        KinematicsError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn display_messages() {
        let e = KinematicsError::EmptySolutionSet;
        assert_eq!(e.to_string(), "cannot select from an empty solution set");

        let e = KinematicsError::InvalidParameters("a3 must be positive".into());
        assert_eq!(e.to_string(), "invalid kinematic parameters: a3 must be positive");

        let e = KinematicsError::Domain {
            target: Target::Position(Vector3::new(1.0, 0.0, 0.5)),
            cosine: 1.5,
        };
        let msg = e.to_string();
        assert!(msg.contains("1.500000"), "{msg}");
        assert!(msg.contains("1.0000"), "{msg}");
    }

    #[test]
    fn target_is_exposed_for_solve_failures() {
        let target = Target::Position(Vector3::new(0.1, 0.2, 0.3));
        let e = KinematicsError::Unreachable {
            target,
            candidates: 8,
        };
        assert_eq!(e.target(), Some(&target));
        assert_eq!(KinematicsError::EmptySolutionSet.target(), None);
    }

    #[test]
    fn json_errors_become_config_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let e: KinematicsError = err.into();
        assert!(matches!(e, KinematicsError::Config(_)));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn error_is_send_sync() {
        assert_send_sync::<KinematicsError>();
    }
}
