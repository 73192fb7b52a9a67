use nalgebra::Vector3;

use super::ArmKinematics;
use crate::pose::{JointVector, Pose};
use crate::transforms::{arm_rotation, wrist_rotation};

impl ArmKinematics {
    // ============================================================================
    // Forward Kinematics
    // ============================================================================

    /// End-effector pose in the external frame convention.
    ///
    /// Total for finite input: joint limits are not checked here.
    pub fn forward_kinematics(&self, joints: &JointVector) -> Pose {
        let native = self.forward_kinematics_native(joints);
        Pose::new(native.position, native.rotation * self.frame.transpose())
    }

    /// End-effector pose in the solver's native convention.
    pub fn forward_kinematics_native(&self, joints: &JointVector) -> Pose {
        let theta = self.unbias(joints);
        let rotation = arm_rotation(theta[0], theta[1], theta[2])
            * wrist_rotation(theta[3], theta[4], theta[5]);
        let wrist = self.wrist_center_unbiased(&theta);
        let tool_axis = rotation.column(2).into_owned();
        Pose::new(wrist + self.params.a6 * tool_axis, rotation)
    }

    /// Position of the wrist centre, where the last three joint axes meet.
    pub fn wrist_center(&self, joints: &JointVector) -> Vector3<f64> {
        self.wrist_center_unbiased(&self.unbias(joints))
    }

    fn wrist_center_unbiased(&self, theta: &JointVector) -> Vector3<f64> {
        let p = &self.params;
        let (s1, c1) = theta[0].sin_cos();
        let (s2, c2) = theta[1].sin_cos();
        let (s23, c23) = (theta[1] + theta[2]).sin_cos();
        let reach = p.a3 * c2 + p.a4 * c23;
        let height = p.a3 * s2 + p.a4 * s23;
        Vector3::new(reach * c1, reach * s1, p.a1 + height)
    }

    /// Joint angles in the solver's frame: `theta = q - bias`.
    fn unbias(&self, joints: &JointVector) -> JointVector {
        let mut theta = *joints;
        for (t, b) in theta.iter_mut().zip(self.params.bias.iter()) {
            *t -= b;
        }
        theta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_kinematics_zero_position() {
        let kin = ArmKinematics::default();
        let pose = kin.forward_kinematics(&[0.0; 6]);
        println!("FK at zero: {pose}");

        assert!((pose.position.x - 0.276453).abs() < 1e-5, "x = {}", pose.position.x);
        assert!(pose.position.y.abs() < 1e-9, "y = {}", pose.position.y);
        assert!((pose.position.z - 0.219058).abs() < 1e-5, "z = {}", pose.position.z);

        // 1.5708 is not exactly pi/2, so the identity is only approximate.
        let err = (pose.rotation - nalgebra::Matrix3::identity()).norm();
        assert!(err < 1e-4, "rotation deviates from identity by {err}");
    }

    #[test]
    fn test_forward_kinematics_generic_pose() {
        let kin = ArmKinematics::default();
        let pose = kin.forward_kinematics(&[0.3, -0.8, 1.2, 0.5, 0.7, -0.4]);

        assert!((pose.position.x - 0.251078).abs() < 1e-5);
        assert!((pose.position.y - 0.217596).abs() < 1e-5);
        assert!((pose.position.z - 0.618288).abs() < 1e-5);
        assert!(pose.is_proper_rotation(1e-12));
    }

    #[test]
    fn test_tool_is_a6_from_wrist_center() {
        let kin = ArmKinematics::default();
        let q = [-1.0, -1.5, 2.0, -1.2, -1.1, 2.0];
        let pose = kin.forward_kinematics(&q);
        let wrist = kin.wrist_center(&q);
        assert!(((pose.position - wrist).norm() - kin.params().a6).abs() < 1e-12);
    }

    #[test]
    fn test_external_frame_is_native_times_frame_transpose() {
        let kin = ArmKinematics::default();
        let q = [0.1, -0.5, 0.9, 0.2, -0.3, 1.0];
        let native = kin.forward_kinematics_native(&q);
        let external = kin.forward_kinematics(&q);

        assert_eq!(native.position, external.position);
        let frame = kin.params().frame_rotation_matrix();
        assert!((external.rotation * frame - native.rotation).norm() < 1e-12);
    }
}
