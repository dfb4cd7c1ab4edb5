//! Scripted kinematics provider for exercising the control laws exactly.

use nalgebra::{DMatrix, Vector3};
use paddlebot_core::DOF;
use paddlebot_physics::{BodyPose, BodyVelocity, FrameId, KinematicsError, KinematicsProvider};

/// Returns fixed pose/velocity/Jacobian and records the last loaded state.
#[derive(Debug, Clone)]
pub struct StubKinematics {
    pub pose: BodyPose,
    pub velocity: BodyVelocity,
    pub jacobian: DMatrix<f64>,
    pub arm_start: usize,
    pub q: Vec<f64>,
    pub v: Vec<f64>,
}

impl StubKinematics {
    pub fn new() -> Self {
        Self {
            pose: BodyPose {
                position: Vector3::zeros(),
                rpy: Vector3::zeros(),
            },
            velocity: BodyVelocity {
                angular: Vector3::zeros(),
                linear: Vector3::zeros(),
            },
            jacobian: DMatrix::zeros(6, DOF),
            arm_start: 0,
            q: vec![0.0; DOF],
            v: vec![0.0; DOF],
        }
    }

    pub fn with_pose(mut self, position: Vector3<f64>, rpy: Vector3<f64>) -> Self {
        self.pose = BodyPose { position, rpy };
        self
    }

    pub fn with_linear_velocity(mut self, linear: Vector3<f64>) -> Self {
        self.velocity.linear = linear;
        self
    }
}

impl KinematicsProvider for StubKinematics {
    fn num_positions(&self) -> usize {
        DOF
    }

    fn num_velocities(&self) -> usize {
        self.jacobian.ncols()
    }

    fn arm_velocity_start(&self) -> usize {
        self.arm_start
    }

    fn frame_id(&self, name: &str) -> Result<FrameId, KinematicsError> {
        if name == "paddle" {
            Ok(FrameId(0))
        } else {
            Err(KinematicsError::UnknownFrame(name.to_string()))
        }
    }

    fn set_configuration(&mut self, q: &[f64]) {
        self.q = q.to_vec();
    }

    fn set_configuration_and_velocity(&mut self, q: &[f64], v: &[f64]) {
        self.q = q.to_vec();
        self.v = v.to_vec();
    }

    fn spatial_jacobian(&self, _frame: FrameId) -> DMatrix<f64> {
        self.jacobian.clone()
    }

    fn body_pose(&self, _frame: FrameId) -> BodyPose {
        self.pose
    }

    fn body_spatial_velocity(&self, _frame: FrameId) -> BodyVelocity {
        self.velocity
    }
}
