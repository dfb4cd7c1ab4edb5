//! Per-controller working copy of the kinematic model.
//!
//! Each controller owns one. Its state is overwritten from the tick's inputs
//! before every evaluation and never read before that.

use nalgebra::DMatrix;
use paddlebot_core::{JointVector, DOF};
use paddlebot_physics::{BodyPose, BodyVelocity, FrameId, KinematicsProvider};
use tracing::info;

use crate::error::ControlError;

#[derive(Debug, Clone)]
pub struct ScratchModel<K> {
    model: K,
    paddle: FrameId,
    arm_start: usize,
}

impl<K: KinematicsProvider> ScratchModel<K> {
    /// Take ownership of `model`, resolve the paddle frame, and check that
    /// the model exposes a DOF-wide arm slice.
    pub fn new(model: K, paddle_frame: &str) -> Result<Self, ControlError> {
        let paddle = model.frame_id(paddle_frame)?;
        let arm_start = model.arm_velocity_start();

        if model.num_positions() < DOF {
            return Err(ControlError::ArmSliceOutOfRange {
                what: "positions",
                start: 0,
                dof: DOF,
                available: model.num_positions(),
            });
        }
        if arm_start + DOF > model.num_velocities() {
            return Err(ControlError::ArmSliceOutOfRange {
                what: "velocities",
                start: arm_start,
                dof: DOF,
                available: model.num_velocities(),
            });
        }

        info!(paddle_frame, arm_start, "kinematic scratch model ready");
        Ok(Self {
            model,
            paddle,
            arm_start,
        })
    }

    /// Overwrite the arm configuration.
    pub fn load(&mut self, q: &JointVector) {
        self.model.set_configuration(q.as_slice());
    }

    /// Overwrite the arm configuration and velocity.
    pub fn load_with_velocity(&mut self, q: &JointVector, v: &JointVector) {
        self.model
            .set_configuration_and_velocity(q.as_slice(), v.as_slice());
    }

    pub fn paddle_pose(&self) -> BodyPose {
        self.model.body_pose(self.paddle)
    }

    pub fn paddle_velocity(&self) -> BodyVelocity {
        self.model.body_spatial_velocity(self.paddle)
    }

    /// Paddle spatial Jacobian restricted to the arm's 6 × DOF column slice.
    pub fn paddle_jacobian(&self) -> DMatrix<f64> {
        self.model
            .spatial_jacobian(self.paddle)
            .columns(self.arm_start, DOF)
            .clone_owned()
    }

    pub fn model(&self) -> &K {
        &self.model
    }
}
