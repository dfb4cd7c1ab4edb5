//! Linear velocity tracking: keep the paddle under the ball and mirror its
//! vertical motion.

use nalgebra::{Vector2, Vector3};
use paddlebot_core::{BallState, JointVector};
use paddlebot_physics::KinematicsProvider;
use tracing::{debug, trace};

use crate::config::{ControlConfig, VelocityGains};
use crate::error::ControlError;
use crate::scratch::ScratchModel;
use crate::shaping::{shape_vertical_velocity, workspace_scale};

/// Inputs for one velocity tracking evaluation.
#[derive(Debug, Clone, Copy)]
pub struct VelocityTrackingInput {
    /// Arm joint positions (rad).
    pub q: JointVector,
    /// Arm joint velocities (rad/s).
    pub v: JointVector,
    pub ball: BallState,
}

/// Produces the desired paddle linear velocity (world frame).
#[derive(Debug, Clone)]
pub struct VelocityTracker<K> {
    scratch: ScratchModel<K>,
    gains: VelocityGains,
    centerpoint: f64,
    ball_distance_limit: f64,
}

impl<K: KinematicsProvider> VelocityTracker<K> {
    pub fn new(model: K, config: &ControlConfig) -> Result<Self, ControlError> {
        config.validate()?;
        Ok(Self {
            scratch: ScratchModel::new(model, &config.workspace.paddle_frame)?,
            gains: config.velocity.clone(),
            centerpoint: config.workspace.centerpoint,
            ball_distance_limit: config.workspace.ball_distance_limit,
        })
    }

    /// Desired paddle velocity `[vx, vy, vz]` (m/s).
    ///
    /// Horizontal: PD on the ball-minus-paddle position and velocity.
    /// Vertical: the shaped ball vertical speed times the workspace scale.
    /// Zero when the ball is out of play.
    pub fn compute(&mut self, input: &VelocityTrackingInput) -> Vector3<f64> {
        let ball = &input.ball;
        if !ball.is_in_play(self.ball_distance_limit) {
            debug!(distance = ball.position.norm(), "ball out of play, holding paddle velocity at zero");
            return Vector3::zeros();
        }

        let vz = shape_vertical_velocity(
            ball.velocity.z,
            self.gains.log_gain,
            self.gains.max_vertical_speed,
        );

        self.scratch.load_with_velocity(&input.q, &input.v);
        let paddle_p = self.scratch.paddle_pose().position;
        let paddle_v = self.scratch.paddle_velocity().linear;

        let p_err = Vector2::new(ball.position.x - paddle_p.x, ball.position.y - paddle_p.y);
        let v_err = Vector2::new(ball.velocity.x - paddle_v.x, ball.velocity.y - paddle_v.y);
        let horizontal = self.gains.kp * p_err + self.gains.kd * v_err;

        let scale = workspace_scale(&ball.position, self.centerpoint);
        let desired = Vector3::new(horizontal.x, horizontal.y, vz * scale);
        trace!(?desired, scale, "paddle linear velocity");
        desired
    }
}
