//! Paddle tilt: lean the paddle so the ball drifts back toward the
//! centerpoint, level it when the ball is centered.

use nalgebra::Vector3;
use paddlebot_core::{BallState, JointVector};
use paddlebot_physics::KinematicsProvider;
use tracing::{debug, trace};

use crate::config::{ControlConfig, TiltGains};
use crate::error::ControlError;
use crate::scratch::ScratchModel;
use crate::shaping::{tilt_angle, tilt_sign_multiplier};

/// Inputs for one tilt evaluation.
#[derive(Debug, Clone, Copy)]
pub struct TiltInput {
    /// Arm joint positions (rad).
    pub q: JointVector,
    pub ball: BallState,
}

/// Produces the desired paddle angular velocity (world frame).
#[derive(Debug, Clone)]
pub struct TiltController<K> {
    scratch: ScratchModel<K>,
    gains: TiltGains,
    centerpoint: f64,
    ball_distance_limit: f64,
}

impl<K: KinematicsProvider> TiltController<K> {
    pub fn new(model: K, config: &ControlConfig) -> Result<Self, ControlError> {
        config.validate()?;
        Ok(Self {
            scratch: ScratchModel::new(model, &config.workspace.paddle_frame)?,
            gains: config.tilt.clone(),
            centerpoint: config.workspace.centerpoint,
            ball_distance_limit: config.workspace.ball_distance_limit,
        })
    }

    /// Desired roll, pitch, yaw of the paddle for this ball state.
    ///
    /// Roll follows the y offset, pitch the negated x offset from the
    /// centerpoint (a ball beyond the centerpoint pitches the paddle face
    /// back toward it). Yaw is always held at 0.
    pub fn desired_rpy(&self, ball: &BallState) -> Vector3<f64> {
        let offset_x = ball.position.x - self.centerpoint;
        let offset_y = ball.position.y;
        let [k_x, k_y] = self.gains.shaping;

        let pitch = -tilt_angle(offset_x, k_x, tilt_sign_multiplier(offset_x, ball.velocity.x));
        let roll = tilt_angle(offset_y, k_y, tilt_sign_multiplier(offset_y, ball.velocity.y));

        Vector3::new(roll, pitch, 0.0)
    }

    /// Desired paddle angular velocity `Kp · (rpy_desired - rpy_current)` (rad/s).
    ///
    /// Component-wise RPY error; only meaningful for small tilts.
    /// Zero when the ball is out of play.
    pub fn compute(&mut self, input: &TiltInput) -> Vector3<f64> {
        if !input.ball.is_in_play(self.ball_distance_limit) {
            debug!(distance = input.ball.position.norm(), "ball out of play, holding paddle tilt");
            return Vector3::zeros();
        }

        self.scratch.load(&input.q);
        let current = self.scratch.paddle_pose().rpy;
        let desired = self.desired_rpy(&input.ball);

        let omega = self.gains.kp * (desired - current);
        trace!(?desired, ?current, ?omega, "paddle angular velocity");
        omega
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubKinematics;

    fn controller(stub: StubKinematics) -> TiltController<StubKinematics> {
        TiltController::new(stub, &ControlConfig::default()).unwrap()
    }

    fn input(ball_p: Vector3<f64>, ball_v: Vector3<f64>) -> TiltInput {
        TiltInput {
            q: JointVector::from_element(0.3),
            ball: BallState::new(ball_p, ball_v),
        }
    }

    #[test]
    fn test_lost_ball_gives_zero() {
        let stub = StubKinematics::new().with_pose(Vector3::zeros(), Vector3::new(0.2, -0.1, 0.4));
        let mut tilt = controller(stub);
        for p in [Vector3::new(0.0, 5.0000001, 0.0), Vector3::new(-3.0, 3.0, 3.0)] {
            let out = tilt.compute(&input(p, Vector3::new(1.0, 1.0, 1.0)));
            assert_eq!(out, Vector3::zeros(), "p = {:?}", p);
        }
        assert_eq!(tilt.scratch.model().q, vec![0.0; 7], "model touched for a lost ball");
    }

    #[test]
    fn test_centered_ball_levels_paddle() {
        let current = Vector3::new(0.2, -0.1, 0.4);
        let stub = StubKinematics::new().with_pose(Vector3::zeros(), current);
        let mut tilt = controller(stub);

        let out = tilt.compute(&input(Vector3::new(0.88, 0.0, 1.0), Vector3::zeros()));
        assert_eq!(out, -5.0 * current);
        assert_eq!(tilt.scratch.model().q, vec![0.3; 7]);
    }

    #[test]
    fn test_just_inside_limit_computes() {
        let current = Vector3::new(0.0, 0.0, 0.1);
        let mut tilt = controller(StubKinematics::new().with_pose(Vector3::zeros(), current));
        let out = tilt.compute(&input(Vector3::new(0.0, 0.0, 4.9999999), Vector3::zeros()));
        assert!((out.z + 0.5).abs() < 1e-12, "out = {:?}", out);
    }

    #[test]
    fn test_zero_offset_axis_has_zero_angle() {
        let tilt = controller(StubKinematics::new());

        // x on the centerpoint, y off: pitch is exactly 0
        let rpy = tilt.desired_rpy(&BallState::new(Vector3::new(0.88, 0.3, 1.0), Vector3::new(2.0, 0.0, 0.0)));
        assert_eq!(rpy.y, 0.0);
        assert!(rpy.x != 0.0);

        // y at 0, x off: roll is exactly 0
        let rpy = tilt.desired_rpy(&BallState::new(Vector3::new(1.2, 0.0, 1.0), Vector3::new(0.0, -3.0, 0.0)));
        assert_eq!(rpy.x, 0.0);
        assert!(rpy.y != 0.0);
        assert_eq!(rpy.z, 0.0);
    }

    #[test]
    fn test_desired_angles_follow_offsets() {
        let tilt = controller(StubKinematics::new());
        let ball = BallState::new(Vector3::new(0.88 + 0.4, -0.3, 1.0), Vector3::new(0.5, -0.5, 0.0));
        let rpy = tilt.desired_rpy(&ball);

        // Ball moving away on both axes: multiplier 1
        let expected_pitch = -(0.5 * (1.0 - 0.4_f64.cos()) / 0.4).atan();
        let expected_roll = (0.5 * (1.0 - 0.3_f64.cos()) / -0.3).atan();
        assert!((rpy.y - expected_pitch).abs() < 1e-12, "pitch = {}", rpy.y);
        assert!((rpy.x - expected_roll).abs() < 1e-12, "roll = {}", rpy.x);
        assert!(rpy.y < 0.0 && rpy.x < 0.0);
    }

    #[test]
    fn test_returning_ball_damps_tilt() {
        let tilt = controller(StubKinematics::new());
        let p = Vector3::new(0.88 + 0.4, 0.0, 1.0);
        let away = tilt.desired_rpy(&BallState::new(p, Vector3::new(1.0, 0.0, 0.0)));
        let back = tilt.desired_rpy(&BallState::new(p, Vector3::new(-1.0, 0.0, 0.0)));
        assert!((back.y - away.y * 0.5 / 11.0).abs() < 1e-12, "back = {}, away = {}", back.y, away.y);
    }

    #[test]
    fn test_output_is_proportional_error() {
        let current = Vector3::new(0.05, 0.02, -0.03);
        let mut tilt = controller(StubKinematics::new().with_pose(Vector3::zeros(), current));
        let ball = BallState::new(Vector3::new(0.5, 0.2, 1.0), Vector3::new(-0.4, 0.1, 2.0));
        let desired = tilt.desired_rpy(&ball);
        let out = tilt.compute(&TiltInput { q: JointVector::zeros(), ball });
        assert!((out - 5.0 * (desired - current)).norm() < 1e-12);
    }
}
