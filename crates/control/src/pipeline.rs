//! One control tick: sensors → {velocity tracking, tilt} → differential IK.

use paddlebot_core::{BallState, JointVector};
use paddlebot_physics::spatial::{twist, Twist};
use paddlebot_physics::KinematicsProvider;
use tracing::info;

use crate::config::ControlConfig;
use crate::error::ControlError;
use crate::ik::DifferentialIk;
use crate::tilt::{TiltController, TiltInput};
use crate::velocity::{VelocityTracker, VelocityTrackingInput};

/// Sensor snapshot for one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Measured arm joint positions (rad).
    pub q: JointVector,
    /// Estimated arm joint velocities (rad/s).
    pub v: JointVector,
    pub ball: BallState,
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    /// Joint velocity command (rad/s).
    pub joint_velocity: JointVector,
    /// `[angular; linear]` paddle twist handed to the IK solver.
    pub desired_twist: Twist,
    /// False when the ball failed the distance gate this tick.
    pub ball_in_play: bool,
}

/// The full paddle control law. Each stage owns its own copy of the model.
#[derive(Debug, Clone)]
pub struct PaddleController<K> {
    velocity: VelocityTracker<K>,
    tilt: TiltController<K>,
    ik: DifferentialIk<K>,
    ball_distance_limit: f64,
}

impl<K: KinematicsProvider + Clone> PaddleController<K> {
    pub fn new(model: K, config: &ControlConfig) -> Result<Self, ControlError> {
        let velocity = VelocityTracker::new(model.clone(), config)?;
        let tilt = TiltController::new(model.clone(), config)?;
        let ik = DifferentialIk::new(model, config)?;
        info!(
            solver = ?ik.solver(),
            centerpoint = config.workspace.centerpoint,
            "paddle controller ready"
        );
        Ok(Self {
            velocity,
            tilt,
            ik,
            ball_distance_limit: config.workspace.ball_distance_limit,
        })
    }
}

impl<K: KinematicsProvider> PaddleController<K> {
    /// Run one tick. Never fails; a lost ball yields a zero command.
    pub fn tick(&mut self, input: &TickInput) -> TickOutput {
        let linear = self.velocity.compute(&VelocityTrackingInput {
            q: input.q,
            v: input.v,
            ball: input.ball,
        });
        let angular = self.tilt.compute(&TiltInput {
            q: input.q,
            ball: input.ball,
        });

        let desired_twist = twist(&angular, &linear);
        let joint_velocity = self.ik.solve_twist(&input.q, &desired_twist);

        TickOutput {
            joint_velocity,
            desired_twist,
            ball_in_play: input.ball.is_in_play(self.ball_distance_limit),
        }
    }

    pub fn ik_mut(&mut self) -> &mut DifferentialIk<K> {
        &mut self.ik
    }
}
