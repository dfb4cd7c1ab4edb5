//! Kinematics provider contract used by the control laws.
//!
//! Everything is expressed in the fixed world frame. Jacobian rows and body
//! velocities follow the [angular (3); linear (3)] convention.

use nalgebra::{DMatrix, Vector3};
use thiserror::Error;

/// Handle to a named body frame, resolved once via [`KinematicsProvider::frame_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub usize);

/// Kinematics errors. Only raised while describing the model or resolving
/// frames, never during per-tick evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KinematicsError {
    /// No body frame with this name.
    #[error("unknown body frame: {0:?}")]
    UnknownFrame(String),

    /// Two parallel descriptions disagree in length.
    #[error("{what}: expected {expected} entries, got {got}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// The arm has no links.
    #[error("arm must have at least one joint")]
    EmptyArm,
}

/// World-frame pose of a body frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    /// Origin position (m).
    pub position: Vector3<f64>,
    /// Orientation as roll, pitch, yaw (rad).
    pub rpy: Vector3<f64>,
}

/// World-frame spatial velocity of a body frame origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyVelocity {
    /// Angular velocity (rad/s).
    pub angular: Vector3<f64>,
    /// Linear velocity of the frame origin (m/s).
    pub linear: Vector3<f64>,
}

/// Kinematic model of the plant holding the arm.
///
/// Implementations own mutable scratch state (configuration and velocity).
/// Callers overwrite it with `set_configuration*` before every evaluation.
pub trait KinematicsProvider {
    /// Length of the full position vector.
    fn num_positions(&self) -> usize;

    /// Length of the full velocity vector (Jacobian column count).
    fn num_velocities(&self) -> usize;

    /// Column where the controlled arm's contiguous velocity slice starts.
    fn arm_velocity_start(&self) -> usize;

    /// Resolve a named body frame.
    fn frame_id(&self, name: &str) -> Result<FrameId, KinematicsError>;

    /// Overwrite the arm configuration (rad). Velocities are left as they are.
    fn set_configuration(&mut self, q: &[f64]);

    /// Overwrite the arm configuration (rad) and velocity (rad/s).
    fn set_configuration_and_velocity(&mut self, q: &[f64], v: &[f64]);

    /// 6 × `num_velocities` spatial Jacobian of `frame`'s origin in world frame.
    fn spatial_jacobian(&self, frame: FrameId) -> DMatrix<f64>;

    /// World pose of `frame`.
    fn body_pose(&self, frame: FrameId) -> BodyPose;

    /// World spatial velocity of `frame` at the current state.
    fn body_spatial_velocity(&self, frame: FrameId) -> BodyVelocity;
}
