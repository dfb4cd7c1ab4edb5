//! Controller construction errors.
//!
//! Per-tick computation never fails; these only come out of constructors.

use paddlebot_physics::KinematicsError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("kinematic model: {0}")]
    Kinematics(#[from] KinematicsError),

    /// The model cannot supply a DOF-wide arm slice.
    #[error("arm slice [{start}, {start} + {dof}) exceeds the model's {available} {what}")]
    ArmSliceOutOfRange {
        what: &'static str,
        start: usize,
        dof: usize,
        available: usize,
    },
}
