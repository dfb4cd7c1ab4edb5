//! Reactive paddle control: velocity tracking, tilt, and differential IK.
//!
//! One tick runs [`velocity::VelocityTracker`] and [`tilt::TiltController`]
//! on the sensed ball and arm state, then maps their combined twist to a
//! joint-velocity command with [`ik::DifferentialIk`].
//! [`pipeline::PaddleController`] wires the three together.

pub mod config;
pub mod error;
pub mod ik;
pub mod pipeline;
pub mod scratch;
pub mod shaping;
pub mod tilt;
pub mod velocity;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, ControlConfig, IkSolverKind};
pub use error::ControlError;
pub use pipeline::{PaddleController, TickInput, TickOutput};
