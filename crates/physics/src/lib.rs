//! Arm kinematics for the paddle controllers.
//!
//! [`KinematicsProvider`] is the contract the control laws are written
//! against; [`arm::RobotArm`] is the DH-based implementation.

pub mod arm;
pub mod joint;
pub mod provider;
pub mod spatial;

pub use provider::{BodyPose, BodyVelocity, FrameId, KinematicsError, KinematicsProvider};
