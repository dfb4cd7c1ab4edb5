//! Paddlebot core types shared across crates.
//!
//! Provides the fixed-size joint vector, the sensed ball state, DH link
//! transforms, and roll/pitch/yaw extraction.

use nalgebra as na;

// Re-export key types so downstream crates don't repeat use-declarations
pub use na::{Isometry3, Rotation3, SVector, UnitQuaternion, Vector3};

/// Number of controlled joint velocity coordinates of the arm.
pub const DOF: usize = 7;

/// Joint positions (rad) or joint velocities (rad/s), one entry per DOF.
pub type JointVector = SVector<f64, DOF>;

/// Gravitational acceleration (m/s²), pointing -Z in the world frame (Z-up).
pub const GRAVITY: Vector3<f64> = Vector3::new(0.0, 0.0, -9.81);

/// Sensed ball state in the world frame.
///
/// Comes straight from the tracker and may be garbage when the ball is lost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallState {
    /// Position (m).
    pub position: Vector3<f64>,
    /// Velocity (m/s).
    pub velocity: Vector3<f64>,
}

impl BallState {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Self { position, velocity }
    }

    /// True when the ball is within `distance_limit` of the world origin.
    ///
    /// A position exactly on the limit still counts as in play.
    pub fn is_in_play(&self, distance_limit: f64) -> bool {
        self.position.norm() <= distance_limit
    }
}

/// Roll, pitch, yaw of a rotation, with R = Rz(yaw) · Ry(pitch) · Rx(roll).
pub fn rpy(rotation: &UnitQuaternion<f64>) -> Vector3<f64> {
    let (roll, pitch, yaw) = rotation.euler_angles();
    Vector3::new(roll, pitch, yaw)
}

/// DH parameter set for a single link.
#[derive(Debug, Clone, Copy)]
pub struct DhParams {
    /// Link length (m) — distance along x_{i} from z_{i-1} to z_{i}.
    pub a: f64,
    /// Link offset (m) — distance along z_{i-1} from x_{i-1} to x_{i}.
    pub d: f64,
    /// Link twist (rad) — angle about x_{i} from z_{i-1} to z_{i}.
    pub alpha: f64,
    /// Joint angle offset (rad) — added to variable θ for revolute joints.
    pub theta_offset: f64,
}

impl DhParams {
    pub fn new(a: f64, d: f64, alpha: f64) -> Self {
        Self {
            a,
            d,
            alpha,
            theta_offset: 0.0,
        }
    }

    /// Compute the homogeneous transform for this link at joint angle θ.
    pub fn transform(&self, theta: f64) -> Isometry3<f64> {
        let t = theta + self.theta_offset;
        let (st, ct) = t.sin_cos();
        let (sa, ca) = self.alpha.sin_cos();

        // Standard DH transformation matrix
        let rot = na::Matrix3::new(
            ct, -st * ca, st * sa, st, ct * ca, -ct * sa, 0.0, sa, ca,
        );
        let translation = na::Translation3::new(self.a * ct, self.a * st, self.d);
        let rotation = Rotation3::from_matrix_unchecked(rot);

        Isometry3::from_parts(translation, UnitQuaternion::from_rotation_matrix(&rotation))
    }
}
