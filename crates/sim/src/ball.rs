//! Ballistic ball: gravity + quadratic drag, semi-implicit Euler.
//!
//! No contacts: the ball passes through the paddle and the floor.

use nalgebra::Vector3;
use paddlebot_core::{BallState, GRAVITY};

/// Ball physical constants.
pub const BALL_MASS: f64 = 0.0027;     // 2.7g
pub const BALL_RADIUS: f64 = 0.020;    // 20mm

/// Drag coefficient for a smooth sphere.
pub const DRAG_CD: f64 = 0.40;
/// Air density (kg/m^3).
pub const AIR_DENSITY: f64 = 1.225;
/// Cross-sectional area.
pub const BALL_AREA: f64 = std::f64::consts::PI * BALL_RADIUS * BALL_RADIUS;

#[derive(Debug, Clone)]
pub struct Ball {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    /// Apply air drag.
    pub drag: bool,
}

impl Ball {
    /// Serve the ball from a position with initial velocity.
    pub fn serve(position: Vector3<f64>, velocity: Vector3<f64>, drag: bool) -> Self {
        Self {
            position,
            velocity,
            drag,
        }
    }

    /// What the tracker reports this tick.
    pub fn state(&self) -> BallState {
        BallState::new(self.position, self.velocity)
    }

    pub fn acceleration(&self) -> Vector3<f64> {
        let speed = self.velocity.norm();
        let drag = if self.drag && speed > 1e-6 {
            -0.5 * DRAG_CD * AIR_DENSITY * BALL_AREA * speed * self.velocity / BALL_MASS
        } else {
            Vector3::zeros()
        };
        GRAVITY + drag
    }

    /// Integrate one timestep (semi-implicit Euler).
    pub fn step(&mut self, dt: f64) {
        self.velocity += self.acceleration() * dt;
        self.position += self.velocity * dt;
    }
}
