//! Revolute joint model with position and velocity limits.

/// A single revolute joint.
#[derive(Debug, Clone)]
pub struct RevoluteJoint {
    /// Current joint angle (rad).
    pub angle: f64,
    /// Current joint angular velocity (rad/s).
    pub velocity: f64,

    /// Lower angle limit (rad).
    pub angle_min: f64,
    /// Upper angle limit (rad).
    pub angle_max: f64,

    /// Maximum joint velocity (rad/s).
    pub velocity_limit: f64,
}

impl RevoluteJoint {
    /// Create a new joint with angle limits in degrees.
    pub fn new(min_deg: f64, max_deg: f64) -> Self {
        Self {
            angle: 0.0,
            velocity: 0.0,
            angle_min: min_deg.to_radians(),
            angle_max: max_deg.to_radians(),
            velocity_limit: 3.0, // rad/s — default, overridden per-joint
        }
    }

    /// Set per-joint velocity limit in deg/s (builder pattern).
    pub fn with_velocity_limit_deg(mut self, limit_deg: f64) -> Self {
        self.velocity_limit = limit_deg.to_radians();
        self
    }

    /// Track a commanded velocity for `dt`: clamp to the velocity limit,
    /// integrate the angle, then stop at the position limits.
    pub fn integrate_velocity(&mut self, commanded: f64, dt: f64) {
        self.velocity = commanded.clamp(-self.velocity_limit, self.velocity_limit);
        self.angle += self.velocity * dt;
        self.clamp_to_limits();
    }

    /// Clamp angle to limits (hard clamp, for safety).
    pub fn clamp_to_limits(&mut self) {
        if self.angle < self.angle_min {
            self.angle = self.angle_min;
            if self.velocity < 0.0 {
                self.velocity = 0.0;
            }
        } else if self.angle > self.angle_max {
            self.angle = self.angle_max;
            if self.velocity > 0.0 {
                self.velocity = 0.0;
            }
        }
    }
}

impl Default for RevoluteJoint {
    fn default() -> Self {
        Self::new(-180.0, 180.0)
    }
}
