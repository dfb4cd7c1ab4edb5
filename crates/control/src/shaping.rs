//! Nonlinear shaping functions used by the velocity and tilt controllers.
//!
//! These are empirically tuned heuristics. None of them is clamped beyond
//! what is written here: far from the centerpoint the workspace scale goes
//! negative and flips the vertical command.

use nalgebra::Vector3;

/// Sign with `sign(0) == 0`. NaN stays NaN.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else if x == 0.0 {
        0.0
    } else {
        f64::NAN
    }
}

/// Log-tapered mirror of the ball's vertical speed, saturated at `max_speed`.
///
/// Rising balls (vz >= 0) map to a downward command and falling balls to an
/// upward one: `∓a·ln(|vz| + 1)`, clamped to ±`max_speed`. Zero maps to zero.
pub fn shape_vertical_velocity(vz: f64, log_gain: f64, max_speed: f64) -> f64 {
    if vz >= 0.0 {
        (-log_gain * (vz + 1.0).ln()).max(-max_speed)
    } else {
        (log_gain * (-vz + 1.0).ln()).min(max_speed)
    }
}

/// Radial scale `1 - (x - centerpoint)² - y²` on the ball's horizontal position.
pub fn workspace_scale(ball_position: &Vector3<f64>, centerpoint: f64) -> f64 {
    let dx = ball_position.x - centerpoint;
    let dy = ball_position.y;
    1.0 - dx * dx - dy * dy
}

/// Tilt multiplier for one axis: 1 when the ball's offset and velocity have
/// the same sign, otherwise `0.5 / (10·|velocity| + 1)`.
pub fn tilt_sign_multiplier(offset: f64, velocity: f64) -> f64 {
    if sign(offset) == sign(velocity) {
        1.0
    } else {
        0.5 / (10.0 * velocity.abs() + 1.0)
    }
}

/// Desired tilt angle for one axis: `multiplier · atan(k·(1 - cos(offset)) / offset)`,
/// exactly 0 at zero offset.
pub fn tilt_angle(offset: f64, k: f64, multiplier: f64) -> f64 {
    if offset == 0.0 {
        return 0.0;
    }
    multiplier * (k * (1.0 - offset.cos()) / offset).atan()
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: f64 = 1.8;
    const VMAX: f64 = 2.0;

    #[test]
    fn test_shaped_velocity_zero_at_rest() {
        assert_eq!(shape_vertical_velocity(0.0, A, VMAX), 0.0);
        assert_eq!(shape_vertical_velocity(-0.0, A, VMAX), 0.0);
    }

    #[test]
    fn test_shaped_velocity_saturates() {
        let speeds = [
            -1e12, -1e3, -30.0, -3.0, -1.0, -0.1, -1e-9, 1e-9, 0.1, 1.0, 3.0, 30.0, 1e3, 1e12,
        ];
        for vz in speeds {
            let shaped = shape_vertical_velocity(vz, A, VMAX);
            assert!(shaped.abs() <= VMAX, "|shape({})| = {} > {}", vz, shaped, VMAX);
            // Always opposes the ball
            assert!(shaped * vz <= 0.0, "shape({}) = {} has the same sign", vz, shaped);
        }
        assert_eq!(shape_vertical_velocity(100.0, A, VMAX), -VMAX);
        assert_eq!(shape_vertical_velocity(-100.0, A, VMAX), VMAX);
    }

    #[test]
    fn test_shaped_velocity_log_region() {
        // Below saturation: exactly a·ln(|vz| + 1)
        let shaped = shape_vertical_velocity(-1.0, A, VMAX);
        assert!((shaped - A * 2.0_f64.ln()).abs() < 1e-12, "shaped = {}", shaped);
        let shaped = shape_vertical_velocity(0.5, A, VMAX);
        assert!((shaped + A * 1.5_f64.ln()).abs() < 1e-12, "shaped = {}", shaped);
    }

    #[test]
    fn test_workspace_scale() {
        let centered = Vector3::new(0.88, 0.0, 1.3);
        assert_eq!(workspace_scale(&centered, 0.88), 1.0);

        let off = Vector3::new(0.88 + 0.3, 0.4, 0.0);
        assert!((workspace_scale(&off, 0.88) - 0.75).abs() < 1e-12);

        // Past unit radius the scale goes negative
        let far = Vector3::new(0.88, 1.5, 0.0);
        assert!((workspace_scale(&far, 0.88) + 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_sign_multiplier_range() {
        let values = [-3.0, -0.5, -1e-6, 0.0, 1e-6, 0.5, 3.0];
        for &offset in &values {
            for &velocity in &values {
                let m = tilt_sign_multiplier(offset, velocity);
                assert!(m > 0.0 && m <= 1.0, "m({}, {}) = {}", offset, velocity, m);
                if sign(offset) == sign(velocity) {
                    assert_eq!(m, 1.0);
                } else {
                    assert_eq!(m, 0.5 / (10.0 * velocity.abs() + 1.0));
                }
            }
        }
    }

    #[test]
    fn test_sign_multiplier_cases() {
        // Moving away from the reference: full tilt
        assert_eq!(tilt_sign_multiplier(0.2, 1.0), 1.0);
        assert_eq!(tilt_sign_multiplier(-0.2, -1.0), 1.0);
        // Already returning: damped by speed
        assert!((tilt_sign_multiplier(0.2, -1.0) - 0.5 / 11.0).abs() < 1e-15);
        // Offset but at rest: signs differ (1 vs 0)
        assert_eq!(tilt_sign_multiplier(0.2, 0.0), 0.5);
        // Centered and at rest
        assert_eq!(tilt_sign_multiplier(0.0, 0.0), 1.0);
    }

    #[test]
    fn test_tilt_angle_zero_offset() {
        assert_eq!(tilt_angle(0.0, 0.5, 1.0), 0.0);
        assert_eq!(tilt_angle(0.0, 0.5, 0.05), 0.0);
    }

    #[test]
    fn test_tilt_angle_shape() {
        // Small offset: ≈ k·offset/2
        let a = tilt_angle(1e-3, 0.5, 1.0);
        assert!((a - 0.25e-3).abs() < 1e-9, "a = {}", a);

        // Odd in the offset
        let pos = tilt_angle(0.4, 0.5, 1.0);
        let neg = tilt_angle(-0.4, 0.5, 1.0);
        assert!(pos > 0.0);
        assert!((pos + neg).abs() < 1e-15);

        // Scaled by the multiplier
        assert!((tilt_angle(0.4, 0.5, 0.25) - 0.25 * pos).abs() < 1e-15);

        // Bounded by atan(k·2/|offset|) < π/2
        assert!(tilt_angle(1e3, 0.5, 1.0).abs() < std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(2.0), 1.0);
        assert_eq!(sign(-2.0), -1.0);
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert!(sign(f64::NAN).is_nan());
    }
}
