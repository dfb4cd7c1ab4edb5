//! Spatial (twist) vectors.
//!
//! Spatial vectors combine angular and linear components into 6D vectors.
//! Convention: [angular (3); linear (3)], matching the Jacobian row order.

use nalgebra::{Vector3, Vector6};

/// Spatial velocity (twist).
pub type Twist = Vector6<f64>;

/// Extract angular part (top 3) of a spatial vector.
pub fn angular(v: &Twist) -> Vector3<f64> {
    Vector3::new(v[0], v[1], v[2])
}

/// Extract linear part (bottom 3) of a spatial vector.
pub fn linear(v: &Twist) -> Vector3<f64> {
    Vector3::new(v[3], v[4], v[5])
}

/// Construct a twist from angular and linear parts.
pub fn twist(ang: &Vector3<f64>, lin: &Vector3<f64>) -> Twist {
    Twist::new(ang.x, ang.y, ang.z, lin.x, lin.y, lin.z)
}
