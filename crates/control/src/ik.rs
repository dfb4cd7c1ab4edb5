//! Differential inverse kinematics: paddle twist → joint velocities.
//!
//! Baseline is the plain Moore–Penrose pseudo-inverse of the paddle Jacobian.
//! Near singularities it returns large-norm least-squares solutions; the
//! damped least-squares variant (adaptive Nakamura damping) trades tracking
//! accuracy for bounded joint speeds there.

use nalgebra::{DMatrix, DVector, Vector3};
use paddlebot_core::JointVector;
use paddlebot_physics::spatial::{twist, Twist};
use paddlebot_physics::KinematicsProvider;
use tracing::{debug, trace};

use crate::config::{ControlConfig, IkSolverKind};
use crate::error::ControlError;
use crate::scratch::ScratchModel;

/// Nakamura adaptive damping constants.
const MANIPULABILITY_THRESHOLD: f64 = 0.01; // w0: below this, increase damping
const LAMBDA_MAX: f64 = 0.15;              // Maximum damping near singularities
const LAMBDA_MIN: f64 = 0.001;             // Minimum damping far from singularities

/// Inputs for one IK evaluation.
#[derive(Debug, Clone, Copy)]
pub struct IkInput {
    /// Desired paddle linear velocity (m/s, world frame).
    pub linear: Vector3<f64>,
    /// Desired paddle angular velocity (rad/s, world frame).
    pub angular: Vector3<f64>,
    /// Arm joint positions (rad).
    pub q: JointVector,
}

/// Maps a desired paddle twist to arm joint velocities.
#[derive(Debug, Clone)]
pub struct DifferentialIk<K> {
    scratch: ScratchModel<K>,
    solver: IkSolverKind,
    epsilon: f64,
}

impl<K: KinematicsProvider> DifferentialIk<K> {
    pub fn new(model: K, config: &ControlConfig) -> Result<Self, ControlError> {
        config.validate()?;
        Ok(Self {
            scratch: ScratchModel::new(model, &config.workspace.paddle_frame)?,
            solver: config.ik.solver,
            epsilon: config.ik.singular_value_epsilon,
        })
    }

    pub fn solver(&self) -> IkSolverKind {
        self.solver
    }

    /// Joint velocities realizing `[angular; linear]` at configuration `q`.
    pub fn solve(&mut self, input: &IkInput) -> JointVector {
        self.solve_twist(&input.q, &twist(&input.angular, &input.linear))
    }

    /// Joint velocities realizing `desired` (angular rows first) at `q`.
    ///
    /// The Jacobian is recomputed from `q` on every call.
    pub fn solve_twist(&mut self, q: &JointVector, desired: &Twist) -> JointVector {
        self.scratch.load(q);
        let jac = self.scratch.paddle_jacobian();
        let e = DVector::from_column_slice(desired.as_slice());

        let dq = match self.solver {
            IkSolverKind::PseudoInverse => pseudo_inverse_solve(&jac, &e, self.epsilon),
            IkSolverKind::DampedLeastSquares => {
                let lambda = adaptive_damping(&jac);
                if lambda > LAMBDA_MIN {
                    debug!(lambda, "near singularity, damping IK");
                }
                damped_least_squares_rect(&jac, &e, lambda)
            }
        };

        let dq = JointVector::from_column_slice(dq.as_slice());
        trace!(?dq, "joint velocity command");
        dq
    }

    /// Manipulability of the paddle Jacobian at `q`.
    pub fn manipulability_at(&mut self, q: &JointVector) -> f64 {
        self.scratch.load(q);
        manipulability(&self.scratch.paddle_jacobian())
    }
}

/// Minimum-norm least-squares solution `J⁺ e`.
fn pseudo_inverse_solve(jac: &DMatrix<f64>, error: &DVector<f64>, epsilon: f64) -> DVector<f64> {
    match jac.clone().pseudo_inverse(epsilon) {
        Ok(pinv) => pinv * error,
        Err(_) => DVector::zeros(jac.ncols()),
    }
}

/// Compute manipulability: w = sqrt(det(J * J^T)).
pub fn manipulability(jac: &DMatrix<f64>) -> f64 {
    let jjt = jac * jac.transpose();
    let det = jjt.determinant();
    if det > 0.0 { det.sqrt() } else { 0.0 }
}

/// Nakamura's variable damping: high near singularities, low elsewhere.
fn adaptive_damping(jac: &DMatrix<f64>) -> f64 {
    let w = manipulability(jac);
    if w < MANIPULABILITY_THRESHOLD {
        let ratio = w / MANIPULABILITY_THRESHOLD;
        LAMBDA_MAX * (1.0 - ratio * ratio).sqrt()
    } else {
        LAMBDA_MIN
    }
}

/// Damped least-squares: dq = J^T (J J^T + λ²I)^{-1} e
fn damped_least_squares_rect(
    jac: &DMatrix<f64>,
    error: &DVector<f64>,
    lambda: f64,
) -> DVector<f64> {
    let jjt = jac * jac.transpose();
    let m = jjt.nrows();
    let damping_matrix = DMatrix::identity(m, m) * (lambda * lambda);
    let to_invert = jjt + damping_matrix;

    match to_invert.try_inverse() {
        Some(inv) => jac.transpose() * inv * error,
        None => DVector::zeros(jac.ncols()),
    }
}

/// Scale the entire command proportionally so no joint exceeds its velocity
/// limit (rad/s). Direction is preserved. Non-positive limits are ignored.
pub fn scale_to_velocity_limits(dq: &mut JointVector, limits: &[f64]) {
    // Find the worst violator: max(|dq_i| / limit_i)
    let mut max_ratio = 1.0_f64;
    for (d, &limit) in dq.iter().zip(limits.iter()) {
        if limit > 0.0 {
            let ratio = d.abs() / limit;
            if ratio > max_ratio {
                max_ratio = ratio;
            }
        }
    }
    if max_ratio > 1.0 {
        *dq /= max_ratio;
    }
}
