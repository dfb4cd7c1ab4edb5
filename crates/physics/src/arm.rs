//! Robot arm model: DH parameters, forward kinematics, spatial Jacobian.

use nalgebra::{DMatrix, DVector, Isometry3, Translation3, UnitQuaternion, Vector3};

use crate::joint::RevoluteJoint;
use crate::provider::{BodyPose, BodyVelocity, FrameId, KinematicsError, KinematicsProvider};
use paddlebot_core::{rpy, DhParams};

/// Name of the arm base frame.
pub const BASE_FRAME: &str = "base";
/// Name of the paddle frame mounted on the flange.
pub const PADDLE_FRAME: &str = "paddle";

/// A serial robot arm defined by DH parameters, holding a paddle.
///
/// Frame ids: 0 is the base, `1..=n` are the link frames after each joint,
/// `n + 1` is the paddle.
#[derive(Debug, Clone)]
pub struct RobotArm {
    /// DH parameters for each joint.
    pub dh_params: Vec<DhParams>,
    /// Joint state (angle, velocity) and limits.
    pub joints: Vec<RevoluteJoint>,
    /// Link names, used as frame names.
    pub link_names: Vec<String>,
    /// Pose of the arm base in the world frame.
    pub base_pose: Isometry3<f64>,
    /// Paddle offset along the flange Z-axis (m).
    pub paddle_offset: f64,
}

impl RobotArm {
    /// Assemble an arm, checking that the per-joint descriptions line up.
    pub fn new(
        dh_params: Vec<DhParams>,
        joints: Vec<RevoluteJoint>,
        link_names: Vec<String>,
        base_pose: Isometry3<f64>,
        paddle_offset: f64,
    ) -> Result<Self, KinematicsError> {
        if dh_params.is_empty() {
            return Err(KinematicsError::EmptyArm);
        }
        if joints.len() != dh_params.len() {
            return Err(KinematicsError::DimensionMismatch {
                what: "joints",
                expected: dh_params.len(),
                got: joints.len(),
            });
        }
        if link_names.len() != dh_params.len() {
            return Err(KinematicsError::DimensionMismatch {
                what: "link names",
                expected: dh_params.len(),
                got: link_names.len(),
            });
        }
        Ok(Self {
            dh_params,
            joints,
            link_names,
            base_pose,
            paddle_offset,
        })
    }

    /// Create the default 7-DOF arm (KUKA LBR iiwa 7 geometry) with the base
    /// at the world origin and a paddle 6cm past the flange.
    pub fn default_7dof() -> Self {
        use std::f64::consts::FRAC_PI_2;

        let dh_params = vec![
            DhParams::new(0.0, 0.340, -FRAC_PI_2), // J1
            DhParams::new(0.0, 0.0, FRAC_PI_2),    // J2
            DhParams::new(0.0, 0.400, FRAC_PI_2),  // J3
            DhParams::new(0.0, 0.0, -FRAC_PI_2),   // J4
            DhParams::new(0.0, 0.400, -FRAC_PI_2), // J5
            DhParams::new(0.0, 0.0, FRAC_PI_2),    // J6
            DhParams::new(0.0, 0.126, 0.0),        // J7 flange
        ];

        let joints = vec![
            RevoluteJoint::new(-170.0, 170.0).with_velocity_limit_deg(98.0),
            RevoluteJoint::new(-120.0, 120.0).with_velocity_limit_deg(98.0),
            RevoluteJoint::new(-170.0, 170.0).with_velocity_limit_deg(100.0),
            RevoluteJoint::new(-120.0, 120.0).with_velocity_limit_deg(130.0),
            RevoluteJoint::new(-170.0, 170.0).with_velocity_limit_deg(140.0),
            RevoluteJoint::new(-120.0, 120.0).with_velocity_limit_deg(180.0),
            RevoluteJoint::new(-175.0, 175.0).with_velocity_limit_deg(180.0),
        ];

        let link_names = (1..=dh_params.len()).map(|i| format!("link_{i}")).collect();

        Self {
            dh_params,
            joints,
            link_names,
            base_pose: Isometry3::identity(),
            paddle_offset: 0.06,
        }
    }

    pub fn num_joints(&self) -> usize {
        self.joints.len()
    }

    /// Get joint angles as a vector.
    pub fn joint_angles(&self) -> Vec<f64> {
        self.joints.iter().map(|j| j.angle).collect()
    }

    /// Get joint velocities as a vector.
    pub fn joint_velocities(&self) -> Vec<f64> {
        self.joints.iter().map(|j| j.velocity).collect()
    }

    /// Per-joint velocity limits (rad/s).
    pub fn velocity_limits(&self) -> Vec<f64> {
        self.joints.iter().map(|j| j.velocity_limit).collect()
    }

    /// Compute all link frames in the world frame.
    /// Returns n+1 frames: base frame + each link frame.
    pub fn link_frames(&self) -> Vec<Isometry3<f64>> {
        let mut frames = Vec::with_capacity(self.joints.len() + 1);
        let mut t = self.base_pose;
        frames.push(t);
        for (dh, joint) in self.dh_params.iter().zip(self.joints.iter()) {
            t *= dh.transform(joint.angle);
            frames.push(t);
        }
        frames
    }

    /// World pose of any frame id.
    pub fn frame_pose(&self, frame: FrameId) -> Isometry3<f64> {
        let n = self.num_joints();
        let frames = self.link_frames();
        if frame.0 <= n {
            return frames[frame.0];
        }
        frames[n]
            * Isometry3::from_parts(
                Translation3::new(0.0, 0.0, self.paddle_offset),
                UnitQuaternion::identity(),
            )
    }

    /// Paddle pose in the world frame (convenience).
    pub fn paddle_pose(&self) -> Isometry3<f64> {
        self.frame_pose(FrameId(self.num_joints() + 1))
    }

    /// Geometric Jacobian (6×n) of a frame origin, in the world frame.
    /// Top 3 rows: angular velocity. Bottom 3 rows: linear velocity.
    /// Joints past the frame contribute zero columns.
    pub fn jacobian(&self, frame: FrameId) -> DMatrix<f64> {
        let n = self.num_joints();
        let mut jac = DMatrix::zeros(6, n);
        let frames = self.link_frames();
        let p_frame = self.frame_pose(frame).translation.vector;
        let driving = frame.0.min(n);

        for i in 0..driving {
            let frame_i = &frames[i];
            // Z-axis of joint i in world frame
            let z_i = frame_i.rotation * Vector3::z();
            // Position of joint i in world frame
            let p_i = frame_i.translation.vector;

            // Angular part (revolute joint → z_i)
            jac[(0, i)] = z_i.x;
            jac[(1, i)] = z_i.y;
            jac[(2, i)] = z_i.z;

            // Linear part: z_i × (p_frame - p_i)
            let lin = z_i.cross(&(p_frame - p_i));
            jac[(3, i)] = lin.x;
            jac[(4, i)] = lin.y;
            jac[(5, i)] = lin.z;
        }

        jac
    }
}

impl KinematicsProvider for RobotArm {
    fn num_positions(&self) -> usize {
        self.num_joints()
    }

    fn num_velocities(&self) -> usize {
        self.num_joints()
    }

    fn arm_velocity_start(&self) -> usize {
        0
    }

    fn frame_id(&self, name: &str) -> Result<FrameId, KinematicsError> {
        if name == BASE_FRAME {
            return Ok(FrameId(0));
        }
        if name == PADDLE_FRAME {
            return Ok(FrameId(self.num_joints() + 1));
        }
        self.link_names
            .iter()
            .position(|link| link == name)
            .map(|i| FrameId(i + 1))
            .ok_or_else(|| KinematicsError::UnknownFrame(name.to_string()))
    }

    fn set_configuration(&mut self, q: &[f64]) {
        for (j, &a) in self.joints.iter_mut().zip(q.iter()) {
            j.angle = a;
        }
    }

    fn set_configuration_and_velocity(&mut self, q: &[f64], v: &[f64]) {
        self.set_configuration(q);
        for (j, &w) in self.joints.iter_mut().zip(v.iter()) {
            j.velocity = w;
        }
    }

    fn spatial_jacobian(&self, frame: FrameId) -> DMatrix<f64> {
        self.jacobian(frame)
    }

    fn body_pose(&self, frame: FrameId) -> BodyPose {
        let pose = self.frame_pose(frame);
        BodyPose {
            position: pose.translation.vector,
            rpy: rpy(&pose.rotation),
        }
    }

    fn body_spatial_velocity(&self, frame: FrameId) -> BodyVelocity {
        let v = DVector::from_vec(self.joint_velocities());
        let twist = self.jacobian(frame) * v;
        BodyVelocity {
            angular: Vector3::new(twist[0], twist[1], twist[2]),
            linear: Vector3::new(twist[3], twist[4], twist[5]),
        }
    }
}
