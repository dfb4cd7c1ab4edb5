//! Paddlebot headless sim — fixed-step loop driving the paddle controller
//! against a ballistic ball.
//!
//! Each step: read arm and ball state, run one control tick, limit the
//! joint-velocity command, integrate the joints, advance the ball.

mod ball;
mod config;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use nalgebra::Vector3;
use paddlebot_control::ik::scale_to_velocity_limits;
use paddlebot_control::{PaddleController, TickInput};
use paddlebot_core::JointVector;
use paddlebot_physics::arm::RobotArm;
use paddlebot_physics::KinematicsProvider;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use crate::ball::Ball;
use crate::config::SimConfig;

/// Headless paddle control loop
#[derive(Parser, Debug)]
#[command(name = "paddlebot_sim")]
#[command(version)]
#[command(about = "Run the paddle controller against a simulated ball")]
struct Args {
    /// Path to the sim configuration TOML.
    #[arg(default_value = "config/sim.toml")]
    config: PathBuf,

    /// Override the simulated duration (s).
    #[arg(long)]
    duration: Option<f64>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let loaded = SimConfig::load(&args.config);
    let level = match &loaded {
        Ok((config, _)) => config.sim.log_level.into(),
        Err(_) => Level::INFO,
    };
    setup_tracing(&args, level);

    let config = match loaded {
        Ok((config, true)) => {
            info!("Loaded config from {:?}", args.config);
            config
        }
        Ok((config, false)) => {
            warn!("No config file at {:?}, using defaults", args.config);
            config
        }
        Err(e) => {
            error!("FATAL: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(&args, config) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args, config: SimConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut arm = RobotArm::default_7dof();
    arm.set_configuration(&config.sim.initial_q);
    let limits = arm.velocity_limits();
    let paddle = arm.frame_id(paddlebot_physics::arm::PADDLE_FRAME)?;

    let mut controller = PaddleController::new(arm.clone(), &config.control)?;
    let mut ball = Ball::serve(
        Vector3::from(config.ball.position),
        Vector3::from(config.ball.velocity),
        config.ball.drag,
    );

    let dt = 1.0 / config.sim.physics_hz;
    let duration = args.duration.unwrap_or(config.sim.duration).max(0.0);
    let steps = (duration / dt).round() as u64;
    let status_every = ((config.sim.status_interval / dt).round() as u64).max(1);

    info!(
        hz = config.sim.physics_hz,
        duration, steps, "starting paddle loop"
    );

    let mut lost_ticks = 0u64;
    let mut limited_ticks = 0u64;
    let mut peak_joint_speed = 0.0_f64;

    for step in 0..steps {
        let q = JointVector::from_column_slice(&arm.joint_angles());
        let v = JointVector::from_column_slice(&arm.joint_velocities());
        let out = controller.tick(&TickInput {
            q,
            v,
            ball: ball.state(),
        });
        if !out.ball_in_play {
            lost_ticks += 1;
        }

        let mut dq = out.joint_velocity;
        let raw_peak = dq.amax();
        scale_to_velocity_limits(&mut dq, &limits);
        if dq.amax() < raw_peak {
            limited_ticks += 1;
        }
        peak_joint_speed = peak_joint_speed.max(dq.amax());

        for (joint, &w) in arm.joints.iter_mut().zip(dq.iter()) {
            joint.integrate_velocity(w, dt);
        }
        ball.step(dt);

        if step % status_every == 0 {
            let pose = arm.body_pose(paddle);
            let manipulability = controller.ik_mut().manipulability_at(&q);
            info!(
                t = step as f64 * dt,
                ball = ?ball.position.as_slice(),
                paddle = ?pose.position.as_slice(),
                rpy = ?pose.rpy.as_slice(),
                manipulability,
                "status"
            );
        }
    }

    let pose = arm.body_pose(paddle);
    info!(
        lost_ticks,
        limited_ticks,
        peak_joint_speed,
        final_paddle = ?pose.position.as_slice(),
        final_ball = ?ball.position.as_slice(),
        "paddle loop finished"
    );
    Ok(())
}

fn setup_tracing(args: &Args, configured: Level) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        configured
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
