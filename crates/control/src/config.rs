//! Controller gains and shaping constants, loadable from TOML.
//!
//! Every field has a default, so an empty file is a valid configuration.
//!
//! ```toml
//! [workspace]
//! centerpoint = 0.88
//! ball_distance_limit = 5.0
//! paddle_frame = "paddle"
//!
//! [velocity]
//! kp = 5.0
//! kd = 1.0
//! log_gain = 1.8
//! max_vertical_speed = 2.0
//!
//! [tilt]
//! kp = 5.0
//! shaping = [0.5, 0.5]
//!
//! [ik]
//! solver = "pseudo_inverse"
//! singular_value_epsilon = 1e-10
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading/validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing failed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantic validation failed.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// Workspace geometry shared by both upstream controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Nominal paddle x position (m); the y reference is 0.
    pub centerpoint: f64,
    /// Ball farther than this from the world origin is treated as lost (m).
    pub ball_distance_limit: f64,
    /// Name of the paddle body frame in the kinematic model.
    pub paddle_frame: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            centerpoint: 0.88,
            ball_distance_limit: 5.0,
            paddle_frame: "paddle".to_string(),
        }
    }
}

/// Velocity tracking gains and vertical shaping constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VelocityGains {
    /// Horizontal position gain (1/s).
    pub kp: f64,
    /// Horizontal velocity gain.
    pub kd: f64,
    /// Log taper gain `a` on the ball's vertical speed.
    pub log_gain: f64,
    /// Saturation of the shaped vertical speed (m/s).
    pub max_vertical_speed: f64,
}

impl Default for VelocityGains {
    fn default() -> Self {
        Self {
            kp: 5.0,
            kd: 1.0,
            log_gain: 1.8,
            max_vertical_speed: 2.0,
        }
    }
}

/// Tilt gains and angle shaping constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TiltGains {
    /// Orientation error gain (1/s).
    pub kp: f64,
    /// Angle shaping constant `k` for the x and y offsets.
    pub shaping: [f64; 2],
}

impl Default for TiltGains {
    fn default() -> Self {
        Self {
            kp: 5.0,
            shaping: [0.5, 0.5],
        }
    }
}

/// How the IK solver inverts the Jacobian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IkSolverKind {
    /// Moore–Penrose pseudo-inverse, no damping.
    #[default]
    PseudoInverse,
    /// Damped least squares with adaptive damping near singularities.
    DampedLeastSquares,
}

/// Differential IK settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IkConfig {
    pub solver: IkSolverKind,
    /// Singular values below this are treated as zero by the pseudo-inverse.
    pub singular_value_epsilon: f64,
}

impl Default for IkConfig {
    fn default() -> Self {
        Self {
            solver: IkSolverKind::PseudoInverse,
            singular_value_epsilon: 1e-10,
        }
    }
}

/// Complete controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ControlConfig {
    pub workspace: WorkspaceConfig,
    pub velocity: VelocityGains,
    pub tilt: TiltGains,
    pub ik: IkConfig,
}

impl ControlConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the control laws cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("velocity.kp", self.velocity.kp)?;
        non_negative("velocity.kd", self.velocity.kd)?;
        positive("velocity.log_gain", self.velocity.log_gain)?;
        positive("velocity.max_vertical_speed", self.velocity.max_vertical_speed)?;
        non_negative("tilt.kp", self.tilt.kp)?;
        positive("tilt.shaping[0]", self.tilt.shaping[0])?;
        positive("tilt.shaping[1]", self.tilt.shaping[1])?;
        positive("workspace.ball_distance_limit", self.workspace.ball_distance_limit)?;
        non_negative("ik.singular_value_epsilon", self.ik.singular_value_epsilon)?;

        if !self.workspace.centerpoint.is_finite() {
            return Err(ConfigError::Validation(
                "workspace.centerpoint must be finite".to_string(),
            ));
        }
        if self.workspace.paddle_frame.is_empty() {
            return Err(ConfigError::Validation(
                "workspace.paddle_frame cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{name} must be finite and >= 0, got {value}"
        )))
    }
}

fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{name} must be finite and > 0, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = ControlConfig::from_toml_str("").unwrap();
        assert_eq!(config, ControlConfig::default());
        assert_eq!(config.workspace.centerpoint, 0.88);
        assert_eq!(config.workspace.ball_distance_limit, 5.0);
        assert_eq!(config.velocity.log_gain, 1.8);
        assert_eq!(config.tilt.shaping, [0.5, 0.5]);
        assert_eq!(config.ik.solver, IkSolverKind::PseudoInverse);
    }

    #[test]
    fn test_partial_override() {
        let config = ControlConfig::from_toml_str(
            r#"
            [velocity]
            kp = 3.0

            [ik]
            solver = "damped_least_squares"
            "#,
        )
        .unwrap();
        assert_eq!(config.velocity.kp, 3.0);
        assert_eq!(config.velocity.kd, 1.0);
        assert_eq!(config.ik.solver, IkSolverKind::DampedLeastSquares);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ControlConfig::from_toml_str("[tilt]\nki = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err}");
    }

    #[test]
    fn test_validation_rejects_negative_gain() {
        let err = ControlConfig::from_toml_str("[velocity]\nkd = -1.0\n").unwrap_err();
        match err {
            ConfigError::Validation(msg) => assert!(msg.contains("velocity.kd"), "{msg}"),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_validation_rejects_empty_frame() {
        let mut config = ControlConfig::default();
        config.workspace.paddle_frame.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[workspace]\ncenterpoint = 0.75").unwrap();
        let config = ControlConfig::load(file.path()).unwrap();
        assert_eq!(config.workspace.centerpoint, 0.75);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ControlConfig::load(Path::new("/nonexistent/paddle.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = ControlConfig::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(ControlConfig::from_toml_str(&text).unwrap(), config);
    }
}
