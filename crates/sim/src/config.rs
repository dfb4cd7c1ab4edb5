//! Sim configuration: loop timing, initial arm pose, ball serve, and the
//! embedded `[control]` table.

use std::path::Path;

use paddlebot_control::{ConfigError, ControlConfig};
use paddlebot_core::DOF;
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Log level for the sim binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoopConfig {
    /// Control/physics rate (Hz).
    pub physics_hz: f64,
    /// Simulated time (s).
    pub duration: f64,
    /// Seconds between status lines.
    pub status_interval: f64,
    pub log_level: LogLevel,
    /// Arm configuration at t = 0 (rad).
    pub initial_q: [f64; DOF],
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            physics_hz: 500.0,
            duration: 3.0,
            status_interval: 0.25,
            log_level: LogLevel::Info,
            initial_q: [0.0, 0.6, 0.0, -1.2, 0.0, 0.9, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BallConfig {
    /// Serve position (m).
    pub position: [f64; 3],
    /// Serve velocity (m/s).
    pub velocity: [f64; 3],
    pub drag: bool,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            position: [0.9, 0.05, 1.4],
            velocity: [-0.1, 0.0, 0.0],
            drag: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub sim: LoopConfig,
    pub ball: BallConfig,
    pub control: ControlConfig,
}

impl SimConfig {
    /// Load from a TOML file. A missing file yields the defaults; the second
    /// value tells whether the file was found.
    pub fn load(path: &Path) -> Result<(Self, bool), ConfigError> {
        if !path.exists() {
            return Ok((Self::default(), false));
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok((Self::from_toml_str(&text)?, true))
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sim.physics_hz.is_finite() && self.sim.physics_hz > 0.0) {
            return Err(ConfigError::Validation(format!(
                "sim.physics_hz must be > 0, got {}",
                self.sim.physics_hz
            )));
        }
        if !(self.sim.duration.is_finite() && self.sim.duration >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "sim.duration must be >= 0, got {}",
                self.sim.duration
            )));
        }
        if !(self.sim.status_interval.is_finite() && self.sim.status_interval > 0.0) {
            return Err(ConfigError::Validation(format!(
                "sim.status_interval must be > 0, got {}",
                self.sim.status_interval
            )));
        }
        self.control.validate()
    }
}
