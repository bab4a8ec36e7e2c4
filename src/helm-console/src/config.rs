// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for helm-console.
//!
//! Config is loaded from `helm-rs.toml`. Default search order:
//! 1. Path specified via `--config` CLI argument
//! 2. `./helm-rs.toml`
//! 3. `~/.config/helm-rs/helm-rs.toml`
//! 4. `/etc/helm-rs/helm-rs.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use helm_core::sensor::{AuxSense, RudderGeometry};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, String),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, String),
}

/// Returns the default search paths for `helm-rs.toml`
/// (current directory → XDG config → /etc).
fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("helm-rs.toml")];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("helm-rs").join("helm-rs.toml"));
    }
    paths.push(PathBuf::from("/etc/helm-rs/helm-rs.toml"));
    paths
}

/// Top-level console configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Analog acquisition settings
    pub sensor: SensorConfig,
    /// Rudder sensor geometry and channel use
    pub rudder: RudderConfig,
    /// Tick and render cadence
    pub ui: UiConfig,
    /// Simulated-boat parameters for the desk harness
    pub sim: SimConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Analog acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Voltage corresponding to a full-scale ADC reading, after the input
    /// divider.
    pub full_scale_voltage: f64,
    /// Acquisition period in milliseconds.
    pub poll_period_ms: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            full_scale_voltage: 20.0,
            poll_period_ms: 1000,
        }
    }
}

/// Rudder sensor configuration for the auxiliary analog channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RudderConfig {
    /// Auxiliary channel use: "angle" for the rudder sensor, anything else
    /// for a plain voltage channel.
    pub sense: String,
    /// Reference voltage feeding the sensor.
    pub supply_voltage: f64,
    /// Total angular travel of the sensor, in degrees.
    pub angular_travel_deg: f64,
    /// True when the sensor reads zero volts at full port deflection.
    pub zero_to_port: bool,
}

impl Default for RudderConfig {
    fn default() -> Self {
        Self {
            sense: "angle".to_string(),
            supply_voltage: 5.0,
            angular_travel_deg: 60.0,
            zero_to_port: true,
        }
    }
}

impl RudderConfig {
    /// Resolve the auxiliary channel mode for the acquisition task.
    pub fn aux_sense(&self) -> AuxSense {
        match self.sense.as_str() {
            "angle" => AuxSense::RudderAngle(RudderGeometry {
                supply_voltage: self.supply_voltage,
                angular_travel: self.angular_travel_deg.to_radians(),
                zero_to_port: self.zero_to_port,
            }),
            _ => AuxSense::Voltage,
        }
    }
}

/// Tick and render cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Scheduler tick period in milliseconds; the long-press debounce is
    /// sampled at this rate.
    pub tick_period_ms: u64,
    /// Status-line render period in milliseconds.
    pub render_period_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 100,
            render_period_ms: 2000,
        }
    }
}

/// Simulated-boat parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub house_volts: f64,
    pub starter_volts: f64,
    pub supply_volts: f64,
    /// Voltage presented by the simulated rudder sensor.
    pub rudder_volts: f64,
    /// Heading at startup, degrees.
    pub initial_heading_deg: f64,
    /// Turn rate while the autopilot holds a course, degrees per second.
    pub turn_rate_deg_s: f64,
    /// Seconds until the simulated heading sensor reports full calibration.
    pub calibration_delay_s: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            house_volts: 12.4,
            starter_volts: 12.7,
            supply_volts: 13.8,
            rudder_volts: 2.5,
            initial_heading_deg: 90.0,
            turn_rate_deg_s: 3.0,
            calibration_delay_s: 5,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))
    }

    /// Search the default paths and load the first file found.
    ///
    /// Returns `(config, path_where_found)` or `(Default::default(), None)`
    /// when no config file exists.
    pub fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        for path in config_search_paths() {
            if path.exists() {
                return Ok((Self::load_from_file(&path)?, Some(path)));
            }
        }
        Ok((Self::default(), None))
    }

    /// Render the default configuration as example TOML.
    pub fn example_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}
