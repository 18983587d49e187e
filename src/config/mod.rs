
pub mod path;

use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    ACCEL_NAME, DEFAULT_POLL_INTERVAL, DEV_INPUT_PATH, MAGNET_NAME, SYSFS_INPUT_PATH,
};

/// Represents all possible errors loading a [Config]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
}

/// Filesystem locations used to discover and control sensors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorPaths {
    /// Directory with the event device nodes (e.g. "/dev/input")
    pub dev_input_path: PathBuf,
    /// Sysfs class directory of the input devices (e.g. "/sys/class/input")
    pub sysfs_input_path: PathBuf,
}

impl SensorPaths {
    pub fn new(dev_input_path: impl Into<PathBuf>, sysfs_input_path: impl Into<PathBuf>) -> Self {
        Self {
            dev_input_path: dev_input_path.into(),
            sysfs_input_path: sysfs_input_path.into(),
        }
    }
}

impl Default for SensorPaths {
    fn default() -> Self {
        Self::new(DEV_INPUT_PATH, SYSFS_INPUT_PATH)
    }
}

/// Top-level application configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    pub version: u32,
    pub dev_input_path: Option<PathBuf>,
    pub sysfs_input_path: Option<PathBuf>,
    #[serde(default)]
    pub sensors: Vec<SensorConfig>,
}

/// A sensor to bind and activate on startup
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct SensorConfig {
    /// Prefix printed in front of each reading
    pub label: String,
    /// Driver name of the sensor (e.g. "mag3110")
    pub name: String,
    pub poll_interval: Option<i32>,
    pub position: Option<i32>,
}

impl Config {
    /// Load a [Config] from the given YAML string
    pub fn from_yaml(content: String) -> Result<Config, LoadError> {
        let config: Config = serde_yaml::from_str(content.as_str())?;
        Ok(config)
    }

    /// Load a [Config] from the given YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Config, LoadError> {
        let file = std::fs::File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    /// Returns the sensor paths, using the system defaults for unset entries
    pub fn paths(&self) -> SensorPaths {
        let defaults = SensorPaths::default();
        SensorPaths {
            dev_input_path: self
                .dev_input_path
                .clone()
                .unwrap_or(defaults.dev_input_path),
            sysfs_input_path: self
                .sysfs_input_path
                .clone()
                .unwrap_or(defaults.sysfs_input_path),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            dev_input_path: None,
            sysfs_input_path: None,
            sensors: vec![
                SensorConfig {
                    label: "accel".to_string(),
                    name: ACCEL_NAME.to_string(),
                    poll_interval: Some(DEFAULT_POLL_INTERVAL),
                    position: None,
                },
                SensorConfig {
                    label: "magnet".to_string(),
                    name: MAGNET_NAME.to_string(),
                    poll_interval: Some(DEFAULT_POLL_INTERVAL),
                    position: None,
                },
            ],
        }
    }
}

/// Load the configuration from the given path, or from the first config file
/// found in the search paths. Falls back to the built-in defaults if no file exists.
pub fn load(explicit: Option<&Path>) -> Result<Config, LoadError> {
    if let Some(path) = explicit {
        log::debug!("Loading config from {path:?}");
        return Config::from_yaml_file(path);
    }

    let Some(path) = path::find_config_file() else {
        log::info!("No config file found. Using defaults.");
        return Ok(Config::default());
    };

    log::debug!("Loading config from {path:?}");
    Config::from_yaml_file(&path)
}
