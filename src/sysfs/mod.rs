//! Accessors for single-value sysfs control attributes.
//!
//! Driver attributes are plain ASCII decimal values with an optional trailing
//! newline. Every access opens the file, performs one read or write, and closes
//! it again so the kernel sees each value as a distinct store.


use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::error::SensorError;

/// A single sysfs attribute file (e.g. "/sys/class/input/event3/device/poll")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysfsAttribute {
    path: PathBuf,
}

impl SysfsAttribute {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Write the decimal representation of the given value to the attribute.
    pub fn write(&self, value: i32) -> Result<(), SensorError> {
        log::debug!("Writing '{value}' to {:?}", self.path);
        let text = value.to_string();
        self.write_raw(text.as_bytes())
    }

    /// Write a boolean to the attribute as "0" or "1"
    pub fn write_bool(&self, value: bool) -> Result<(), SensorError> {
        self.write(i32::from(value))
    }

    fn write_raw(&self, data: &[u8]) -> Result<(), SensorError> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| SensorError::AttributeWriteFailed {
                path: self.path.clone(),
                source,
            })?;

        let count = file
            .write(data)
            .map_err(|source| SensorError::AttributeWriteFailed {
                path: self.path.clone(),
                source,
            })?;
        if count == 0 {
            return Err(SensorError::AttributeWriteFailed {
                path: self.path.clone(),
                source: io::Error::new(io::ErrorKind::WriteZero, "no bytes were written"),
            });
        }

        Ok(())
    }

    /// Read the attribute and parse it as an integer
    pub fn read(&self) -> Result<i32, SensorError> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| SensorError::AttributeReadFailed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        let value = content.trim();
        log::debug!("Read '{value}' from {:?}", self.path);

        value
            .parse::<i32>()
            .map_err(|e| SensorError::AttributeReadFailed {
                path: self.path.clone(),
                reason: format!("unable to parse '{value}': {e}"),
            })
    }

    /// Read the attribute, falling back to 0 if it cannot be read or parsed.
    pub fn read_or_default(&self) -> i32 {
        match self.read() {
            Ok(value) => value,
            Err(e) => {
                log::warn!("{e}. Using default value of 0.");
                0
            }
        }
    }
}
