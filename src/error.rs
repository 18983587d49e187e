use std::{io, path::PathBuf};

use thiserror::Error;

/// Represents all possible errors reported by a three-axis sensor
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("no input device found for sensor '{0}'")]
    DeviceNotFound(String),
    #[error("failed to write to {path:?}: {source}")]
    AttributeWriteFailed { path: PathBuf, source: io::Error },
    #[error("failed to read {path:?}: {reason}")]
    AttributeReadFailed { path: PathBuf, reason: String },
    #[error("failed to open event stream {path:?}: {source}")]
    StreamOpenFailed { path: PathBuf, source: io::Error },
    #[error("short read from event stream: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },
    #[error("failed to read from event stream: {0}")]
    StreamReadFailed(io::Error),
    #[error("{0}")]
    PreconditionViolation(String),
    #[error("value {value} is out of range [{min}, {max}]")]
    OutOfRange { value: i32, min: i32, max: i32 },
    #[error("unable to watch event stream: {0}")]
    Watch(io::Error),
}
