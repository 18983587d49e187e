use std::{
    fs::{self, OpenOptions},
    io,
    os::{fd::AsRawFd, unix::fs::OpenOptionsExt},
    path::{Path, PathBuf},
};

use nix::fcntl::OFlag;

use crate::constants::DEVICE_NAME_BUFFER_LEN;

nix::ioctl_read_buf!(eviocgname, b'E', 0x06, u8);

/// Queries the driver-reported name of an input device node
pub trait NameQuery: Send {
    fn device_name(&self, path: &Path) -> io::Result<String>;
}

/// [NameQuery] implementation using the EVIOCGNAME ioctl
#[derive(Debug, Default, Clone, Copy)]
pub struct EvdevNameQuery;

impl NameQuery for EvdevNameQuery {
    fn device_name(&self, path: &Path) -> io::Result<String> {
        // Non-blocking so a node without a producer can never stall discovery
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(OFlag::O_NONBLOCK.bits())
            .open(path)?;

        let mut buffer = [0u8; DEVICE_NAME_BUFFER_LEN];
        unsafe { eviocgname(file.as_raw_fd(), &mut buffer) }.map_err(io::Error::from)?;

        Ok(name_from_buffer(&buffer))
    }
}

/// Returns the name stored in the given buffer up to the first NUL byte
pub fn name_from_buffer(buffer: &[u8]) -> String {
    let len = buffer
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..len]).to_string()
}

/// Finds the event device belonging to a named sensor driver
pub struct DeviceLocator {
    base_path: PathBuf,
    query: Box<dyn NameQuery>,
}

impl DeviceLocator {
    /// Create a locator scanning the given directory with EVIOCGNAME
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self::with_query(base_path, EvdevNameQuery)
    }

    pub fn with_query(base_path: impl Into<PathBuf>, query: impl NameQuery + 'static) -> Self {
        Self {
            base_path: base_path.into(),
            query: Box::new(query),
        }
    }

    pub fn base_path(&self) -> &Path {
        self.base_path.as_path()
    }

    /// Returns the event device name (e.g. "event3") whose driver reports the
    /// given sensor name, compared case-insensitively. Entries are checked in
    /// directory listing order and the first match wins.
    pub fn find(&self, sensor_name: &str) -> Option<String> {
        if sensor_name.is_empty() {
            return None;
        }

        let entries = match fs::read_dir(&self.base_path) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Unable to read directory {:?}: {e}", self.base_path);
                return None;
            }
        };

        for entry in entries {
            let Ok(entry) = entry else {
                continue;
            };
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(true) {
                continue;
            }

            let path = entry.path();
            let name = match self.query.device_name(&path) {
                Ok(name) => name,
                Err(e) => {
                    log::trace!("Unable to query device name for {path:?}: {e}");
                    continue;
                }
            };
            if !name.eq_ignore_ascii_case(sensor_name) {
                continue;
            }

            let event_name = entry.file_name().to_string_lossy().to_string();
            log::debug!("Sensor {sensor_name} found at {path:?}");
            return Some(event_name);
        }

        None
    }

    /// Returns every (event device, driver name) pair that answers the name query
    pub fn scan(&self) -> io::Result<Vec<(String, String)>> {
        let mut devices = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let Ok(entry) = entry else {
                continue;
            };
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(true) {
                continue;
            }
            let Ok(name) = self.query.device_name(&entry.path()) else {
                continue;
            };
            devices.push((entry.file_name().to_string_lossy().to_string(), name));
        }

        Ok(devices)
    }
}

impl std::fmt::Debug for DeviceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceLocator")
            .field("base_path", &self.base_path)
            .finish()
    }
}
