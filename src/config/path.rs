//! Module for searching for threeaxis config files

use std::path::PathBuf;

use crate::constants::{CONFIG_FILE_NAME, CONFIG_PREFIX};

/// Returns the system-wide config file path (e.g. "/etc/threeaxis/sensors.yaml")
pub fn get_system_config_path() -> PathBuf {
    PathBuf::from("/etc").join(CONFIG_PREFIX).join(CONFIG_FILE_NAME)
}

/// Returns the first existing config file. The system-wide file takes
/// precedence over the XDG config directories.
pub fn find_config_file() -> Option<PathBuf> {
    let system_path = get_system_config_path();
    log::trace!("Checking {system_path:?} for config");
    if system_path.is_file() {
        return Some(system_path);
    }

    let Ok(base_dirs) = xdg::BaseDirectories::with_prefix(CONFIG_PREFIX) else {
        log::warn!("Unable to determine XDG config directories.");
        return None;
    };

    base_dirs.find_config_file(CONFIG_FILE_NAME)
}
