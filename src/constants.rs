/// Directory holding one character device per kernel input event device
pub const DEV_INPUT_PATH: &str = "/dev/input";
/// Sysfs class directory for input devices
pub const SYSFS_INPUT_PATH: &str = "/sys/class/input";

// Attribute locations relative to "<SYSFS_INPUT_PATH>/<event name>"
pub const SYSFS_POSTFIX_ENABLE: &str = "device/enable";
pub const SYSFS_POSTFIX_POLLRATE: &str = "device/poll";
pub const SYSFS_POSTFIX_MIN: &str = "device/min";
pub const SYSFS_POSTFIX_MAX: &str = "device/max";
pub const SYSFS_POSTFIX_POSITION: &str = "device/position";

/// Size of the buffer handed to the EVIOCGNAME query. Longer names are truncated.
pub const DEVICE_NAME_BUFFER_LEN: usize = 64;

/// Legal mounting position codes by hardware convention
pub const POSITION_MIN: i32 = 0;
pub const POSITION_MAX: i32 = 7;

pub const ACCEL_NAME: &str = "mma845x";
pub const MAGNET_NAME: &str = "mag3110";
pub const DEFAULT_POLL_INTERVAL: i32 = 500;

/// Name of the configuration file looked up in the config directories
pub const CONFIG_FILE_NAME: &str = "sensors.yaml";
/// Prefix used for XDG and system configuration directories
pub const CONFIG_PREFIX: &str = "threeaxis";
