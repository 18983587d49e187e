use std::path::PathBuf;

use crate::{
    config::SensorPaths,
    constants::{
        SYSFS_POSTFIX_ENABLE, SYSFS_POSTFIX_MAX, SYSFS_POSTFIX_MIN, SYSFS_POSTFIX_POLLRATE,
        SYSFS_POSTFIX_POSITION,
    },
    sysfs::SysfsAttribute,
};

/// The event device a sensor is bound to along with its control attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceBinding {
    /// Driver name the binding was resolved from (e.g. "mag3110")
    pub sensor_name: String,
    /// Event device name (e.g. "event3")
    pub event_name: String,
    /// Raw event stream node (e.g. "/dev/input/event3")
    pub stream: PathBuf,
    pub enable: SysfsAttribute,
    pub poll_interval: SysfsAttribute,
    pub poll_min: SysfsAttribute,
    pub poll_max: SysfsAttribute,
    pub position: SysfsAttribute,
}

impl DeviceBinding {
    pub fn new(paths: &SensorPaths, sensor_name: &str, event_name: &str) -> Self {
        let sysfs = paths.sysfs_input_path.join(event_name);
        Self {
            sensor_name: sensor_name.to_string(),
            event_name: event_name.to_string(),
            stream: paths.dev_input_path.join(event_name),
            enable: SysfsAttribute::new(sysfs.join(SYSFS_POSTFIX_ENABLE)),
            poll_interval: SysfsAttribute::new(sysfs.join(SYSFS_POSTFIX_POLLRATE)),
            poll_min: SysfsAttribute::new(sysfs.join(SYSFS_POSTFIX_MIN)),
            poll_max: SysfsAttribute::new(sysfs.join(SYSFS_POSTFIX_MAX)),
            position: SysfsAttribute::new(sysfs.join(SYSFS_POSTFIX_POSITION)),
        }
    }
}
