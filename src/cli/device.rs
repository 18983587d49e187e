use std::error::Error;

use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use threeaxis::{config::SensorPaths, input::locator::DeviceLocator};

#[derive(Tabled)]
struct EventDeviceRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Driver Name")]
    name: String,
}

/// Print every event device that answers the driver name query
pub fn handle_list(paths: &SensorPaths) -> Result<(), Box<dyn Error + Send + Sync>> {
    let locator = DeviceLocator::new(paths.dev_input_path.clone());
    let mut devices: Vec<EventDeviceRow> = locator
        .scan()?
        .into_iter()
        .map(|(event_name, name)| EventDeviceRow {
            device: paths.dev_input_path.join(event_name).display().to_string(),
            name,
        })
        .collect();
    devices.sort_by(|a, b| a.device.cmp(&b.device));
    let count = devices.len();

    let mut table = Table::new(devices);
    table
        .with(Style::modern_rounded())
        .with(Panel::header("Input Event Devices"));
    println!("{table}");
    println!("Found {count} event device(s)");

    Ok(())
}
