use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::Path,
    thread,
    time::Duration,
};

use nix::{sys::stat::Mode, unistd::mkfifo};
use tempfile::tempdir;

use threeaxis::{
    config::SensorPaths,
    input::{
        decoder::{AxisData, INPUT_EVENT_SIZE},
        locator::{DeviceLocator, NameQuery},
    },
    sensor::{dispatcher::Dispatcher, event::SensorEvent, ThreeAxisSensor},
};

/// Every "eventN" node reports the driver name given at construction
struct FixedNameQuery(&'static str);

impl NameQuery for FixedNameQuery {
    fn device_name(&self, path: &Path) -> io::Result<String> {
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if name.starts_with("event") => Ok(self.0.to_string()),
            _ => Err(io::Error::from_raw_os_error(nix::libc::ENOTTY)),
        }
    }
}

fn record(type_: u16, code: u16, value: i32) -> Vec<u8> {
    let mut bytes = vec![0u8; INPUT_EVENT_SIZE - 8];
    bytes.extend_from_slice(&type_.to_ne_bytes());
    bytes.extend_from_slice(&code.to_ne_bytes());
    bytes.extend_from_slice(&value.to_ne_bytes());
    bytes
}

#[test]
fn test_dispatch_readings() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let paths = SensorPaths::new(dir.path().join("dev"), dir.path().join("sys"));
    fs::create_dir_all(&paths.dev_input_path)?;
    mkfifo(&paths.dev_input_path.join("event2"), Mode::S_IRWXU)?;
    let device = paths.sysfs_input_path.join("event2/device");
    fs::create_dir_all(&device)?;
    for (attr, value) in [
        ("enable", "0"),
        ("poll", "100"),
        ("min", "1"),
        ("max", "800"),
        ("position", "1"),
    ] {
        fs::write(device.join(attr), value)?;
    }

    let mut dispatcher = Dispatcher::new()?;
    let locator = DeviceLocator::with_query(paths.dev_input_path.clone(), FixedNameQuery("mma845x"));
    let watcher = dispatcher.watcher()?;
    let mut sensor = ThreeAxisSensor::with_locator(paths.clone(), locator, watcher);
    sensor.set_device("mma845x")?;
    sensor.set_poll_interval(500)?;
    sensor.set_active(true)?;
    let mut rx = sensor.subscribe();
    dispatcher.add(sensor);

    let mut writer = OpenOptions::new()
        .write(true)
        .open(paths.dev_input_path.join("event2"))?;
    let mut data = Vec::new();
    data.extend(record(3, 0, -12));
    data.extend(record(3, 1, 34));
    data.extend(record(3, 2, 1024));
    data.extend(record(0, 0, 0));
    writer.write_all(&data)?;

    assert!(dispatcher.dispatch(Some(Duration::from_secs(5)))?);
    assert_eq!(
        rx.try_recv()?,
        SensorEvent::ReadingsChanged(AxisData::new(-12, 34, 1024))
    );
    assert_eq!(dispatcher.sensors()[0].readings(), AxisData::new(-12, 34, 1024));

    // Waking the dispatcher stops the run loop
    let waker = dispatcher.waker();
    let handle = thread::spawn(move || dispatcher.run());
    waker.wake()?;
    handle.join().map_err(|_| "dispatcher thread panicked")??;

    // The sensor was disabled when the dispatcher was dropped
    assert_eq!(fs::read_to_string(device.join("enable"))?, "0");

    Ok(())
}
