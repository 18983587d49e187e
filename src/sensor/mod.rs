//! Front-end for Linux input-subsystem three-axis sensor drivers (e.g.
//! accelerometers like the mma845x and magnetometers like the mag3110).
//!
//! A [ThreeAxisSensor] is bound to a driver name, looks up the matching event
//! device node, and controls the driver through its sysfs attributes. Once
//! active, the event stream is watched by a [dispatcher::Dispatcher] which calls
//! [ThreeAxisSensor::on_readable] whenever new events are available.


pub mod binding;
pub mod dispatcher;
pub mod event;

use std::{
    fs::{File, OpenOptions},
    io::{self, Read},
    os::{fd::AsRawFd, unix::fs::OpenOptionsExt},
};

use mio::Token;
use nix::fcntl::OFlag;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    config::SensorPaths,
    constants::{POSITION_MAX, POSITION_MIN},
    error::SensorError,
    input::{
        decoder::{self, AxisData, DecodedEvent, INPUT_EVENT_SIZE},
        locator::DeviceLocator,
    },
    watcher::Watcher,
};

use self::{binding::DeviceBinding, event::SensorEvent};

/// State machine for a single three-axis sensor
#[derive(Debug)]
pub struct ThreeAxisSensor {
    paths: SensorPaths,
    locator: DeviceLocator,
    watcher: Watcher,
    binding: Option<DeviceBinding>,
    stream: Option<File>,
    is_available: bool,
    poll_interval: i32,
    poll_min: i32,
    poll_max: i32,
    position: i32,
    readings: AxisData,
    subscribers: Vec<UnboundedSender<SensorEvent>>,
}

impl ThreeAxisSensor {
    /// Create a new unbound sensor
    pub fn new(paths: SensorPaths, watcher: Watcher) -> Self {
        let locator = DeviceLocator::new(paths.dev_input_path.clone());
        Self::with_locator(paths, locator, watcher)
    }

    /// Create a new unbound sensor using the given device locator
    pub fn with_locator(paths: SensorPaths, locator: DeviceLocator, watcher: Watcher) -> Self {
        Self {
            paths,
            locator,
            watcher,
            binding: None,
            stream: None,
            is_available: false,
            poll_interval: 0,
            poll_min: 0,
            poll_max: 0,
            position: 0,
            readings: AxisData::default(),
            subscribers: Vec::new(),
        }
    }

    /// Create a new sensor and bind it to the given driver name (e.g. "mag3110").
    /// Check [ThreeAxisSensor::is_available] to see if binding succeeded.
    pub fn with_device(sensor_name: &str, paths: SensorPaths, watcher: Watcher) -> Self {
        let mut sensor = Self::new(paths, watcher);
        let _ = sensor.set_device(sensor_name);
        sensor
    }

    /// Returns a channel that receives every event emitted by this sensor
    pub fn subscribe(&mut self) -> UnboundedReceiver<SensorEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: SensorEvent) {
        log::trace!("Emitting event: {event:?}");
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    pub fn x(&self) -> i32 {
        self.readings.x
    }

    pub fn y(&self) -> i32 {
        self.readings.y
    }

    pub fn z(&self) -> i32 {
        self.readings.z
    }

    pub fn readings(&self) -> AxisData {
        self.readings
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    pub fn is_available(&self) -> bool {
        self.is_available
    }

    pub fn poll_interval(&self) -> i32 {
        self.poll_interval
    }

    pub fn poll_min(&self) -> i32 {
        self.poll_min
    }

    pub fn poll_max(&self) -> i32 {
        self.poll_max
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    /// Driver name of the bound sensor
    pub fn sensor_name(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.sensor_name.as_str())
    }

    /// Name of the bound event device (e.g. "event3")
    pub fn event_name(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.event_name.as_str())
    }

    pub fn binding(&self) -> Option<&DeviceBinding> {
        self.binding.as_ref()
    }

    /// Token used by the dispatcher to route readiness events to this sensor
    pub fn token(&self) -> Token {
        self.watcher.token()
    }

    /// Bind the sensor to the event device of the given driver. An active sensor
    /// is stopped while rebinding and started again afterwards.
    pub fn set_device(&mut self, sensor_name: &str) -> Result<(), SensorError> {
        let Some(event_name) = self.locator.find(sensor_name) else {
            log::warn!("Failed to find sensor {sensor_name}");
            if self.is_active() {
                self.release();
            }
            self.binding = None;
            if self.is_available {
                self.is_available = false;
                self.emit(SensorEvent::AvailabilityChanged(false));
            }
            return Err(SensorError::DeviceNotFound(sensor_name.to_string()));
        };
        log::info!("Binding sensor {sensor_name} to {event_name}");

        let was_active = self.is_active();
        if was_active {
            self.set_active(false)?;
        }

        // Get default poll parameters and position from the sensor driver
        let binding = DeviceBinding::new(&self.paths, sensor_name, &event_name);
        self.poll_interval = binding.poll_interval.read_or_default();
        self.poll_min = binding.poll_min.read_or_default();
        self.poll_max = binding.poll_max.read_or_default();
        self.position = binding.position.read_or_default();
        self.binding = Some(binding);
        log::debug!(
            "Sensor {sensor_name}: poll interval {} [{}, {}], position {}",
            self.poll_interval,
            self.poll_min,
            self.poll_max,
            self.position
        );

        // Start again if it was started before
        if was_active {
            if let Err(e) = self.set_active(true) {
                log::warn!("Unable to restart sensor {sensor_name}: {e}");
            }
        }

        if !self.is_available {
            self.is_available = true;
            self.emit(SensorEvent::AvailabilityChanged(true));
        }

        Ok(())
    }

    /// Enable or disable the sensor. Enabling opens the event stream and
    /// starts watching it for readings.
    pub fn set_active(&mut self, active: bool) -> Result<(), SensorError> {
        if active == self.is_active() {
            return Ok(());
        }

        let Some(binding) = self.binding.as_ref() else {
            log::warn!("setActive failed! Device is not set!");
            return Err(SensorError::PreconditionViolation(
                "device is not set".to_string(),
            ));
        };

        if let Err(e) = binding.enable.write_bool(active) {
            log::warn!("{e}");
            return Err(e);
        }

        if active {
            self.open_stream()?;
        } else {
            self.close_stream();
        }

        log::info!(
            "Sensor {} is now {}",
            self.sensor_name().unwrap_or_default(),
            if active { "active" } else { "inactive" }
        );
        self.emit(SensorEvent::ActiveChanged(active));

        Ok(())
    }

    /// Set the driver poll interval in milliseconds. The value must lie within
    /// the bounds reported by the driver.
    pub fn set_poll_interval(&mut self, interval: i32) -> Result<(), SensorError> {
        if interval == self.poll_interval {
            return Ok(());
        }

        let Some(binding) = self.binding.as_ref() else {
            log::warn!("setPollInterval failed! Device is not set!");
            return Err(SensorError::PreconditionViolation(
                "device is not set".to_string(),
            ));
        };

        if interval < self.poll_min || interval > self.poll_max {
            log::warn!("Poll interval {interval} is out of range");
            return Err(SensorError::OutOfRange {
                value: interval,
                min: self.poll_min,
                max: self.poll_max,
            });
        }

        if let Err(e) = binding.poll_interval.write(interval) {
            log::warn!("{e}");
            return Err(e);
        }

        self.poll_interval = interval;
        self.emit(SensorEvent::PollIntervalChanged(interval));

        Ok(())
    }

    /// Set the mounting position code. See the sensor's application note for
    /// the meaning of each code.
    pub fn set_position(&mut self, position: i32) -> Result<(), SensorError> {
        if position == self.position {
            return Ok(());
        }

        let Some(binding) = self.binding.as_ref() else {
            log::warn!("setPosition failed! Device is not set!");
            return Err(SensorError::PreconditionViolation(
                "device is not set".to_string(),
            ));
        };

        // Range checking is left to the driver
        if !(POSITION_MIN..=POSITION_MAX).contains(&position) {
            log::debug!("Position {position} is outside the conventional range");
        }

        if let Err(e) = binding.position.write(position) {
            log::warn!("{e}");
            return Err(e);
        }

        self.position = position;
        self.emit(SensorEvent::PositionChanged(position));

        Ok(())
    }

    /// Read all available events from the event stream, emitting a reading for
    /// every sync marker. Called by the dispatcher when the stream is readable.
    pub fn on_readable(&mut self) {
        loop {
            match self.read_event() {
                Ok(Some(_)) => continue,
                Ok(None) => break,
                Err(e) => {
                    let path = self.binding.as_ref().map(|b| b.stream.clone());
                    log::warn!("Failed to read data from {path:?}: {e}");
                    break;
                }
            }
        }
    }

    /// Read and process exactly one event record. Returns `None` if no data is
    /// available.
    pub fn read_event(&mut self) -> Result<Option<DecodedEvent>, SensorError> {
        let Some(stream) = self.stream.as_mut() else {
            return Ok(None);
        };

        let mut buffer = [0u8; INPUT_EVENT_SIZE];
        let count = loop {
            match stream.read(&mut buffer) {
                Ok(count) => break count,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(None),
                Err(e) => return Err(SensorError::StreamReadFailed(e)),
            }
        };

        let event = decoder::decode(&buffer[..count])?;
        if let Some(reading) = event.apply(&mut self.readings) {
            self.emit(SensorEvent::ReadingsChanged(reading));
        }

        Ok(Some(event))
    }

    fn open_stream(&mut self) -> Result<(), SensorError> {
        let Some(binding) = self.binding.as_ref() else {
            return Err(SensorError::PreconditionViolation(
                "device is not set".to_string(),
            ));
        };
        let path = binding.stream.clone();

        log::debug!("Opening event stream at: {path:?}");
        let file = match OpenOptions::new()
            .read(true)
            .custom_flags(OFlag::O_NONBLOCK.bits())
            .open(&path)
        {
            Ok(file) => file,
            Err(source) => {
                log::warn!("Failed to open file {path:?}: {source}");
                return Err(SensorError::StreamOpenFailed { path, source });
            }
        };

        if let Err(e) = self.watcher.watch(file.as_raw_fd()) {
            log::warn!("Unable to watch {path:?}: {e}");
            return Err(SensorError::Watch(e));
        }
        self.stream = Some(file);

        Ok(())
    }

    fn close_stream(&mut self) {
        let Some(file) = self.stream.take() else {
            return;
        };
        if let Err(e) = self.watcher.unwatch(file.as_raw_fd()) {
            log::debug!("Unable to unwatch event stream: {e}");
        }
    }

    /// Stop the sensor, closing the event stream even if the driver could not
    /// be disabled.
    fn release(&mut self) {
        if self.set_active(false).is_ok() {
            return;
        }
        self.close_stream();
        self.emit(SensorEvent::ActiveChanged(false));
    }
}

impl Drop for ThreeAxisSensor {
    fn drop(&mut self) {
        if self.is_active() {
            self.release();
        }
    }
}
