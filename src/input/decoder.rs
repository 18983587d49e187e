use std::mem::size_of;

use evdev::{EventType, InputEvent};
use nix::libc::input_event;

use crate::error::SensorError;

/// Size in bytes of one raw `struct input_event` record
pub const INPUT_EVENT_SIZE: usize = size_of::<input_event>();

// type, code and value trail the timestamp at the end of the record
const TYPE_OFFSET: usize = INPUT_EVENT_SIZE - 8;
const CODE_OFFSET: usize = INPUT_EVENT_SIZE - 6;
const VALUE_OFFSET: usize = INPUT_EVENT_SIZE - 4;

/// One of the three sensor axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Returns the axis for the given absolute axis event code
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            _ => None,
        }
    }
}

/// AxisData holds the most recent value reported for each axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisData {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl AxisData {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Overwrite a single axis, leaving the others untouched
    pub fn apply(&mut self, axis: Axis, value: i32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }

    pub fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// Meaning of a single raw event record for a three-axis sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedEvent {
    /// A new value for one axis
    AxisUpdate(Axis, i32),
    /// All axis fragments since the previous marker form one reading
    SyncMarker,
    /// Anything else (e.g. auxiliary channels); carries no state change
    Other,
}

impl From<InputEvent> for DecodedEvent {
    fn from(event: InputEvent) -> Self {
        if event.event_type() == EventType::SYNCHRONIZATION {
            return DecodedEvent::SyncMarker;
        }
        match Axis::from_code(event.code()) {
            Some(axis) => DecodedEvent::AxisUpdate(axis, event.value()),
            None => DecodedEvent::Other,
        }
    }
}

impl DecodedEvent {
    /// Apply the event to the given accumulator. Returns a snapshot of the
    /// accumulated axes if this event completes a reading.
    pub fn apply(self, accumulator: &mut AxisData) -> Option<AxisData> {
        match self {
            DecodedEvent::AxisUpdate(axis, value) => {
                accumulator.apply(axis, value);
                None
            }
            DecodedEvent::SyncMarker => Some(*accumulator),
            DecodedEvent::Other => None,
        }
    }
}

/// Parse a raw `struct input_event` record. The timestamp is ignored.
pub fn parse(bytes: &[u8]) -> Result<InputEvent, SensorError> {
    if bytes.len() < INPUT_EVENT_SIZE {
        return Err(SensorError::ShortRead {
            expected: INPUT_EVENT_SIZE,
            actual: bytes.len(),
        });
    }

    let type_ = u16::from_ne_bytes([bytes[TYPE_OFFSET], bytes[TYPE_OFFSET + 1]]);
    let code = u16::from_ne_bytes([bytes[CODE_OFFSET], bytes[CODE_OFFSET + 1]]);
    let value = i32::from_ne_bytes([
        bytes[VALUE_OFFSET],
        bytes[VALUE_OFFSET + 1],
        bytes[VALUE_OFFSET + 2],
        bytes[VALUE_OFFSET + 3],
    ]);

    Ok(InputEvent::new(type_, code, value))
}

/// Decode a raw event record
pub fn decode(bytes: &[u8]) -> Result<DecodedEvent, SensorError> {
    let event = parse(bytes)?;
    log::trace!("Received event: {:?}", event);
    Ok(event.into())
}
