use crate::input::decoder::AxisData;

/// Events that can be emitted by a [ThreeAxisSensor](super::ThreeAxisSensor)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorEvent {
    /// Discovery found (true) or lost (false) the sensor's event device
    AvailabilityChanged(bool),
    /// The event stream was opened (true) or closed (false)
    ActiveChanged(bool),
    /// New poll interval in milliseconds
    PollIntervalChanged(i32),
    /// New mounting position code
    PositionChanged(i32),
    /// A complete (x, y, z) reading
    ReadingsChanged(AxisData),
}
