use std::error::Error;

use crate::{
    error::SensorError,
    input::decoder::{decode, parse, Axis, AxisData, DecodedEvent, INPUT_EVENT_SIZE},
};

pub const EV_SYN: u16 = 0;
pub const EV_ABS: u16 = 3;

/// Build a raw `struct input_event` record with a zeroed timestamp
pub fn record(type_: u16, code: u16, value: i32) -> Vec<u8> {
    let mut bytes = vec![0u8; INPUT_EVENT_SIZE - 8];
    bytes.extend_from_slice(&type_.to_ne_bytes());
    bytes.extend_from_slice(&code.to_ne_bytes());
    bytes.extend_from_slice(&value.to_ne_bytes());
    bytes
}

#[test]
fn test_parse_record() -> Result<(), Box<dyn Error>> {
    let event = parse(&record(EV_ABS, 2, -981))?;
    assert_eq!(event.event_type().0, EV_ABS);
    assert_eq!(event.code(), 2);
    assert_eq!(event.value(), -981);

    Ok(())
}

#[test]
fn test_decode_axes() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        decode(&record(EV_ABS, 0, 10))?,
        DecodedEvent::AxisUpdate(Axis::X, 10)
    );
    assert_eq!(
        decode(&record(EV_ABS, 1, 20))?,
        DecodedEvent::AxisUpdate(Axis::Y, 20)
    );
    assert_eq!(
        decode(&record(EV_ABS, 2, -30))?,
        DecodedEvent::AxisUpdate(Axis::Z, -30)
    );

    // Unknown codes are auxiliary channels and get dropped
    assert_eq!(decode(&record(EV_ABS, 0x28, 7))?, DecodedEvent::Other);

    Ok(())
}

#[test]
fn test_sync_ignores_code_and_value() -> Result<(), Box<dyn Error>> {
    assert_eq!(decode(&record(EV_SYN, 0, 0))?, DecodedEvent::SyncMarker);
    assert_eq!(decode(&record(EV_SYN, 1, 55))?, DecodedEvent::SyncMarker);

    Ok(())
}

#[test]
fn test_short_record() {
    let bytes = record(EV_ABS, 0, 1);
    let result = decode(&bytes[..INPUT_EVENT_SIZE - 1]);
    assert!(matches!(
        result,
        Err(SensorError::ShortRead { expected, actual })
            if expected == INPUT_EVENT_SIZE && actual == INPUT_EVENT_SIZE - 1
    ));
    assert!(decode(&[]).is_err());
}

#[test]
fn test_sparse_updates_carry_forward() -> Result<(), Box<dyn Error>> {
    let mut accumulator = AxisData::new(1, 2, 3);
    let sequence = [record(EV_ABS, 0, 10), record(EV_ABS, 1, 20), record(EV_SYN, 0, 0)];

    let readings: Vec<AxisData> = sequence
        .iter()
        .map(|bytes| decode(bytes))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter_map(|event| event.apply(&mut accumulator))
        .collect();

    assert_eq!(readings, vec![AxisData::new(10, 20, 3)]);

    // A second sync emits the same snapshot again
    assert_eq!(
        DecodedEvent::SyncMarker.apply(&mut accumulator),
        Some(AxisData::new(10, 20, 3))
    );
    assert_eq!(accumulator.get(Axis::Z), 3);

    Ok(())
}
