// ABOUTME: Encodes and decodes one slot as a pipe-delimited line of the records file.
// ABOUTME: Vacant slots store placeholder text for plate and owner; decoding maps it back to "".

use parklot_core::{Slot, SlotNumber, Vehicle, VehicleType};
use thiserror::Error;

pub const FIELD_DELIMITER: char = '|';
pub const VACANT_LICENSE: &str = "N/A_LICENSE";
pub const VACANT_OWNER: &str = "N/A_OWNER";

/// Reasons a line of the records file cannot become a slot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected 6 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid occupancy flag: {0:?}")]
    InvalidOccupancy(String),

    #[error("unknown vehicle type code: {0}")]
    UnknownVehicleType(i64),

    #[error("duplicate slot number {0}")]
    DuplicateSlot(SlotNumber),
}

/// Render a slot as a single line, without the trailing newline.
pub fn encode(slot: &Slot) -> String {
    let (plate, owner) = match slot.occupant() {
        Some(v) => (v.license_plate.as_str(), v.owner_name.as_str()),
        None => (VACANT_LICENSE, VACANT_OWNER),
    };
    format!(
        "{}{d}{}{d}{}{d}{}{d}{}{d}{}",
        slot.slot_number,
        u8::from(slot.is_occupied),
        plate,
        owner,
        slot.vehicle.vehicle_type.code(),
        slot.entry_time,
        d = FIELD_DELIMITER,
    )
}

/// Parse one line back into a slot. Vacant slots come back with the empty
/// vehicle and a zero entry time whatever the line stored for them.
pub fn decode(line: &str) -> Result<Slot, RecordError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    let [number, occupied, plate, owner, type_code, entry_time] = fields[..] else {
        return Err(RecordError::FieldCount(fields.len()));
    };

    let slot_number: SlotNumber = parse_number("slot number", number)?;
    let is_occupied = match occupied.trim() {
        "1" => true,
        "0" => false,
        other => return Err(RecordError::InvalidOccupancy(other.to_string())),
    };
    if !is_occupied {
        return Ok(Slot::vacant(slot_number));
    }

    let code: i64 = parse_number("vehicle type code", type_code)?;
    let vehicle_type =
        VehicleType::from_code(code).ok_or(RecordError::UnknownVehicleType(code))?;
    let entry_time: i64 = parse_number("entry time", entry_time)?;

    Ok(Slot {
        slot_number,
        is_occupied,
        vehicle: Vehicle::new(
            placeholder_to_empty(plate, VACANT_LICENSE),
            placeholder_to_empty(owner, VACANT_OWNER),
            vehicle_type,
        ),
        entry_time,
    })
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, RecordError> {
    value
        .trim()
        .parse()
        .map_err(|_| RecordError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn placeholder_to_empty(value: &str, placeholder: &str) -> String {
    if value == placeholder {
        String::new()
    } else {
        value.to_string()
    }
}
