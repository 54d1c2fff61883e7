// ABOUTME: Defines the Slot, Vehicle, and VehicleType types held by the slot registry.
// ABOUTME: A slot's vehicle and entry time are only meaningful while the slot is occupied.

use chrono::{DateTime, Utc};

/// Operator-assigned slot number, unique within a registry.
pub type SlotNumber = i32;

/// The kind of vehicle parked in a slot. Determines the fee rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VehicleType {
    #[default]
    Motorcycle,
    Car,
}

impl VehicleType {
    /// Integer code used by the records file.
    pub fn code(self) -> i64 {
        match self {
            VehicleType::Motorcycle => 0,
            VehicleType::Car => 1,
        }
    }

    /// Inverse of `code()`. Returns None for unknown codes.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(VehicleType::Motorcycle),
            1 => Some(VehicleType::Car),
            _ => None,
        }
    }

    /// Parse the operator's `C`/`M` answer, case-insensitively.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'C' => Some(VehicleType::Car),
            'M' => Some(VehicleType::Motorcycle),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VehicleType::Motorcycle => "Motorcycle",
            VehicleType::Car => "Car",
        }
    }
}

/// The occupant of a slot. The default value is the empty vehicle stored in
/// vacant slots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Vehicle {
    pub license_plate: String,
    pub owner_name: String,
    pub vehicle_type: VehicleType,
}

impl Vehicle {
    pub fn new(license_plate: String, owner_name: String, vehicle_type: VehicleType) -> Self {
        Self {
            license_plate,
            owner_name,
            vehicle_type,
        }
    }
}

/// A numbered parking space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub slot_number: SlotNumber,
    pub is_occupied: bool,
    pub vehicle: Vehicle,
    /// Entry time in epoch seconds; 0 while vacant.
    pub entry_time: i64,
}

impl Slot {
    /// Create a vacant slot holding the empty vehicle.
    pub fn vacant(slot_number: SlotNumber) -> Self {
        Self {
            slot_number,
            is_occupied: false,
            vehicle: Vehicle::default(),
            entry_time: 0,
        }
    }

    /// The parked vehicle, or None when the slot is vacant. Prefer this over
    /// reading `vehicle` directly, which holds stale data on vacant slots.
    pub fn occupant(&self) -> Option<&Vehicle> {
        self.is_occupied.then_some(&self.vehicle)
    }

    pub(crate) fn occupy(&mut self, vehicle: Vehicle, now: DateTime<Utc>) {
        self.vehicle = vehicle;
        self.is_occupied = true;
        self.entry_time = now.timestamp();
    }

    /// Reset to vacant and hand back the vehicle that was parked here.
    pub(crate) fn vacate(&mut self) -> Vehicle {
        self.is_occupied = false;
        self.entry_time = 0;
        std::mem::take(&mut self.vehicle)
    }
}
