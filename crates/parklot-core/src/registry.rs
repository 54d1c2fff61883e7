// ABOUTME: The SlotRegistry owns the ordered slot list and every operation over it.
// ABOUTME: Lookups are linear scans; slot order is insertion order and is never re-sorted.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::command::{Command, Departure, Outcome};
use crate::fee;
use crate::model::{Slot, SlotNumber, Vehicle};

/// Number of slots synthesized when there are no saved records.
pub const DEFAULT_SLOT_COUNT: SlotNumber = 10;

/// Errors returned when a registry operation is rejected. The registry is
/// unchanged whenever one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("invalid slot number or slot is already occupied: {0}")]
    SlotUnavailable(SlotNumber),

    #[error("vehicle with license plate {0} not found")]
    VehicleNotFound(String),

    #[error("slot number {0} already exists")]
    DuplicateSlot(SlotNumber),

    #[error("slot {0} not found")]
    SlotNotFound(SlotNumber),

    #[error("cannot remove an occupied slot: {0}")]
    SlotOccupied(SlotNumber),
}

/// In-memory ordered collection of parking slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotRegistry {
    slots: Vec<Slot>,
}

impl SlotRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ten vacant slots numbered 1 through 10.
    pub fn with_default_slots() -> Self {
        Self {
            slots: (1..=DEFAULT_SLOT_COUNT).map(Slot::vacant).collect(),
        }
    }

    /// Build a registry from loaded slots, keeping their order. A slot whose
    /// number was already seen is dropped so numbers stay unique.
    pub fn from_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        let mut registry = Self::new();
        for slot in slots {
            if registry.find_by_slot_number(slot.slot_number).is_some() {
                tracing::warn!("dropping duplicate slot number {}", slot.slot_number);
                continue;
            }
            registry.slots.push(slot);
        }
        registry
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// First slot with this number, occupied or not.
    pub fn find_by_slot_number(&self, slot_number: SlotNumber) -> Option<&Slot> {
        self.slots.iter().find(|s| s.slot_number == slot_number)
    }

    /// Occupied slot holding the vehicle with exactly this plate.
    pub fn find(&self, license_plate: &str) -> Option<&Slot> {
        self.slots
            .iter()
            .find(|s| s.is_occupied && s.vehicle.license_plate == license_plate)
    }

    /// Vacant slots in registry order.
    pub fn available(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| !s.is_occupied)
    }

    /// Whether `slot_number` names an existing vacant slot.
    pub fn is_available(&self, slot_number: SlotNumber) -> bool {
        self.find_by_slot_number(slot_number)
            .is_some_and(|s| !s.is_occupied)
    }

    /// Park `vehicle` in a vacant slot, stamping the entry time with `now`.
    pub fn park(
        &mut self,
        slot_number: SlotNumber,
        vehicle: Vehicle,
        now: DateTime<Utc>,
    ) -> Result<&Slot, RegistryError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.slot_number == slot_number && !s.is_occupied)
            .ok_or(RegistryError::SlotUnavailable(slot_number))?;

        slot.occupy(vehicle, now);
        tracing::info!(
            "parked {} in slot {}",
            slot.vehicle.license_plate,
            slot.slot_number
        );
        Ok(&*slot)
    }

    /// Remove the vehicle with this plate and quote its fee as of `now`.
    pub fn unpark(
        &mut self,
        license_plate: &str,
        now: DateTime<Utc>,
    ) -> Result<Departure, RegistryError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.is_occupied && s.vehicle.license_plate == license_plate)
            .ok_or_else(|| RegistryError::VehicleNotFound(license_plate.to_string()))?;

        let quote = fee::quote(slot.vehicle.vehicle_type, slot.entry_time, now);
        let vehicle = slot.vacate();
        tracing::info!(
            "unparked {} from slot {} after {} minutes",
            vehicle.license_plate,
            slot.slot_number,
            quote.minutes
        );

        Ok(Departure {
            slot_number: slot.slot_number,
            vehicle,
            quote,
        })
    }

    /// Append a vacant slot with a number not already in use.
    pub fn add_slot(&mut self, slot_number: SlotNumber) -> Result<(), RegistryError> {
        if self.find_by_slot_number(slot_number).is_some() {
            return Err(RegistryError::DuplicateSlot(slot_number));
        }
        self.slots.push(Slot::vacant(slot_number));
        tracing::info!("added slot {}", slot_number);
        Ok(())
    }

    /// Delete a vacant slot and return it.
    pub fn remove_slot(&mut self, slot_number: SlotNumber) -> Result<Slot, RegistryError> {
        let index = self
            .slots
            .iter()
            .position(|s| s.slot_number == slot_number)
            .ok_or(RegistryError::SlotNotFound(slot_number))?;

        if self.slots[index].is_occupied {
            return Err(RegistryError::SlotOccupied(slot_number));
        }

        tracing::info!("removed slot {}", slot_number);
        Ok(self.slots.remove(index))
    }

    /// Apply a command. Callers should persist the registry after `Ok`.
    pub fn execute(&mut self, cmd: Command, now: DateTime<Utc>) -> Result<Outcome, RegistryError> {
        match cmd {
            Command::Park {
                slot_number,
                vehicle,
            } => {
                let slot = self.park(slot_number, vehicle, now)?;
                Ok(Outcome::Parked {
                    slot_number: slot.slot_number,
                    license_plate: slot.vehicle.license_plate.clone(),
                })
            }
            Command::Unpark { license_plate } => {
                self.unpark(&license_plate, now).map(Outcome::Departed)
            }
            Command::AddSlot { slot_number } => {
                self.add_slot(slot_number)?;
                Ok(Outcome::SlotAdded(slot_number))
            }
            Command::RemoveSlot { slot_number } => {
                self.remove_slot(slot_number)?;
                Ok(Outcome::SlotRemoved(slot_number))
            }
        }
    }
}
