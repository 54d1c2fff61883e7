// ABOUTME: Defines the Command enum for every mutation the registry accepts, and its Outcome.
// ABOUTME: Callers persist the registry after each command that returns Ok.

use crate::fee::FeeQuote;
use crate::model::{SlotNumber, Vehicle};

/// A requested change to the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Park {
        slot_number: SlotNumber,
        vehicle: Vehicle,
    },
    Unpark {
        license_plate: String,
    },
    AddSlot {
        slot_number: SlotNumber,
    },
    RemoveSlot {
        slot_number: SlotNumber,
    },
}

/// A vehicle leaving the lot, with the fee it owes.
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    pub slot_number: SlotNumber,
    pub vehicle: Vehicle,
    pub quote: FeeQuote,
}

/// What a successful command did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Parked {
        slot_number: SlotNumber,
        license_plate: String,
    },
    Departed(Departure),
    SlotAdded(SlotNumber),
    SlotRemoved(SlotNumber),
}
