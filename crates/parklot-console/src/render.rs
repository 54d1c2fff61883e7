// ABOUTME: Renders menus, slot listings, fee receipts, and operator messages as text.
// ABOUTME: Pure string building so the session can be asserted against exact output.

use std::fmt::Write;

use parklot_core::{Departure, FeeQuote, Outcome, RegistryError, Slot, SlotRegistry};

pub const MAIN_MENU: &str = "\n\
======================================\n      \
PARKING LOT MANAGEMENT SYSTEM\n\
======================================\n\
1. Park Vehicle\n\
2. Unpark Vehicle\n\
3. Find Vehicle\n\
4. Display Available Slots\n\
5. Display All Slots\n\
6. Admin Panel\n\
7. Exit\n\
======================================\n";

pub const ADMIN_MENU: &str = "\n\
======================================\n           \
ADMIN PANEL\n\
======================================\n\
1. Add Parking Slot\n\
2. Remove Parking Slot\n\
3. Back to Main Menu\n\
======================================\n";

pub const SLOT_UNAVAILABLE: &str =
    "Invalid slot number or slot is already occupied. Please try again.";

const TABLE_RULE: &str =
    "----------------------------------------------------------------------";

/// Vacant slots, one per line, or a notice when the lot is full.
pub fn available_slots(registry: &SlotRegistry) -> String {
    let mut out = String::from("\n--- Available Parking Slots ---\n");
    let mut any = false;
    for slot in registry.available() {
        let _ = writeln!(out, "Slot {}", slot.slot_number);
        any = true;
    }
    if !any {
        out.push_str("Sorry, no slots are currently available.\n");
    }
    out
}

/// Fixed-width table of every slot.
pub fn all_slots(slots: &[Slot]) -> String {
    let mut out = String::from("\n--- All Parking Slots ---\n");
    let _ = writeln!(
        out,
        "{:<10}{:<15}{:<15}{:<20}{:<20}",
        "Slot No.", "Status", "Vehicle Type", "License Plate", "Owner Name"
    );
    out.push_str(TABLE_RULE);
    out.push('\n');

    for slot in slots {
        let (status, kind, plate, owner) = match slot.occupant() {
            Some(v) => (
                "Occupied",
                v.vehicle_type.label(),
                v.license_plate.as_str(),
                v.owner_name.as_str(),
            ),
            None => ("Available", "N/A", "N/A", "N/A"),
        };
        let _ = writeln!(
            out,
            "{:<10}{:<15}{:<15}{:<20}{:<20}",
            slot.slot_number, status, kind, plate, owner
        );
    }
    out
}

pub fn fee_details(quote: &FeeQuote) -> String {
    format!(
        "\n--- Parking Fee Details ---\n\
         Duration: {} minutes\n\
         Total Fee: Rs.{}\n\
         --------------------------\n",
        quote.minutes,
        quote.fee_display()
    )
}

pub fn found_vehicle(slot: &Slot) -> String {
    let mut out = String::from("\nVehicle Found!\n");
    if let Some(v) = slot.occupant() {
        let _ = writeln!(out, "License Plate: {}", v.license_plate);
        let _ = writeln!(out, "Owner Name: {}", v.owner_name);
    }
    let _ = writeln!(out, "Parked in Slot: {}", slot.slot_number);
    out
}

pub fn vehicle_not_found(license_plate: &str) -> String {
    format!("Vehicle with license plate {license_plate} not found.\n")
}

/// Confirmation shown after a command succeeds.
pub fn outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Parked {
            slot_number,
            license_plate,
        } => format!(
            "\nParking Confirmed!\nVehicle: {license_plate} parked in slot {slot_number}.\n"
        ),
        Outcome::Departed(departure) => departed(departure),
        Outcome::SlotAdded(n) => format!("Slot {n} has been added successfully.\n"),
        Outcome::SlotRemoved(n) => format!("Slot {n} has been removed.\n"),
    }
}

fn departed(departure: &Departure) -> String {
    format!(
        "\nVehicle found. Unparking...\n{}Vehicle {} has been unparked from slot {}.\n",
        fee_details(&departure.quote),
        departure.vehicle.license_plate,
        departure.slot_number
    )
}

/// Operator-facing explanation of a rejected command.
pub fn rejection(err: &RegistryError) -> String {
    match err {
        RegistryError::SlotUnavailable(_) => format!("{SLOT_UNAVAILABLE}\n"),
        RegistryError::VehicleNotFound(plate) => vehicle_not_found(plate),
        RegistryError::DuplicateSlot(n) => format!("Error: Slot number {n} already exists.\n"),
        RegistryError::SlotNotFound(n) => format!("Slot {n} not found.\n"),
        RegistryError::SlotOccupied(_) => "Error: Cannot remove an occupied slot.\n".to_string(),
    }
}
