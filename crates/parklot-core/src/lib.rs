// ABOUTME: Core library for parklot, containing the slot model, fee calculator, and registry.
// ABOUTME: Everything here is free of console and file I/O so it can be tested headlessly.

pub mod command;
pub mod fee;
pub mod model;
pub mod registry;

pub use command::{Command, Departure, Outcome};
pub use fee::FeeQuote;
pub use model::{Slot, SlotNumber, Vehicle, VehicleType};
pub use registry::{RegistryError, SlotRegistry};
