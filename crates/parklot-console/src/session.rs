// ABOUTME: The interactive menu session: reads operator input, dispatches to the registry, prints results.
// ABOUTME: Generic over any BufRead/Write pair so whole sessions can be scripted in tests.

use std::io::{self, BufRead, Write};

use chrono::{DateTime, Utc};
use parklot_core::{Command, RegistryError, SlotNumber, SlotRegistry, Vehicle, VehicleType};
use parklot_store::record::FIELD_DELIMITER;
use parklot_store::{RecordsFile, StoreError};
use thiserror::Error;

use crate::render;

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("console io error: {0}")]
    Io(#[from] io::Error),

    #[error("could not load records: {0}")]
    Store(#[from] StoreError),
}

/// Whether the menu loop should keep going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    /// Input ended mid-action.
    Quit,
}

/// Load the registry from the records file, seeding the default slots when
/// there is nothing to load. Prints the same startup notices as the menu.
pub fn load_registry(store: &RecordsFile, out: &mut impl Write) -> Result<SlotRegistry, SessionError> {
    let registry = match store.load()? {
        None => {
            writeln!(out, "No previous records found. Starting with an empty lot.")?;
            SlotRegistry::new()
        }
        Some(loaded) => {
            if !loaded.skipped.is_empty() {
                writeln!(
                    out,
                    "Warning: skipped {} unreadable record(s) in {}.",
                    loaded.skipped.len(),
                    store.path().display()
                )?;
            }
            writeln!(out, "Parking records loaded successfully.")?;
            SlotRegistry::from_slots(loaded.slots)
        }
    };

    if registry.is_empty() {
        tracing::info!("no slots on record, creating the default lot");
        return Ok(SlotRegistry::with_default_slots());
    }
    Ok(registry)
}

/// One operator session over a registry and its backing file.
pub struct Session<R, W> {
    input: R,
    output: W,
    registry: SlotRegistry,
    store: RecordsFile,
    admin_secret: String,
    clock: fn() -> DateTime<Utc>,
    /// Where save failures are reported, in addition to the operator's output.
    errors: Box<dyn Write>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        registry: SlotRegistry,
        store: RecordsFile,
        admin_secret: String,
        input: R,
        output: W,
    ) -> Self {
        Self {
            input,
            output,
            registry,
            store,
            admin_secret,
            clock: Utc::now,
            errors: Box::new(io::stderr()),
        }
    }

    /// Replace the wall clock used to stamp entry times and quote fees.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the error channel, which defaults to stderr.
    pub fn with_errors(mut self, errors: impl Write + 'static) -> Self {
        self.errors = Box::new(errors);
        self
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    /// Run the main menu until the operator exits or input ends. The
    /// registry is saved on the way out either way.
    pub fn run(&mut self) -> Result<(), SessionError> {
        loop {
            self.output.write_all(render::MAIN_MENU.as_bytes())?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return self.exit();
            };

            let flow = match choice.trim().parse::<u32>() {
                Ok(1) => self.park()?,
                Ok(2) => self.unpark()?,
                Ok(3) => self.find()?,
                Ok(4) => {
                    let text = render::available_slots(&self.registry);
                    self.output.write_all(text.as_bytes())?;
                    Flow::Continue
                }
                Ok(5) => {
                    let text = render::all_slots(self.registry.slots());
                    self.output.write_all(text.as_bytes())?;
                    Flow::Continue
                }
                Ok(6) => self.admin()?,
                Ok(7) => return self.exit(),
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Quit {
                return self.exit();
            }
        }
    }

    fn exit(&mut self) -> Result<(), SessionError> {
        writeln!(self.output, "Saving records and exiting. Goodbye!")?;
        self.persist()?;
        self.output.flush()?;
        Ok(())
    }

    fn park(&mut self) -> Result<Flow, SessionError> {
        let text = render::available_slots(&self.registry);
        self.output.write_all(text.as_bytes())?;

        let Some(answer) = self.prompt("\nEnter the slot number to park in: ")? else {
            return Ok(Flow::Quit);
        };
        let slot_number = match parse_slot_number(&answer) {
            Some(n) if self.registry.is_available(n) => n,
            _ => {
                writeln!(self.output, "{}", render::SLOT_UNAVAILABLE)?;
                return Ok(Flow::Continue);
            }
        };

        let Some(answer) = self.prompt("Is this a car or a motorcycle? (C/M): ")? else {
            return Ok(Flow::Quit);
        };
        let Some(vehicle_type) = answer.trim().chars().next().and_then(VehicleType::from_letter)
        else {
            writeln!(self.output, "Invalid vehicle type. Parking failed.")?;
            return Ok(Flow::Continue);
        };

        let Some(license_plate) = self.prompt("Enter vehicle license plate: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(owner_name) = self.prompt("Enter owner's name: ")? else {
            return Ok(Flow::Quit);
        };
        if license_plate.contains(FIELD_DELIMITER) || owner_name.contains(FIELD_DELIMITER) {
            writeln!(
                self.output,
                "License plate and owner name cannot contain '{FIELD_DELIMITER}'. Parking failed."
            )?;
            return Ok(Flow::Continue);
        }

        self.apply(Command::Park {
            slot_number,
            vehicle: Vehicle::new(license_plate, owner_name, vehicle_type),
        })?;
        Ok(Flow::Continue)
    }

    fn unpark(&mut self) -> Result<Flow, SessionError> {
        let Some(license_plate) =
            self.prompt("\nEnter the license plate of the vehicle to unpark: ")?
        else {
            return Ok(Flow::Quit);
        };
        self.apply(Command::Unpark { license_plate })?;
        Ok(Flow::Continue)
    }

    fn find(&mut self) -> Result<Flow, SessionError> {
        let Some(license_plate) = self.prompt("\nEnter the license plate to search for: ")? else {
            return Ok(Flow::Quit);
        };
        let text = match self.registry.find(&license_plate) {
            Some(slot) => render::found_vehicle(slot),
            None => render::vehicle_not_found(&license_plate),
        };
        self.output.write_all(text.as_bytes())?;
        Ok(Flow::Continue)
    }

    fn admin(&mut self) -> Result<Flow, SessionError> {
        let Some(password) = self.prompt("\nEnter admin password: ")? else {
            return Ok(Flow::Quit);
        };
        if password != self.admin_secret {
            tracing::warn!("admin panel access denied");
            writeln!(self.output, "Incorrect password. Access denied.")?;
            return Ok(Flow::Continue);
        }

        tracing::info!("admin panel opened");
        loop {
            self.output.write_all(render::ADMIN_MENU.as_bytes())?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(Flow::Quit);
            };
            match choice.trim().parse::<u32>() {
                Ok(1) => {
                    let Some(n) = self.prompt_slot_number("Enter the number for the new slot: ")?
                    else {
                        return Ok(Flow::Quit);
                    };
                    if let Some(slot_number) = n {
                        self.apply(Command::AddSlot { slot_number })?;
                    }
                }
                Ok(2) => {
                    let Some(n) = self.prompt_slot_number("Enter the slot number to remove: ")?
                    else {
                        return Ok(Flow::Quit);
                    };
                    if let Some(slot_number) = n {
                        self.apply(Command::RemoveSlot { slot_number })?;
                    }
                }
                Ok(3) => {
                    writeln!(self.output, "Returning to main menu.")?;
                    return Ok(Flow::Continue);
                }
                _ => writeln!(self.output, "Invalid choice. Please try again.")?,
            }
        }
    }

    /// Execute a mutation, print its result, and persist on success.
    fn apply(&mut self, cmd: Command) -> Result<(), SessionError> {
        let now = (self.clock)();
        match self.registry.execute(cmd, now) {
            Ok(outcome) => {
                self.output.write_all(render::outcome(&outcome).as_bytes())?;
                self.persist()
            }
            Err(e) => self.reject(&e),
        }
    }

    fn reject(&mut self, err: &RegistryError) -> Result<(), SessionError> {
        tracing::debug!("command rejected: {}", err);
        self.output.write_all(render::rejection(err).as_bytes())?;
        Ok(())
    }

    /// Save the registry. A failed save is reported and the session carries
    /// on with the changes held in memory only.
    fn persist(&mut self) -> Result<(), SessionError> {
        if let Err(e) = self.store.save(self.registry.slots()) {
            tracing::error!(
                "failed to save records to {}: {}",
                self.store.path().display(),
                e
            );
            let notice =
                format!("Error: Could not open file for writing ({e}). Changes are kept in memory only.");
            writeln!(self.output, "{notice}")?;
            writeln!(self.errors, "{notice}")?;
            self.errors.flush()?;
        }
        Ok(())
    }

    /// Print `text` and read one line. Returns None when input has ended.
    fn prompt(&mut self, text: &str) -> Result<Option<String>, SessionError> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Prompt for a slot number. The inner None means the answer was not a
    /// number, which has already been reported to the operator.
    fn prompt_slot_number(&mut self, text: &str) -> Result<Option<Option<SlotNumber>>, SessionError> {
        let Some(answer) = self.prompt(text)? else {
            return Ok(None);
        };
        let parsed = parse_slot_number(&answer);
        if parsed.is_none() {
            writeln!(self.output, "Invalid slot number: {:?}.", answer.trim())?;
        }
        Ok(Some(parsed))
    }
}

fn parse_slot_number(answer: &str) -> Option<SlotNumber> {
    answer.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Error channel whose contents stay readable after the session drops it.
    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    const SECRET: &str = "letmein";

    fn fixed_clock() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default()
    }

    /// Run a scripted session against a fresh default lot and return the
    /// final registry and everything printed.
    fn run_script(store: &RecordsFile, registry: SlotRegistry, script: &str) -> (SlotRegistry, String) {
        let mut out = Vec::new();
        let registry = {
            let mut session = Session::new(
                registry,
                store.clone(),
                SECRET.to_string(),
                script.as_bytes(),
                &mut out,
            )
            .with_clock(fixed_clock)
            .with_errors(io::sink());
            session.run().unwrap();
            session.registry().clone()
        };
        (registry, String::from_utf8(out).unwrap())
    }

    fn temp_store(dir: &TempDir) -> RecordsFile {
        RecordsFile::new(dir.path().join("parking_records.txt"))
    }

    #[test]
    fn load_registry_seeds_ten_slots_when_file_missing() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();

        let registry = load_registry(&temp_store(&dir), &mut out).unwrap();

        let numbers: Vec<_> = registry.slots().iter().map(|s| s.slot_number).collect();
        assert_eq!(numbers, (1..=10).collect::<Vec<_>>());
        assert!(registry.slots().iter().all(|s| !s.is_occupied));
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("No previous records found. Starting with an empty lot."));
    }

    #[test]
    fn load_registry_reads_existing_file_in_order() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);
        fs::write(
            store.path(),
            "7|0|N/A_LICENSE|N/A_OWNER|0|0\n2|1|KL07|Joy|1|1699990000\nbad line\n",
        )
        .unwrap();
        let mut out = Vec::new();

        let registry = load_registry(&store, &mut out).unwrap();

        let numbers: Vec<_> = registry.slots().iter().map(|s| s.slot_number).collect();
        assert_eq!(numbers, vec![7, 2]);
        assert_eq!(registry.find("KL07").unwrap().slot_number, 2);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("skipped 1 unreadable record(s)"));
        assert!(out.contains("Parking records loaded successfully."));
    }

    #[test]
    fn exit_saves_and_says_goodbye() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);

        let (_, out) = run_script(&store, SlotRegistry::with_default_slots(), "7\n");

        assert!(out.contains("PARKING LOT MANAGEMENT SYSTEM"));
        assert!(out.contains("Saving records and exiting. Goodbye!"));
        let saved = fs::read_to_string(store.path()).unwrap();
        assert_eq!(saved.lines().count(), 10);
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);

        let (_, out) = run_script(&store, SlotRegistry::with_default_slots(), "");

        assert!(out.contains("Goodbye!"));
        assert!(store.path().exists());
    }

    #[test]
    fn invalid_menu_choice_keeps_looping() {
        let dir = TempDir::new().unwrap();
        let (_, out) = run_script(&temp_store(&dir), SlotRegistry::with_default_slots(), "9\nabc\n7\n");
        assert_eq!(out.matches("Invalid choice. Please try again.").count(), 2);
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn park_persists_immediately() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);

        // Input ends right after parking; the file must already hold the car.
        let (registry, out) = run_script(
            &store,
            SlotRegistry::with_default_slots(),
            "1\n3\nc\nABC123\nRavi Kumar\n",
        );

        assert!(out.contains("Parking Confirmed!"));
        assert!(out.contains("Vehicle: ABC123 parked in slot 3."));
        let slot = registry.find("ABC123").unwrap();
        assert_eq!(slot.slot_number, 3);
        assert_eq!(slot.vehicle.vehicle_type, VehicleType::Car);
        assert_eq!(slot.entry_time, 1_700_000_000);

        let saved = fs::read_to_string(store.path()).unwrap();
        assert!(saved.contains("3|1|ABC123|Ravi Kumar|1|1700000000"));
    }

    #[test]
    fn park_rejects_occupied_slot_before_asking_details() {
        let dir = TempDir::new().unwrap();
        let mut registry = SlotRegistry::with_default_slots();
        registry
            .park(
                3,
                Vehicle::new("FIRST".into(), "A".into(), VehicleType::Car),
                fixed_clock(),
            )
            .unwrap();

        let (after, out) = run_script(&temp_store(&dir), registry.clone(), "1\n3\n7\n");

        assert!(out.contains("Invalid slot number or slot is already occupied. Please try again."));
        assert!(!out.contains("Is this a car or a motorcycle?"));
        assert_eq!(after, registry);
    }

    #[test]
    fn park_rejects_unknown_vehicle_type() {
        let dir = TempDir::new().unwrap();
        let (registry, out) = run_script(
            &temp_store(&dir),
            SlotRegistry::with_default_slots(),
            "1\n4\ntruck\n7\n",
        );

        assert!(out.contains("Invalid vehicle type. Parking failed."));
        assert!(registry.is_available(4));
    }

    #[test]
    fn unpark_prints_fee_and_frees_slot() {
        let dir = TempDir::new().unwrap();
        let (registry, out) = run_script(
            &temp_store(&dir),
            SlotRegistry::with_default_slots(),
            "1\n3\nC\nABC123\nRavi\n2\nABC123\n3\nABC123\n7\n",
        );

        assert!(out.contains("Vehicle found. Unparking..."));
        assert!(out.contains("Duration: 0 minutes"));
        assert!(out.contains("Total Fee: Rs.0.00"));
        assert!(out.contains("Vehicle ABC123 has been unparked from slot 3."));
        assert!(out.contains("Vehicle with license plate ABC123 not found."));
        assert!(registry.is_available(3));
        assert_eq!(
            *registry.find_by_slot_number(3).unwrap(),
            parklot_core::Slot::vacant(3)
        );
    }

    #[test]
    fn find_reports_owner_and_slot() {
        let dir = TempDir::new().unwrap();
        let (_, out) = run_script(
            &temp_store(&dir),
            SlotRegistry::with_default_slots(),
            "1\n5\nm\nMH12\nSara\n3\nMH12\n7\n",
        );

        assert!(out.contains("Vehicle Found!"));
        assert!(out.contains("Owner Name: Sara"));
        assert!(out.contains("Parked in Slot: 5"));
    }

    #[test]
    fn listings_show_available_and_all_slots() {
        let dir = TempDir::new().unwrap();
        let (_, out) = run_script(
            &temp_store(&dir),
            SlotRegistry::with_default_slots(),
            "4\n5\n7\n",
        );

        assert!(out.contains("--- Available Parking Slots ---\nSlot 1\n"));
        assert!(out.contains("Slot 10\n"));
        assert!(out.contains("--- All Parking Slots ---"));
        assert!(out.contains("Available"));
    }

    #[test]
    fn admin_adds_and_removes_slots() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);
        let before = SlotRegistry::with_default_slots();

        let script = format!("6\n{SECRET}\n1\n11\n1\n11\n2\n11\n2\n11\n3\n7\n");
        let (registry, out) = run_script(&store, before.clone(), &script);

        assert!(out.contains("Slot 11 has been added successfully."));
        assert!(out.contains("Error: Slot number 11 already exists."));
        assert!(out.contains("Slot 11 has been removed."));
        assert!(out.contains("Slot 11 not found."));
        assert!(out.contains("Returning to main menu."));
        assert_eq!(registry, before);
    }

    #[test]
    fn admin_cannot_remove_occupied_slot() {
        let dir = TempDir::new().unwrap();
        let script = format!("1\n2\nc\nCAR1\nO\n6\n{SECRET}\n2\n2\n3\n7\n");
        let (registry, out) = run_script(&temp_store(&dir), SlotRegistry::with_default_slots(), &script);

        assert!(out.contains("Error: Cannot remove an occupied slot."));
        assert_eq!(registry.len(), 10);
        assert!(registry.find("CAR1").is_some());
    }

    #[test]
    fn admin_rejects_non_numeric_slot() {
        let dir = TempDir::new().unwrap();
        let script = format!("6\n{SECRET}\n1\neleven\n3\n7\n");
        let (registry, out) = run_script(&temp_store(&dir), SlotRegistry::with_default_slots(), &script);

        assert!(out.contains("Invalid slot number: \"eleven\"."));
        assert_eq!(registry.len(), 10);
    }

    #[test]
    fn wrong_password_never_reaches_admin_menu() {
        let dir = TempDir::new().unwrap();
        let before = SlotRegistry::with_default_slots();

        // After the denial, "1" and "11" are read by the main menu, not the admin menu.
        let (registry, out) = run_script(&temp_store(&dir), before.clone(), "6\nadmin123\n1\n11\n7\n");

        assert!(out.contains("Incorrect password. Access denied."));
        assert!(!out.contains("ADMIN PANEL"));
        assert!(!out.contains("has been added"));
        assert_eq!(registry, before);
    }

    #[test]
    fn park_rejects_delimiter_in_plate_or_owner() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);

        let (registry, out) = run_script(
            &store,
            SlotRegistry::with_default_slots(),
            "1\n3\nc\nAB|12\nRavi\n1\n4\nm\nOK1\nAnu|Das\n7\n",
        );

        assert_eq!(
            out.matches("License plate and owner name cannot contain '|'. Parking failed.").count(),
            2
        );
        assert!(registry.is_available(3));
        assert!(registry.is_available(4));

        // Every slot survives a reload.
        let mut notices = Vec::new();
        let reloaded = load_registry(&store, &mut notices).unwrap();
        assert_eq!(reloaded.len(), 10);
        assert!(!String::from_utf8(notices).unwrap().contains("skipped"));
    }

    #[test]
    fn unpark_survives_out_of_range_entry_time() {
        let dir = TempDir::new().unwrap();
        let store = temp_store(&dir);
        fs::write(store.path(), "1|1|X|O|1|-9223372036854775808\n").unwrap();
        let registry = load_registry(&store, &mut Vec::<u8>::new()).unwrap();

        let (registry, out) = run_script(&store, registry, "2\nX\n7\n");

        assert!(out.contains("Duration: 0 minutes"));
        assert!(out.contains("Vehicle X has been unparked from slot 1."));
        assert!(out.contains("Goodbye!"));
        assert!(registry.is_available(1));
    }

    #[test]
    fn failed_save_is_reported_on_error_channel() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let store = RecordsFile::new(blocker.join("records.txt"));
        let errors = SharedBuf::default();

        let mut out = Vec::new();
        Session::new(
            SlotRegistry::with_default_slots(),
            store,
            SECRET.to_string(),
            "7\n".as_bytes(),
            &mut out,
        )
        .with_errors(errors.clone())
        .run()
        .unwrap();

        assert!(errors.contents().contains("Error: Could not open file for writing"));
        assert!(String::from_utf8(out).unwrap().contains("Goodbye!"));
    }

    #[test]
    fn failed_save_is_reported_and_session_continues() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let store = RecordsFile::new(blocker.join("records.txt"));

        let (registry, out) = run_script(
            &store,
            SlotRegistry::with_default_slots(),
            "1\n1\nm\nBIKE\nNo Save\n3\nBIKE\n7\n",
        );

        assert!(out.contains("Error: Could not open file for writing"));
        assert!(out.contains("Parked in Slot: 1"), "state survives in memory");
        assert!(out.contains("Goodbye!"));
        assert!(registry.find("BIKE").is_some());
    }
}
