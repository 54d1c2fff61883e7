// ABOUTME: Saves and loads the whole slot list as a pipe-delimited records file.
// ABOUTME: Saves rewrite the file atomically; loads skip malformed or duplicate lines with a warning.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use parklot_core::Slot;
use thiserror::Error;

use crate::record::{self, RecordError};

/// Errors that can occur while reading or writing the records file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("records path has no file name: {0}")]
    InvalidPath(PathBuf),
}

/// A line of the records file that could not be loaded.
#[derive(Debug, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line_number: usize,
    pub error: RecordError,
}

/// Result of a successful load.
#[derive(Debug, Default)]
pub struct LoadedRecords {
    pub slots: Vec<Slot>,
    pub skipped: Vec<SkippedLine>,
}

/// The backing store for a registry: one file rewritten on every save.
#[derive(Debug, Clone)]
pub struct RecordsFile {
    path: PathBuf,
}

impl RecordsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with one line per slot, in the given order.
    /// Writes to a temp file, fsyncs, then renames over the original so a
    /// failed save leaves the previous records intact.
    pub fn save(&self, slots: &[Slot]) -> Result<(), StoreError> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StoreError::InvalidPath(self.path.clone()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        let mut file = File::create(&tmp_path)?;
        for slot in slots {
            writeln!(file, "{}", record::encode(slot))?;
        }
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &self.path)?;

        tracing::info!("saved {} slots to {}", slots.len(), self.path.display());
        Ok(())
    }

    /// Load every slot from the file. Returns None if the file does not
    /// exist. Blank lines are ignored; malformed lines and repeated slot
    /// numbers are skipped and reported in `LoadedRecords::skipped`.
    pub fn load(&self) -> Result<Option<LoadedRecords>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let reader = BufReader::new(file);
        let mut loaded = LoadedRecords::default();
        let mut seen = HashSet::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let line_number = index + 1;

            let result = record::decode(&line).and_then(|slot| {
                if seen.insert(slot.slot_number) {
                    Ok(slot)
                } else {
                    Err(RecordError::DuplicateSlot(slot.slot_number))
                }
            });

            match result {
                Ok(slot) => loaded.slots.push(slot),
                Err(error) => {
                    tracing::warn!(
                        "skipping line {} of {}: {}",
                        line_number,
                        self.path.display(),
                        error
                    );
                    loaded.skipped.push(SkippedLine { line_number, error });
                }
            }
        }

        tracing::info!(
            "loaded {} slots from {} ({} skipped)",
            loaded.slots.len(),
            self.path.display(),
            loaded.skipped.len()
        );
        Ok(Some(loaded))
    }
}
