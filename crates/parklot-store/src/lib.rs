// ABOUTME: Persistence layer for parklot, storing the slot list in a flat text file.
// ABOUTME: Provides the per-line record codec and the atomically rewritten records file.

pub mod record;
pub mod records_file;

pub use record::RecordError;
pub use records_file::{LoadedRecords, RecordsFile, SkippedLine, StoreError};
