//! Result table: registry of processed files and destination of records.

mod csv_table;

pub use csv_table::CsvTable;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::models::record::ExtractionRecord;

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;

/// How a write treats the rows already in the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Replace the whole table with the written row.
    #[default]
    Truncate,
    /// Keep existing rows and add the written row.
    Append,
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Truncate => f.write_str("truncate"),
            Self::Append => f.write_str("append"),
        }
    }
}

/// Trait for result table backends.
pub trait ResultTable {
    /// Base filenames of every recorded row. Read fresh on each call.
    fn processed_filenames(&self) -> Result<HashSet<String>>;

    /// Write one record using `mode`.
    fn write(&self, record: &ExtractionRecord, mode: WriteMode) -> Result<()>;

    /// Write `record` unless its filename is already recorded.
    ///
    /// Returns false when nothing was written. Backends shared between
    /// threads must run the check and the write under one lock.
    fn write_if_absent(&self, record: &ExtractionRecord, mode: WriteMode) -> Result<bool> {
        if self.processed_filenames()?.contains(&record.filename) {
            return Ok(false);
        }
        self.write(record, mode)?;
        Ok(true)
    }
}
