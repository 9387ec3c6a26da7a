//! CSV-file result table.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::TableError;
use crate::models::record::ExtractionRecord;

use super::{ResultTable, Result, WriteMode};

const FILENAME_COLUMN: &str = "Filename";

/// A table stored as a CSV file with header `ID,Date,Filename,LoadedDate`.
///
/// Writes are staged in a temporary file next to the table and renamed over
/// it. Writers in one process are serialized, and `write_if_absent` checks
/// the registry under the same lock.
#[derive(Debug)]
pub struct CsvTable {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvTable {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows currently in the table. A missing file is an empty table.
    pub fn records(&self) -> Result<Vec<ExtractionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        reader
            .deserialize()
            .collect::<std::result::Result<Vec<ExtractionRecord>, _>>()
            .map_err(TableError::from)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    // Caller holds the write lock.
    fn write_locked(&self, record: &ExtractionRecord, mode: WriteMode) -> Result<()> {
        let mut rows = match mode {
            WriteMode::Truncate => Vec::new(),
            WriteMode::Append => self.records()?,
        };
        rows.push(record.clone());

        self.replace_contents(&rows)?;
        debug!(
            "Wrote {} to {} ({} rows, {})",
            record.filename,
            self.path.display(),
            rows.len(),
            mode
        );
        Ok(())
    }

    fn replace_contents(&self, rows: &[ExtractionRecord]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut staged = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut staged);
            writer.write_record(ExtractionRecord::COLUMNS)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        staged.persist(&self.path).map_err(|e| TableError::Io(e.error))?;
        Ok(())
    }
}

impl ResultTable for CsvTable {
    fn processed_filenames(&self) -> Result<HashSet<String>> {
        if !self.path.exists() {
            return Ok(HashSet::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let column = reader
            .headers()?
            .iter()
            .position(|h| h == FILENAME_COLUMN)
            .ok_or_else(|| TableError::Schema(format!("missing {} column", FILENAME_COLUMN)))?;

        let mut names = HashSet::new();
        for row in reader.records() {
            let row = row?;
            if let Some(name) = row.get(column) {
                names.insert(name.to_string());
            }
        }
        Ok(names)
    }

    fn write(&self, record: &ExtractionRecord, mode: WriteMode) -> Result<()> {
        let _guard = self.lock();
        self.write_locked(record, mode)
    }

    fn write_if_absent(&self, record: &ExtractionRecord, mode: WriteMode) -> Result<bool> {
        let _guard = self.lock();
        if self.processed_filenames()?.contains(&record.filename) {
            debug!("{} already in {}, not written", record.filename, self.path.display());
            return Ok(false);
        }
        self.write_locked(record, mode)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(id: i64, filename: &str) -> ExtractionRecord {
        ExtractionRecord {
            id,
            date: "03-14-2023".into(),
            filename: filename.into(),
            loaded_date: "01-05-2024".into(),
        }
    }

    #[test]
    fn test_missing_table_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let table = CsvTable::new(dir.path().join("results.csv"));
        assert!(table.processed_filenames().unwrap().is_empty());
        assert!(table.records().unwrap().is_empty());
    }

    #[test]
    fn test_truncate_replaces_rows() {
        let dir = tempfile::tempdir().unwrap();
        let table = CsvTable::new(dir.path().join("tables/results.csv"));

        table.write(&record(1, "a.pdf"), WriteMode::Truncate).unwrap();
        table.write(&record(2, "b.pdf"), WriteMode::Truncate).unwrap();

        assert_eq!(table.records().unwrap(), vec![record(2, "b.pdf")]);
        assert_eq!(
            table.processed_filenames().unwrap(),
            HashSet::from(["b.pdf".to_string()])
        );
    }

    #[test]
    fn test_append_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let table = CsvTable::new(dir.path().join("results.csv"));

        table.write(&record(1, "a.pdf"), WriteMode::Append).unwrap();
        table.write(&record(2, "b.pdf"), WriteMode::Append).unwrap();

        assert_eq!(table.records().unwrap(), vec![record(1, "a.pdf"), record(2, "b.pdf")]);
    }

    #[test]
    fn test_write_if_absent_skips_recorded_filename() {
        let dir = tempfile::tempdir().unwrap();
        let table = CsvTable::new(dir.path().join("results.csv"));

        assert!(table.write_if_absent(&record(1, "a.pdf"), WriteMode::Append).unwrap());
        assert!(!table.write_if_absent(&record(2, "a.pdf"), WriteMode::Append).unwrap());

        assert_eq!(table.records().unwrap(), vec![record(1, "a.pdf")]);
    }

    #[test]
    fn test_concurrent_appends_lose_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let table = CsvTable::new(dir.path().join("results.csv"));

        std::thread::scope(|s| {
            for i in 0..16 {
                let table = &table;
                s.spawn(move || {
                    table.write(&record(i, &format!("doc{}.pdf", i)), WriteMode::Append).unwrap();
                });
            }
        });

        let mut ids: Vec<i64> = table.records().unwrap().into_iter().map(|r| r.id).collect();
        ids.sort();
        assert_eq!(ids, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_concurrent_write_if_absent_writes_each_filename_once() {
        let dir = tempfile::tempdir().unwrap();
        let table = CsvTable::new(dir.path().join("results.csv"));

        let written: usize = std::thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|i| {
                    let table = &table;
                    s.spawn(move || {
                        let row = record(i, &format!("doc{}.pdf", i % 4));
                        table.write_if_absent(&row, WriteMode::Append).unwrap()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|written| *written)
                .count()
        });

        assert_eq!(written, 4);
        let rows = table.records().unwrap();
        let names: HashSet<String> = rows.iter().map(|r| r.filename.clone()).collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn test_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let table = CsvTable::new(dir.path().join("results.csv"));
        table.write(&record(4821, "inv.pdf"), WriteMode::Truncate).unwrap();

        let content = fs::read_to_string(table.path()).unwrap();
        assert_eq!(content, "ID,Date,Filename,LoadedDate\n4821,03-14-2023,inv.pdf,01-05-2024\n");
    }

    #[test]
    fn test_schema_without_filename_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        fs::write(&path, "ID,Name\n1,x\n").unwrap();

        let err = CsvTable::new(path).processed_filenames().unwrap_err();
        assert!(matches!(err, TableError::Schema(_)));
    }
}
