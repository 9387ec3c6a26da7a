//! Writing the result row and archiving the source file.

use tracing::{debug, info, warn};

use crate::error::{DocaiError, Result};
use crate::models::record::ExtractionRecord;
use crate::storage::{base_name, ObjectStore};
use crate::table::{ResultTable, WriteMode};

/// Records results and moves processed sources to the archive folder.
///
/// The row write and the file move are not transactional. When the move
/// fails the row stays written and the source stays in place, so the next
/// run sees the file as already processed.
#[derive(Debug, Clone)]
pub struct ResultRecorder {
    mode: WriteMode,
    archive_prefix: String,
}

impl ResultRecorder {
    pub fn new(mode: WriteMode, archive_prefix: impl Into<String>) -> Self {
        Self {
            mode,
            archive_prefix: archive_prefix.into(),
        }
    }

    /// Archive key for `source_key`: `<archive_prefix>/<base name>`.
    pub fn archive_key(&self, source_key: &str) -> String {
        let prefix = self.archive_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            base_name(source_key).to_string()
        } else {
            format!("{}/{}", prefix, base_name(source_key))
        }
    }

    /// Write `record`, then move `source_key` to the archive.
    ///
    /// Returns the archive key, or `None` when the filename was recorded by
    /// another call since the dedup check. In that case nothing is written
    /// or moved. A source already at its archive key stays where it is.
    pub fn record<T, S>(
        &self,
        table: &T,
        store: &S,
        record: &ExtractionRecord,
        source_key: &str,
    ) -> Result<Option<String>>
    where
        T: ResultTable + ?Sized,
        S: ObjectStore + ?Sized,
    {
        let written = table
            .write_if_absent(record, self.mode)
            .map_err(DocaiError::RecordWrite)?;
        if !written {
            info!("{} was recorded concurrently, leaving {} in place", record.filename, source_key);
            return Ok(None);
        }

        let destination = self.archive_key(source_key);
        if destination == source_key.trim_start_matches('/') {
            debug!("{} is already in the archive", source_key);
            return Ok(Some(destination));
        }

        if let Err(e) = store.move_object(source_key, &destination) {
            warn!(
                "Row for {} written but {} was not archived: {}",
                record.filename, source_key, e
            );
            return Err(DocaiError::ArchiveMove(e));
        }

        info!("Moved {} to {}", source_key, destination);
        Ok(Some(destination))
    }
}
