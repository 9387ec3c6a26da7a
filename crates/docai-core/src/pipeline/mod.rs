//! End-to-end processing of one source document.

mod dedup;
mod recorder;

pub use dedup::already_processed;
pub use recorder::ResultRecorder;

use std::time::Instant;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{DocaiError, Result};
use crate::extract::{extract_fields, FieldClassifier, KeywordFilter};
use crate::models::config::PipelineConfig;
use crate::models::record::ExtractionRecord;
use crate::provider::DocumentProvider;
use crate::storage::{base_name, MimeType, ObjectStore};
use crate::table::ResultTable;

/// Outcome of a call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessOutcome {
    /// A row was written and the source archived.
    Processed {
        record: ExtractionRecord,
        archive_key: String,
    },
    /// The filename was already in the result table; nothing was done.
    AlreadyProcessed { filename: String },
}

impl ProcessOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Processed { .. })
    }

    /// 1 for a processed document, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 1 } else { 0 }
    }
}

/// Runs dedup, analysis, extraction, recording and archiving for one key.
///
/// Each call is independent: the processed-file registry is read again and
/// nothing is cached between calls.
pub struct DocumentProcessor<P, S, T> {
    provider: P,
    store: S,
    table: T,
    filter: KeywordFilter,
    classifier: FieldClassifier,
    recorder: ResultRecorder,
    prefix: String,
}

#[cfg(feature = "http")]
impl
    DocumentProcessor<
        crate::provider::HttpDocumentProvider,
        crate::storage::FsObjectStore,
        crate::table::CsvTable,
    >
{
    /// Processor wired to the HTTP provider, filesystem bucket and CSV table.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let provider = crate::provider::HttpDocumentProvider::new(&config.provider)?;
        let store = crate::storage::FsObjectStore::new(&config.storage.root_dir, &config.storage.bucket);
        let table = crate::table::CsvTable::new(config.table.table_path());
        Self::new(config, provider, store, table)
    }
}

impl<P, S, T> DocumentProcessor<P, S, T>
where
    P: DocumentProvider,
    S: ObjectStore,
    T: ResultTable,
{
    pub fn new(config: &PipelineConfig, provider: P, store: S, table: T) -> Result<Self> {
        // Archived files must not be listed as pending again
        if is_within(&config.storage.archive_prefix, &config.storage.prefix) {
            return Err(DocaiError::Config(format!(
                "archive prefix {:?} must not be inside the source prefix {:?}",
                config.storage.archive_prefix, config.storage.prefix
            )));
        }

        Ok(Self {
            provider,
            store,
            table,
            filter: KeywordFilter::new(&config.extraction.keywords)?,
            classifier: FieldClassifier::new(),
            recorder: ResultRecorder::new(config.table.write_mode, &config.storage.archive_prefix),
            prefix: config.storage.prefix.clone(),
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    /// Keys waiting under the configured source prefix.
    pub fn pending_items(&self) -> Result<Vec<String>> {
        let prefix = format!("{}/", self.prefix.trim_end_matches('/'));
        self.store.list(&prefix).map_err(DocaiError::Fetch)
    }

    /// Process `key`, stamping the record with today's local date.
    pub fn process_item(&self, key: &str) -> Result<ProcessOutcome> {
        self.process_item_on(key, Local::now().date_naive())
    }

    /// Process `key`, stamping the record with `today`.
    pub fn process_item_on(&self, key: &str, today: NaiveDate) -> Result<ProcessOutcome> {
        let start = Instant::now();
        let filename = base_name(key).to_string();

        let registry = self
            .table
            .processed_filenames()
            .map_err(DocaiError::RegistryQuery)?;
        if already_processed(key, &registry) {
            info!("Skipping {}: already processed", filename);
            return Ok(ProcessOutcome::AlreadyProcessed { filename });
        }

        let mime = MimeType::from_path(key)?;
        let content = self.store.get(key).map_err(DocaiError::Fetch)?;
        debug!("Fetched {} ({} bytes, {})", key, content.len(), mime);

        let document = self.provider.process(&content, mime)?;
        let fields = extract_fields(&document, &self.filter, &self.classifier)?;
        let record = ExtractionRecord::new(&fields, filename, today);
        debug!("Extracted ID={} Date={:?} from {}", record.id, record.date, key);

        let Some(archive_key) = self.recorder.record(&self.table, &self.store, &record, key)? else {
            return Ok(ProcessOutcome::AlreadyProcessed { filename: record.filename });
        };

        info!(
            "Processed {} in {}ms: ID={} Date={:?}",
            key,
            start.elapsed().as_millis(),
            record.id,
            record.date
        );
        Ok(ProcessOutcome::Processed { record, archive_key })
    }

    /// Process `key`, logging any failure with its kind.
    ///
    /// Returns true only when the document was processed.
    pub fn try_process_item(&self, key: &str) -> bool {
        match self.process_item(key) {
            Ok(outcome) => outcome.is_success(),
            Err(e) => {
                warn!("Failed to process {} [{}]: {}", key, e.kind(), e);
                false
            }
        }
    }
}

/// True when `key` is `folder` or lies below it, comparing whole path components.
fn is_within(key: &str, folder: &str) -> bool {
    let key = key.trim_matches('/');
    let folder = folder.trim_matches('/');
    folder.is_empty()
        || key == folder
        || key.strip_prefix(folder).is_some_and(|rest| rest.starts_with('/'))
}
