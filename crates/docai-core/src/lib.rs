//! Core library for document form-field extraction.
//!
//! This crate provides:
//! - The document model returned by a form-parsing provider
//! - Field ranking, keyword filtering and identifier/date classification
//! - Flexible date parsing normalized to `MM-DD-YYYY`
//! - Dedup against a result table, result recording and source archiving

pub mod error;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod storage;
pub mod table;

pub use error::{DocaiError, ExtractionError, ProviderError, Result, StorageError, TableError};
pub use extract::{extract_fields, FieldClassifier, KeywordFilter, LabeledValue};
pub use models::config::PipelineConfig;
pub use models::document::{Document, FormField, Page, TextAnchor, TextSegment};
pub use models::record::{ExtractedFields, ExtractionRecord};
pub use pipeline::{DocumentProcessor, ProcessOutcome};
pub use provider::DocumentProvider;
pub use storage::{FsObjectStore, MimeType, ObjectStore};
pub use table::{CsvTable, ResultTable, WriteMode};

#[cfg(feature = "http")]
pub use provider::HttpDocumentProvider;
