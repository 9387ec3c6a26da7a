//! Error types for the docai-core library.

use thiserror::Error;

/// Main error type for the docai library.
///
/// Each variant that can end processing of a document maps to one entry of
/// the failure taxonomy reported by [`DocaiError::kind`].
#[derive(Error, Debug)]
pub enum DocaiError {
    /// The source file extension is not one of pdf, jpg, jpeg, png.
    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),

    /// Field extraction error (anchors, identifier, date).
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// The document-analysis provider failed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Reading the registry of processed filenames failed.
    #[error("failed to query processed files: {0}")]
    RegistryQuery(#[source] TableError),

    /// Downloading the source file failed.
    #[error("failed to fetch source file: {0}")]
    Fetch(#[source] StorageError),

    /// Writing the result row failed.
    #[error("failed to write result record: {0}")]
    RecordWrite(#[source] TableError),

    /// Moving the source file to the archive failed after the row was written.
    #[error("failed to archive source file: {0}")]
    ArchiveMove(#[source] StorageError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocaiError {
    /// Stable short name of the failure kind, for logs and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedExtension(_) => "UnsupportedExtension",
            Self::Extraction(ExtractionError::MalformedAnchor { .. }) => "MalformedAnchor",
            Self::Extraction(ExtractionError::InvalidIdentifier { .. }) => "InvalidIdentifier",
            Self::Extraction(ExtractionError::InvalidDate { .. }) => "InvalidDate",
            Self::Provider(_) => "ProviderError",
            Self::RegistryQuery(_) => "RegistryQueryError",
            Self::Fetch(_) => "FetchError",
            Self::RecordWrite(_) => "RecordWriteError",
            Self::ArchiveMove(_) => "ArchiveMoveError",
            Self::Config(_) => "ConfigError",
            Self::Io(_) => "IoError",
        }
    }
}

/// Errors related to form-field extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// A text segment points outside the document text.
    #[error("text segment {start}..{end} is invalid for text of {len} bytes")]
    MalformedAnchor { start: u64, end: u64, len: usize },

    /// The value under an identifier label is not an integer.
    #[error("value {value:?} under {label:?} is not an integer")]
    InvalidIdentifier { label: String, value: String },

    /// The value under a date label is not a recognizable date.
    #[error("value {value:?} under {label:?} is not a date")]
    InvalidDate { label: String, value: String },
}

/// Errors returned by a document-analysis provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded into a document.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Errors related to object storage.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The requested object does not exist.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The key is empty or escapes the bucket.
    #[error("invalid object key: {0}")]
    InvalidKey(String),

    /// I/O error from the backing store.
    #[error("I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to the result table.
#[derive(Error, Debug)]
pub enum TableError {
    /// The table file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A row could not be encoded or decoded.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The table file has an unexpected layout.
    #[error("unexpected table schema: {0}")]
    Schema(String),
}

/// Result type for the docai library.
pub type Result<T> = std::result::Result<T, DocaiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_taxonomy() {
        let err = DocaiError::from(ExtractionError::InvalidIdentifier {
            label: "Invoice #".into(),
            value: "A12".into(),
        });
        assert_eq!(err.kind(), "InvalidIdentifier");

        let err = DocaiError::UnsupportedExtension("gif".into());
        assert_eq!(err.kind(), "UnsupportedExtension");

        let err = DocaiError::ArchiveMove(StorageError::NotFound("a/b.pdf".into()));
        assert_eq!(err.kind(), "ArchiveMoveError");
    }

    #[test]
    fn test_malformed_anchor_message() {
        let err = ExtractionError::MalformedAnchor { start: 5, end: 50, len: 10 };
        assert_eq!(err.to_string(), "text segment 5..50 is invalid for text of 10 bytes");
    }
}
