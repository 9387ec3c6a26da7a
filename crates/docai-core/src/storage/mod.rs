//! Object storage holding source documents and their archive.

mod fs;

pub use fs::FsObjectStore;

use crate::error::{DocaiError, StorageError};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Content types accepted by the document-analysis provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeType {
    Pdf,
    Jpeg,
    Png,
}

impl MimeType {
    /// Detect the content type from a key's extension (case-insensitive).
    pub fn from_path(key: &str) -> std::result::Result<Self, DocaiError> {
        let name = base_name(key);
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => Err(DocaiError::UnsupportedExtension(name.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl std::fmt::Display for MimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last `/`-separated component of an object key.
pub fn base_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Trait for object storage backends.
pub trait ObjectStore {
    /// Keys under `prefix`, excluding the prefix folder itself.
    fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Read an object's bytes.
    fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Copy an object to a new key, replacing any existing object there.
    fn copy(&self, from: &str, to: &str) -> Result<()>;

    /// Delete an object.
    fn delete(&self, key: &str) -> Result<()>;

    /// Move an object by copying it and then deleting the source.
    ///
    /// Not atomic: if the delete fails the object exists under both keys.
    fn move_object(&self, from: &str, to: &str) -> Result<()> {
        self.copy(from, to)?;
        self.delete(from)
    }
}
