//! Filesystem-backed object store.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::StorageError;

use super::{ObjectStore, Result};

/// A bucket stored as a directory tree under `<root>/<bucket>`.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Open the bucket `bucket` under `root_dir`.
    pub fn new(root_dir: impl AsRef<Path>, bucket: &str) -> Self {
        Self {
            root: root_dir.as_ref().join(bucket),
        }
    }

    /// Directory holding the bucket's objects.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let valid = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }

    fn io_error(key: &str, source: std::io::Error) -> StorageError {
        if source.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(key.to_string())
        } else {
            StorageError::Io {
                key: key.to_string(),
                source,
            }
        }
    }
}

impl ObjectStore for FsObjectStore {
    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let base = if prefix.trim_matches('/').is_empty() {
            self.root.clone()
        } else {
            self.object_path(prefix.trim_matches('/'))?
        };
        if !base.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&base).sort_by_file_name() {
            let entry = entry.map_err(|e| StorageError::Io {
                key: prefix.to_string(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                keys.push(key);
            }
        }

        debug!("Listed {} objects under {:?}", keys.len(), prefix);
        Ok(keys)
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(key)?;
        fs::read(&path).map_err(|e| Self::io_error(key, e))
    }

    fn copy(&self, from: &str, to: &str) -> Result<()> {
        let source = self.object_path(from)?;
        let destination = self.object_path(to)?;
        // fs::copy onto itself truncates the file
        if source == destination {
            return Err(StorageError::InvalidKey(format!("cannot copy {} onto itself", from)));
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::io_error(to, e))?;
        }
        fs::copy(&source, &destination).map_err(|e| Self::io_error(from, e))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.object_path(key)?;
        fs::remove_file(&path).map_err(|e| Self::io_error(key, e))
    }
}
