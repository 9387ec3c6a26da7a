//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::table::WriteMode;

/// Main configuration for the docai pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Source bucket configuration.
    pub storage: StorageConfig,

    /// Document-analysis provider configuration.
    pub provider: ProviderConfig,

    /// Result table configuration.
    pub table: TableConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Object storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the buckets.
    pub root_dir: PathBuf,

    /// Bucket name.
    pub bucket: String,

    /// Folder inside the bucket holding incoming documents.
    pub prefix: String,

    /// Folder inside the bucket processed documents are moved to.
    pub archive_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("buckets"),
            bucket: "documents".to_string(),
            prefix: "test-docai".to_string(),
            archive_prefix: "test-docai-processed".to_string(),
        }
    }
}

/// Document-analysis provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the provider API.
    pub endpoint: String,

    /// Project that owns the processor.
    pub project_id: String,

    /// Processor region.
    pub location: String,

    /// Processor identifier.
    pub processor_id: String,

    /// Bearer token sent with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://us-documentai.googleapis.com".to_string(),
            project_id: String::new(),
            location: "us".to_string(),
            processor_id: String::new(),
            access_token: None,
            timeout_secs: 120,
        }
    }
}

impl ProviderConfig {
    /// Fully qualified processor resource name.
    pub fn processor_name(&self) -> String {
        format!(
            "projects/{}/locations/{}/processors/{}",
            self.project_id, self.location, self.processor_id
        )
    }
}

/// Result table configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Directory holding table files.
    pub root_dir: PathBuf,

    /// Destination table identifier.
    pub table_id: String,

    /// Whether a write replaces the table or appends to it.
    pub write_mode: WriteMode,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("tables"),
            table_id: "docai_results".to_string(),
            write_mode: WriteMode::default(),
        }
    }
}

impl TableConfig {
    /// Path of the CSV file backing the table.
    pub fn table_path(&self) -> PathBuf {
        self.root_dir.join(format!("{}.csv", self.table_id))
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Label vocabulary a form field must match to be considered.
    pub keywords: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            keywords: ["number", "id", "date", "#", "invoice"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Overlay settings from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay settings from `lookup`, which maps variable names to values.
    ///
    /// Recognized: `BUCKET_NAME`, `STORAGE_FOLDER_NAME`, `PROJECT_ID`,
    /// `PROJECT_LOCATION`, `PROCESSOR_ID`, `DOCAI_ACCESS_TOKEN`.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("BUCKET_NAME") {
            self.storage.bucket = v;
        }
        if let Some(v) = get("STORAGE_FOLDER_NAME") {
            self.storage.prefix = v;
        }
        if let Some(v) = get("PROJECT_ID") {
            self.provider.project_id = v;
        }
        if let Some(v) = get("PROJECT_LOCATION") {
            self.provider.location = v;
        }
        if let Some(v) = get("PROCESSOR_ID") {
            self.provider.processor_id = v;
        }
        if let Some(v) = get("DOCAI_ACCESS_TOKEN") {
            self.provider.access_token = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.extraction.keywords, vec!["number", "id", "date", "#", "invoice"]);
        assert_eq!(config.table.write_mode, WriteMode::Truncate);
        assert_eq!(config.storage.archive_prefix, "test-docai-processed");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"table": {"write_mode": "append"}}"#).unwrap();
        assert_eq!(config.table.write_mode, WriteMode::Append);
        assert_eq!(config.table.table_id, "docai_results");
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_apply_env_from() {
        let vars: HashMap<&str, &str> = [
            ("BUCKET_NAME", "invoices"),
            ("STORAGE_FOLDER_NAME", "incoming"),
            ("PROJECT_ID", "acme"),
            ("PROJECT_LOCATION", "eu"),
            ("PROCESSOR_ID", "abc123"),
            ("DOCAI_ACCESS_TOKEN", ""),
        ]
        .into_iter()
        .collect();

        let mut config = PipelineConfig::default();
        config.apply_env_from(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.storage.bucket, "invoices");
        assert_eq!(config.storage.prefix, "incoming");
        assert_eq!(config.provider.processor_name(), "projects/acme/locations/eu/processors/abc123");
        assert_eq!(config.provider.access_token, None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PipelineConfig::default();
        config.storage.bucket = "scans".into();
        config.save(&path).unwrap();

        let loaded = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_table_path() {
        let config = TableConfig {
            root_dir: PathBuf::from("/data"),
            table_id: "results".into(),
            write_mode: WriteMode::Append,
        };
        assert_eq!(config.table_path(), PathBuf::from("/data/results.csv"));
    }
}
