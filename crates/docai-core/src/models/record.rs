//! Extraction results and the row written to the result table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::extract::dates::format_date;

/// Identifier and date recovered from a document's form fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Value of the last identifier-labeled field, if any.
    pub identifier: Option<i64>,

    /// Value of the last date-labeled field, if any.
    pub date: Option<NaiveDate>,
}

impl ExtractedFields {
    /// Identifier, or 0 when no identifier field was classified.
    pub fn identifier_or_default(&self) -> i64 {
        self.identifier.unwrap_or(0)
    }

    /// Date as `MM-DD-YYYY`, or an empty string when unresolved.
    pub fn date_string(&self) -> String {
        self.date.map(format_date).unwrap_or_default()
    }
}

/// One row of the result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    #[serde(rename = "ID")]
    pub id: i64,

    /// `MM-DD-YYYY`, or empty.
    #[serde(rename = "Date")]
    pub date: String,

    /// Base name of the source file.
    #[serde(rename = "Filename")]
    pub filename: String,

    /// Processing day as `MM-DD-YYYY`.
    #[serde(rename = "LoadedDate")]
    pub loaded_date: String,
}

impl ExtractionRecord {
    /// Column names in table order.
    pub const COLUMNS: [&'static str; 4] = ["ID", "Date", "Filename", "LoadedDate"];

    pub fn new(fields: &ExtractedFields, filename: impl Into<String>, loaded_on: NaiveDate) -> Self {
        Self {
            id: fields.identifier_or_default(),
            date: fields.date_string(),
            filename: filename.into(),
            loaded_date: format_date(loaded_on),
        }
    }
}
