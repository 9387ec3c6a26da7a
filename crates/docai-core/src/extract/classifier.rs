//! Assigning filtered fields to the identifier and date slots.

use tracing::debug;

use crate::error::ExtractionError;
use crate::models::record::ExtractedFields;

use super::dates::parse_flexible_date;
use super::filter::LabeledValue;
use super::patterns::INTEGER_VALUE;

/// Label substrings that mark an identifier field.
pub const IDENTIFIER_MARKERS: [&str; 3] = ["number", "#", "no"];

/// Label substring that marks a date field.
pub const DATE_MARKER: &str = "date";

/// Rule-based classifier for labeled values.
///
/// Fields are visited in ranked order and a later match overwrites an
/// earlier one, so each slot holds the last matching field.
#[derive(Debug, Clone, Default)]
pub struct FieldClassifier;

impl FieldClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify `pairs` into identifier and date.
    ///
    /// A label can fill both slots. Unparseable values under a matching
    /// label are errors, not skipped.
    pub fn classify<I>(&self, pairs: I) -> Result<ExtractedFields, ExtractionError>
    where
        I: IntoIterator<Item = LabeledValue>,
    {
        let mut fields = ExtractedFields::default();

        for pair in pairs {
            let label = pair.name.to_lowercase();

            if is_identifier_label(&label) {
                let identifier = parse_identifier(&pair.value).ok_or_else(|| {
                    ExtractionError::InvalidIdentifier {
                        label: pair.name.clone(),
                        value: pair.value.clone(),
                    }
                })?;
                if let Some(previous) = fields.identifier {
                    debug!("Identifier {} replaced by {} from {:?}", previous, identifier, pair.name);
                }
                fields.identifier = Some(identifier);
            }

            if is_date_label(&label) {
                let date = parse_flexible_date(&pair.value).ok_or_else(|| {
                    ExtractionError::InvalidDate {
                        label: pair.name.clone(),
                        value: pair.value.clone(),
                    }
                })?;
                fields.date = Some(date);
            }
        }

        Ok(fields)
    }
}

fn is_identifier_label(label: &str) -> bool {
    IDENTIFIER_MARKERS.iter().any(|m| label.contains(m))
}

fn is_date_label(label: &str) -> bool {
    label.contains(DATE_MARKER)
}

/// Parse an integer literal, ignoring surrounding whitespace.
pub fn parse_identifier(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if !INTEGER_VALUE.is_match(trimmed) {
        return None;
    }
    trimmed.replace('_', "").parse().ok()
}
