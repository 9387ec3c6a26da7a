//! Document model returned by a form-parsing provider.
//!
//! The serde layout follows the provider's JSON: camelCase keys, 64-bit
//! indices that may be encoded as strings, and omitted defaults.

use serde::{Deserialize, Deserializer, Serialize};

/// A processed document: the full recognized text plus its pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    /// Full recognized text. Text anchors index into this string.
    pub text: String,

    /// Pages in document order.
    pub pages: Vec<Page>,
}

impl Document {
    /// Parse a document from the provider's JSON representation.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Total number of form fields across all pages.
    pub fn form_field_count(&self) -> usize {
        self.pages.iter().map(|p| p.form_fields.len()).sum()
    }

    /// All form fields in page/field encounter order.
    pub fn form_fields(&self) -> impl Iterator<Item = &FormField> {
        self.pages.iter().flat_map(|p| p.form_fields.iter())
    }
}

/// A single page of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    /// 1-based page number.
    pub page_number: u32,

    /// Key-value form fields detected on this page.
    pub form_fields: Vec<FormField>,
}

/// A detected form field: a label and its value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormField {
    /// Layout of the field label.
    pub field_name: FieldLayout,

    /// Layout of the field value.
    pub field_value: FieldLayout,
}

impl FormField {
    /// Build a field from its label and value anchors.
    pub fn new(name: TextAnchor, value: TextAnchor) -> Self {
        Self {
            field_name: FieldLayout::from(name),
            field_value: FieldLayout::from(value),
        }
    }

    /// Anchor of the field label.
    pub fn name_anchor(&self) -> &TextAnchor {
        &self.field_name.text_anchor
    }

    /// Anchor of the field value.
    pub fn value_anchor(&self) -> &TextAnchor {
        &self.field_value.text_anchor
    }
}

/// Layout information attached to a field label or value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldLayout {
    /// Where the text of this element lives in [`Document::text`].
    pub text_anchor: TextAnchor,

    /// Detection confidence, if the provider reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl From<TextAnchor> for FieldLayout {
    fn from(text_anchor: TextAnchor) -> Self {
        Self {
            text_anchor,
            confidence: None,
        }
    }
}

/// A list of byte spans into the document text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextAnchor {
    pub text_segments: Vec<TextSegment>,
}

impl TextAnchor {
    /// Anchor with a single `start..end` span.
    pub fn span(start: u64, end: u64) -> Self {
        Self {
            text_segments: vec![TextSegment::new(start, end)],
        }
    }

    /// True when the anchor has no segments.
    pub fn is_empty(&self) -> bool {
        self.text_segments.is_empty()
    }

    /// Start offset of the first segment, if any.
    pub fn first_start(&self) -> Option<u64> {
        self.text_segments.first().map(|s| s.start_index)
    }
}

/// A half-open `start_index..end_index` byte span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSegment {
    #[serde(deserialize_with = "deserialize_index")]
    pub start_index: u64,

    #[serde(deserialize_with = "deserialize_index")]
    pub end_index: u64,
}

impl TextSegment {
    pub fn new(start_index: u64, end_index: u64) -> Self {
        Self {
            start_index,
            end_index,
        }
    }
}

// int64 fields are serialized as decimal strings in the provider's JSON.
fn deserialize_index<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawIndex {
        Number(u64),
        Text(String),
    }

    match RawIndex::deserialize(deserializer)? {
        RawIndex::Number(n) => Ok(n),
        RawIndex::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
