//! Keeping only the form fields whose label matches the keyword vocabulary.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DocaiError, ExtractionError};
use crate::models::document::Document;

use super::locator::text_from_anchor;
use super::ranker::RankedField;

/// Marker used for both name and value of the "nothing detected" entry.
pub const NO_DATA_MARKER: &str = "-";

/// A resolved form field label and value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledValue {
    pub name: String,
    pub value: String,

    /// Offset the field was ranked by.
    pub offset: u64,
}

impl LabeledValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            offset: 0,
        }
    }

    /// Sentinel emitted when a document has no form fields at all.
    pub fn no_data() -> Self {
        Self::new(NO_DATA_MARKER, NO_DATA_MARKER)
    }

    pub fn is_no_data(&self) -> bool {
        self.name == NO_DATA_MARKER && self.value == NO_DATA_MARKER
    }
}

/// Case-insensitive whole-word matcher over a fixed keyword list.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keywords: Vec<String>,
    pattern: Option<Regex>,
}

impl KeywordFilter {
    /// Compile one alternation from `keywords`.
    ///
    /// Keyword edges made of word characters must sit on a word boundary;
    /// symbol edges such as `#` match wherever they appear.
    pub fn new<I, S>(keywords: I) -> Result<Self, DocaiError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        let pattern = if keywords.is_empty() {
            None
        } else {
            let alternation = keywords
                .iter()
                .map(|k| keyword_pattern(k))
                .collect::<Vec<_>>()
                .join("|");
            let regex = Regex::new(&format!("(?i)(?:{})", alternation))
                .map_err(|e| DocaiError::Config(format!("invalid keyword pattern: {}", e)))?;
            Some(regex)
        };

        Ok(Self { keywords, pattern })
    }

    /// Keywords this filter was built from, lower-cased.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True when `name` contains at least one keyword.
    pub fn is_match(&self, name: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|p| p.is_match(&name.to_lowercase()))
    }

    /// Keyword occurrences in `name`, left to right.
    pub fn matched_keywords(&self, name: &str) -> Vec<String> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };
        pattern
            .find_iter(&name.to_lowercase())
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Resolve each ranked field and yield those whose label matches.
    ///
    /// When `ranked` is empty, yields a single [`LabeledValue::no_data`].
    pub fn filter<'a>(&'a self, ranked: &'a [RankedField<'a>], document: &'a Document) -> FilteredFields<'a> {
        FilteredFields {
            filter: self,
            document,
            fields: ranked.iter(),
            emit_no_data: ranked.is_empty(),
        }
    }
}

fn keyword_pattern(keyword: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead = if keyword.chars().next().is_some_and(is_word) { r"\b" } else { "" };
    let trail = if keyword.chars().last().is_some_and(is_word) { r"\b" } else { "" };
    format!("{}{}{}", lead, regex::escape(keyword), trail)
}

/// Lazy iterator returned by [`KeywordFilter::filter`].
pub struct FilteredFields<'a> {
    filter: &'a KeywordFilter,
    document: &'a Document,
    fields: std::slice::Iter<'a, RankedField<'a>>,
    emit_no_data: bool,
}

impl Iterator for FilteredFields<'_> {
    type Item = Result<LabeledValue, ExtractionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.emit_no_data {
            self.emit_no_data = false;
            return Some(Ok(LabeledValue::no_data()));
        }

        for ranked in self.fields.by_ref() {
            let name = match text_from_anchor(ranked.field.name_anchor(), self.document) {
                Ok(name) => name,
                Err(e) => return Some(Err(e)),
            };
            let value = match text_from_anchor(ranked.field.value_anchor(), self.document) {
                Ok(value) => value,
                Err(e) => return Some(Err(e)),
            };

            if self.filter.is_match(&name) {
                return Some(Ok(LabeledValue {
                    name,
                    value,
                    offset: ranked.sort_key,
                }));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ranker::rank_form_fields;
    use crate::models::config::ExtractionConfig;
    use crate::models::document::{FormField, Page, TextAnchor};
    use pretty_assertions::assert_eq;

    fn default_filter() -> KeywordFilter {
        KeywordFilter::new(ExtractionConfig::default().keywords).unwrap()
    }

    /// Build a document whose text is the concatenation of `name\nvalue\n` pairs.
    fn form(pairs: &[(&str, &str)]) -> Document {
        let mut text = String::new();
        let mut fields = Vec::new();
        for (name, value) in pairs {
            let name_start = text.len() as u64;
            text.push_str(name);
            text.push('\n');
            let value_start = text.len() as u64;
            text.push_str(value);
            text.push('\n');
            fields.push(FormField::new(
                TextAnchor::span(name_start, value_start),
                TextAnchor::span(value_start, text.len() as u64),
            ));
        }
        Document {
            text,
            pages: vec![Page {
                page_number: 1,
                form_fields: fields,
            }],
        }
    }

    #[test]
    fn test_whole_word_only() {
        let filter = default_filter();
        assert!(!filter.is_match("Numbering"));
        assert!(!filter.is_match("Validity"));
        assert!(filter.is_match("Customer ID"));
        assert!(filter.is_match("DUE DATE"));
    }

    #[test]
    fn test_symbol_keyword() {
        let filter = default_filter();
        assert_eq!(filter.matched_keywords("Invoice #123"), vec!["invoice", "#"]);
        assert!(filter.is_match("PO #"));
    }

    #[test]
    fn test_filters_in_ranked_order() {
        let doc = form(&[
            ("Invoice Number", "17"),
            ("Ship To", "Warehouse 4"),
            ("Date", "03/14/2023"),
        ]);
        let ranked = rank_form_fields(&doc);
        let pairs: Vec<LabeledValue> = default_filter()
            .filter(&ranked, &doc)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            pairs.iter().map(|p| (p.name.as_str(), p.value.as_str())).collect::<Vec<_>>(),
            vec![("Invoice Number", "17"), ("Date", "03/14/2023")]
        );
        assert_eq!(pairs[1].offset, doc.text.find("Date").unwrap() as u64);
    }

    #[test]
    fn test_no_fields_yields_single_sentinel() {
        let doc = Document::default();
        let ranked = rank_form_fields(&doc);
        let pairs: Vec<_> = default_filter().filter(&ranked, &doc).collect();

        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].as_ref().unwrap().is_no_data());
    }

    #[test]
    fn test_fields_without_matches_yield_nothing() {
        let doc = form(&[("Ship To", "Warehouse 4")]);
        let ranked = rank_form_fields(&doc);
        assert_eq!(default_filter().filter(&ranked, &doc).count(), 0);
    }

    #[test]
    fn test_malformed_anchor_surfaces() {
        let mut doc = form(&[("Date", "03/14/2023")]);
        doc.pages[0].form_fields[0].field_value.text_anchor = TextAnchor::span(0, 999);
        let ranked = rank_form_fields(&doc);

        let first = default_filter().filter(&ranked, &doc).next().unwrap();
        assert!(matches!(first, Err(ExtractionError::MalformedAnchor { .. })));
    }

    #[test]
    fn test_empty_vocabulary_matches_nothing() {
        let filter = KeywordFilter::new(Vec::<String>::new()).unwrap();
        assert!(!filter.is_match("Invoice Number"));
        assert!(filter.matched_keywords("Invoice Number").is_empty());
    }
}
