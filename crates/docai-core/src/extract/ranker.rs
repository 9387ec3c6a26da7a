//! Ordering form fields by where their labels appear in the text.

use crate::models::document::{Document, FormField};

/// A form field with the offset it is ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedField<'a> {
    pub field: &'a FormField,

    /// Start of the label's first segment, or 0 when the label has no anchor.
    pub sort_key: u64,
}

/// Flatten all pages' form fields and sort them by label position.
///
/// The sort is stable: fields with equal keys keep page/field order.
pub fn rank_form_fields(document: &Document) -> Vec<RankedField<'_>> {
    let mut ranked: Vec<RankedField<'_>> = document
        .form_fields()
        .map(|field| RankedField {
            field,
            sort_key: sort_key(field),
        })
        .collect();

    ranked.sort_by_key(|r| r.sort_key);
    ranked
}

fn sort_key(field: &FormField) -> u64 {
    field.name_anchor().first_start().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{Page, TextAnchor};

    fn field(name_start: u64, value_start: u64) -> FormField {
        FormField::new(
            TextAnchor::span(name_start, name_start + 1),
            TextAnchor::span(value_start, value_start + 1),
        )
    }

    fn value_starts(ranked: &[RankedField<'_>]) -> Vec<u64> {
        ranked
            .iter()
            .map(|r| r.field.value_anchor().first_start().unwrap())
            .collect()
    }

    #[test]
    fn test_sorts_across_pages() {
        let doc = Document {
            text: String::new(),
            pages: vec![
                Page {
                    page_number: 1,
                    form_fields: vec![field(40, 1), field(10, 2)],
                },
                Page {
                    page_number: 2,
                    form_fields: vec![field(5, 3)],
                },
            ],
        };

        let ranked = rank_form_fields(&doc);
        assert_eq!(value_starts(&ranked), vec![3, 2, 1]);
        assert_eq!(ranked.iter().map(|r| r.sort_key).collect::<Vec<_>>(), vec![5, 10, 40]);
    }

    #[test]
    fn test_stable_for_equal_offsets() {
        let doc = Document {
            text: String::new(),
            pages: vec![Page {
                page_number: 1,
                form_fields: vec![field(7, 1), field(3, 2), field(7, 3), field(7, 4)],
            }],
        };

        assert_eq!(value_starts(&rank_form_fields(&doc)), vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_missing_label_anchor_sorts_first() {
        let unlabeled = FormField::new(TextAnchor::default(), TextAnchor::span(9, 10));
        let doc = Document {
            text: String::new(),
            pages: vec![Page {
                page_number: 1,
                form_fields: vec![field(4, 1), unlabeled],
            }],
        };

        let ranked = rank_form_fields(&doc);
        assert_eq!(ranked[0].sort_key, 0);
        assert_eq!(value_starts(&ranked), vec![9, 1]);
    }

    #[test]
    fn test_no_fields() {
        assert!(rank_form_fields(&Document::default()).is_empty());
    }
}
