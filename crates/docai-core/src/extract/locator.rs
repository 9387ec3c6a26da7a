//! Resolving text anchors against the document text.

use crate::error::ExtractionError;
use crate::models::document::{Document, TextAnchor, TextSegment};

/// Concatenate the text referenced by every segment of `anchor`.
///
/// A single trailing newline is removed. Segments that fall outside the
/// text, are inverted, or split a UTF-8 character are rejected.
pub fn text_from_anchor(anchor: &TextAnchor, document: &Document) -> Result<String, ExtractionError> {
    let mut text = String::new();
    for segment in &anchor.text_segments {
        text.push_str(segment_text(segment, &document.text)?);
    }

    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

fn segment_text<'a>(segment: &TextSegment, text: &'a str) -> Result<&'a str, ExtractionError> {
    let malformed = || ExtractionError::MalformedAnchor {
        start: segment.start_index,
        end: segment.end_index,
        len: text.len(),
    };

    let start = usize::try_from(segment.start_index).map_err(|_| malformed())?;
    let end = usize::try_from(segment.end_index).map_err(|_| malformed())?;
    text.get(start..end).ok_or_else(malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document {
            text: text.to_string(),
            pages: Vec::new(),
        }
    }

    #[test]
    fn test_whole_text_minus_trailing_newline() {
        let d = doc("Invoice # 4821\n");
        let anchor = TextAnchor::span(0, d.text.len() as u64);
        assert_eq!(text_from_anchor(&anchor, &d).unwrap(), "Invoice # 4821");
    }

    #[test]
    fn test_strips_only_one_newline() {
        let d = doc("Date\n\n");
        let anchor = TextAnchor::span(0, 6);
        assert_eq!(text_from_anchor(&anchor, &d).unwrap(), "Date\n");
    }

    #[test]
    fn test_concatenates_segments_in_order() {
        let d = doc("Invoice\nNumber\n");
        let anchor = TextAnchor {
            text_segments: vec![TextSegment::new(8, 15), TextSegment::new(0, 8)],
        };
        assert_eq!(text_from_anchor(&anchor, &d).unwrap(), "Number\nInvoice");
    }

    #[test]
    fn test_empty_anchor_is_empty_text() {
        let d = doc("anything");
        assert_eq!(text_from_anchor(&TextAnchor::default(), &d).unwrap(), "");
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let d = doc("short");
        let err = text_from_anchor(&TextAnchor::span(2, 50), &d).unwrap_err();
        assert_eq!(err, ExtractionError::MalformedAnchor { start: 2, end: 50, len: 5 });
    }

    #[test]
    fn test_inverted_span_rejected() {
        let d = doc("short");
        assert!(text_from_anchor(&TextAnchor::span(4, 1), &d).is_err());
    }

    #[test]
    fn test_split_character_rejected() {
        let d = doc("Nº 12");
        // "º" occupies bytes 1..3
        assert!(text_from_anchor(&TextAnchor::span(0, 2), &d).is_err());
        assert_eq!(text_from_anchor(&TextAnchor::span(0, 3), &d).unwrap(), "Nº");
    }
}
