//! Form-field extraction: rank, filter by keyword, classify.

mod classifier;
pub mod dates;
mod filter;
mod locator;
pub mod patterns;
mod ranker;

pub use classifier::{parse_identifier, FieldClassifier, DATE_MARKER, IDENTIFIER_MARKERS};
pub use filter::{FilteredFields, KeywordFilter, LabeledValue, NO_DATA_MARKER};
pub use locator::text_from_anchor;
pub use ranker::{rank_form_fields, RankedField};

use tracing::debug;

use crate::error::ExtractionError;
use crate::models::document::Document;
use crate::models::record::ExtractedFields;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Run ranking, keyword filtering and classification over `document`.
pub fn extract_fields(
    document: &Document,
    filter: &KeywordFilter,
    classifier: &FieldClassifier,
) -> Result<ExtractedFields> {
    let ranked = rank_form_fields(document);
    let pairs = filter.filter(&ranked, document).collect::<Result<Vec<_>>>()?;

    debug!(
        "{} of {} form fields matched the keyword vocabulary",
        pairs.iter().filter(|p| !p.is_no_data()).count(),
        ranked.len()
    );

    classifier.classify(pairs)
}
