//! Skipping documents whose filename is already in the result table.

use std::collections::HashSet;

use crate::storage::base_name;

/// True when the base name of `key` is in `registry`.
///
/// Matching is on filename only, so a renamed copy of a processed document
/// is not detected.
pub fn already_processed(key: &str, registry: &HashSet<String>) -> bool {
    registry.contains(base_name(key))
}
