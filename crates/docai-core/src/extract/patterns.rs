//! Common regex patterns for field value normalization.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Integer literal: optional sign, digits with optional `_` separators
    pub static ref INTEGER_VALUE: Regex = Regex::new(
        r"^[+-]?\d+(?:_\d+)*$"
    ).unwrap();

    // Numeric dates: 03/14/2023, 14.03.2023, 2023-03-14, 3 14 23
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"^(\d{1,4})[./\-\s]+(\d{1,2})[./\-\s]+(\d{1,4})$"
    ).unwrap();

    // Compact ISO date: 20230314
    pub static ref DATE_COMPACT: Regex = Regex::new(
        r"^(\d{4})(\d{2})(\d{2})$"
    ).unwrap();

    // Month name first: "march 14, 2023", "mar-14-23", "sept. 1st 2023"
    pub static ref DATE_MONTH_FIRST: Regex = Regex::new(
        r"^([a-z]+)\.?[\s\-/]*(\d{1,2})(?:st|nd|rd|th)?,?[\s\-/,]+(\d{2}|\d{4})$"
    ).unwrap();

    // Day first: "14 march 2023", "14-mar-23", "1st sep, 2023"
    pub static ref DATE_DAY_FIRST: Regex = Regex::new(
        r"^(\d{1,2})(?:st|nd|rd|th)?[\s\-/.]*([a-z]+)\.?,?[\s\-/.,]+(\d{2}|\d{4})$"
    ).unwrap();

    // Leading weekday: "tue, ", "tuesday "
    pub static ref LEADING_WEEKDAY: Regex = Regex::new(
        r"^(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+"
    ).unwrap();

    // Trailing time of day: " 10:30", " 10:30:15 pm", "t10:30:00z", "t10:30:00+02:00"
    pub static ref TRAILING_TIME: Regex = Regex::new(
        r"(?:\s+|t)\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?\s*(?:am|pm|z|[+-]\d{2}:?\d{2})?$"
    ).unwrap();
}
