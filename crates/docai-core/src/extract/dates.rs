//! Flexible date parsing for form-field values.

use chrono::NaiveDate;

use super::patterns::{
    DATE_COMPACT, DATE_DAY_FIRST, DATE_MONTH_FIRST, DATE_NUMERIC, LEADING_WEEKDAY, TRAILING_TIME,
};

/// Output format of normalized dates.
pub const DATE_FORMAT: &str = "%m-%d-%Y";

/// Format a date as `MM-DD-YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a date written in any of the common layouts found on documents.
///
/// Numeric dates are read month-first, falling back to day-first when the
/// first part cannot be a month. Returns `None` when no layout matches or the
/// date does not exist.
pub fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return None;
    }

    parse_numeric(&normalized)
        .or_else(|| parse_compact(&normalized))
        .or_else(|| parse_month_first(&normalized))
        .or_else(|| parse_day_first(&normalized))
}

fn normalize(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let without_weekday = LEADING_WEEKDAY.replace(&lowered, "");
    let without_time = TRAILING_TIME.replace(&without_weekday, "");
    without_time.trim().trim_end_matches(['.', ',']).to_string()
}

fn parse_numeric(text: &str) -> Option<NaiveDate> {
    let caps = DATE_NUMERIC.captures(text)?;
    let (first, second, third) = (&caps[1], &caps[2], &caps[3]);

    if first.len() == 4 {
        // YYYY-MM-DD
        if third.len() > 2 {
            return None;
        }
        return NaiveDate::from_ymd_opt(first.parse().ok()?, second.parse().ok()?, third.parse().ok()?);
    }

    if first.len() > 2 {
        return None;
    }
    let year = parse_year(third)?;
    let a: u32 = first.parse().ok()?;
    let b: u32 = second.parse().ok()?;

    NaiveDate::from_ymd_opt(year, a, b).or_else(|| NaiveDate::from_ymd_opt(year, b, a))
}

fn parse_compact(text: &str) -> Option<NaiveDate> {
    let caps = DATE_COMPACT.captures(text)?;
    NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
}

fn parse_month_first(text: &str) -> Option<NaiveDate> {
    let caps = DATE_MONTH_FIRST.captures(text)?;
    let month = month_to_number(&caps[1])?;
    NaiveDate::from_ymd_opt(parse_year(&caps[3])?, month, caps[2].parse().ok()?)
}

fn parse_day_first(text: &str) -> Option<NaiveDate> {
    let caps = DATE_DAY_FIRST.captures(text)?;
    let month = month_to_number(&caps[2])?;
    NaiveDate::from_ymd_opt(parse_year(&caps[3])?, month, caps[1].parse().ok()?)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    match s.len() {
        // Two-digit year: 00-50 -> 2000s, 51-99 -> 1900s
        2 if year <= 50 => Some(2000 + year),
        2 => Some(1900 + year),
        4 => Some(year),
        _ => None,
    }
}

fn month_to_number(month: &str) -> Option<u32> {
    let n = match month {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_month_first_numeric() {
        assert_eq!(parse_flexible_date("03/14/2023"), ymd(2023, 3, 14));
        assert_eq!(parse_flexible_date("3-4-2023"), ymd(2023, 3, 4));
        assert_eq!(parse_flexible_date("03.14.23"), ymd(2023, 3, 14));
    }

    #[test]
    fn test_day_first_fallback() {
        assert_eq!(parse_flexible_date("14/03/2023"), ymd(2023, 3, 14));
        assert_eq!(parse_flexible_date("31.12.1999"), ymd(1999, 12, 31));
    }

    #[test]
    fn test_year_first() {
        assert_eq!(parse_flexible_date("2023-03-14"), ymd(2023, 3, 14));
        assert_eq!(parse_flexible_date("2023/3/14"), ymd(2023, 3, 14));
        assert_eq!(parse_flexible_date("20230314"), ymd(2023, 3, 14));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(parse_flexible_date("March 14, 2023"), ymd(2023, 3, 14));
        assert_eq!(parse_flexible_date("Sept. 1st 2023"), ymd(2023, 9, 1));
        assert_eq!(parse_flexible_date("14 Mar 2023"), ymd(2023, 3, 14));
        assert_eq!(parse_flexible_date("14-Mar-23"), ymd(2023, 3, 14));
        assert_eq!(parse_flexible_date("Tuesday, 14 March 2023"), ymd(2023, 3, 14));
    }

    #[test]
    fn test_trailing_time_ignored() {
        assert_eq!(parse_flexible_date("2023-03-14T10:00:00Z"), ymd(2023, 3, 14));
        assert_eq!(parse_flexible_date("03/14/2023 10:30 PM"), ymd(2023, 3, 14));
    }

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(parse_flexible_date("01/02/50"), ymd(2050, 1, 2));
        assert_eq!(parse_flexible_date("01/02/51"), ymd(1951, 1, 2));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_flexible_date(""), None);
        assert_eq!(parse_flexible_date("-"), None);
        assert_eq!(parse_flexible_date("net 30"), None);
        assert_eq!(parse_flexible_date("02/30/2023"), None);
        assert_eq!(parse_flexible_date("13/13/2023"), None);
        assert_eq!(parse_flexible_date("Smarch 14, 2023"), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2023, 3, 4).unwrap()), "03-04-2023");
    }
}
