//! Field normalizers for raw export values
//!
//! Pure fail-closed conversions: missing or unparseable input yields `None`,
//! never an error. Adapters decide whether a `None` is survivable for the
//! row.

use chrono::NaiveDate;

/// Date formats seen across upstream exports, tried in order.
///
/// `%y` must come before `%Y`: chrono's `%Y` also accepts short years, so
/// "12/5/21" would otherwise parse as year 21.
const DATE_FORMATS: &[&str] = &["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d", "%m-%d-%Y"];

/// Normalize a currency-like value to a plain number.
///
/// Plain numeric text passes through unchanged; otherwise currency and
/// grouping symbols are stripped before parsing.
pub fn normalize_currency(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(value) = raw.parse::<f64>() {
        return Some(value);
    }

    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok()
}

/// Normalize loosely-formatted date text to a calendar date.
///
/// Datetime values are truncated to their date part before parsing.
pub fn normalize_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    // "2024-03-05 00:00:00" and "2024-03-05T00:00:00" both reduce to the
    // leading date token.
    let date_part = raw
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or(raw);

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

/// Normalize a numeric-or-text coordinate value.
pub fn normalize_coordinate(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok()
}
