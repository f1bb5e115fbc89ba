use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

use super::field;

/// Datetime formats tried before the date-only ones; time-of-day is parsed
/// and then discarded.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// Date-only formats. Ambiguous `xx/yy/ZZZZ` resolves month-first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y"];

/// Leniently parse a raw cell into a calendar date.
///
/// Blank or unrecognized values yield `None`; an unparsable date is a data
/// outcome, not an error. No timezone conversion: an RFC 3339 value
/// contributes its local date portion as written.
pub fn parse_lead_date(raw: &str) -> Option<NaiveDate> {
    let v = raw.trim();
    if v.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(v, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(v, fmt) {
            return Some(d);
        }
    }
    None
}

/// Monday that begins the ISO week containing `day`. Arithmetic on
/// `num_days_from_monday`, so locale can never shift the week start.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

/// Parse the date cell of every row. `date` is the resolved column index,
/// or `None` when the table has no date-like column (every record absent).
pub fn derive_lead_days(rows: &[Vec<String>], date: Option<usize>) -> Vec<Option<NaiveDate>> {
    match date {
        Some(idx) => rows
            .iter()
            .map(|row| parse_lead_date(field(row, idx)))
            .collect(),
        None => vec![None; rows.len()],
    }
}
