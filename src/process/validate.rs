use once_cell::sync::Lazy;
use regex::Regex;

use super::field;

/// Practical email shape check matching the whole trimmed value:
/// `local@domain.tld`, embedded dots allowed after the first domain dot so
/// multi-label TLDs pass. Deliberately not RFC 5322.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.+-]+@[A-Za-z0-9-]+\.[A-Za-z0-9-.]+$").unwrap());

/// True when `raw`, after trimming, matches the email shape.
pub fn is_valid_email(raw: &str) -> bool {
    EMAIL_RE.is_match(raw.trim())
}

/// Valid rows (email cell trimmed in place) plus the count of dropped rows.
#[derive(Debug)]
pub struct Validated {
    pub rows: Vec<Vec<String>>,
    pub invalid_count: usize,
}

/// Partition `rows` on email syntax.
///
/// Invalid rows are only counted; they are not logged individually or
/// retried. A row too short to reach the email column counts as invalid.
pub fn partition_valid(rows: Vec<Vec<String>>, email: usize) -> Validated {
    let total = rows.len();
    let mut valid = Vec::with_capacity(total);

    for mut row in rows {
        let trimmed = field(&row, email).trim().to_string();
        if !EMAIL_RE.is_match(&trimmed) {
            continue;
        }
        // in bounds: a match implies the cell existed and was non-empty
        row[email] = trimmed;
        valid.push(row);
    }

    Validated {
        invalid_count: total - valid.len(),
        rows: valid,
    }
}
