use std::collections::HashSet;

use super::field;

/// Surviving rows in first-occurrence order plus the number discarded.
#[derive(Debug)]
pub struct Deduped {
    pub rows: Vec<Vec<String>>,
    pub removed_dups: usize,
}

/// Collapse `rows` to one per email, keeping the first occurrence with its
/// original field values. Keys compare byte-for-byte; no case folding.
pub fn dedup_by_email(rows: Vec<Vec<String>>, email: usize) -> Deduped {
    let total = rows.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(total);
    let mut kept = Vec::with_capacity(total);

    for row in rows {
        if seen.insert(field(&row, email).to_string()) {
            kept.push(row);
        }
    }

    Deduped {
        removed_dups: total - kept.len(),
        rows: kept,
    }
}
