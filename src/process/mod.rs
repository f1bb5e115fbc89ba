// src/process/mod.rs
use chrono::NaiveDate;
use tracing::info;

use crate::error::PipelineError;
use crate::ingest::RawTable;
use crate::schema::{resolve_columns, ResolvedColumns};

pub mod dedup;
pub mod enrich;
pub mod validate;

/// Field at `col` for `row`, or "" when the row is shorter than the headers.
pub(crate) fn field(row: &[String], col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}

/// A validated, deduplicated, date-enriched leads table in survival order.
#[derive(Debug)]
pub struct CleanTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Index of the email column within `headers`.
    pub email_idx: usize,
    /// Parsed capture date per row, aligned with `rows`. `None` is the
    /// absent sentinel: the raw value was missing or unparsable.
    pub lead_days: Vec<Option<NaiveDate>>,
}

/// Per-run counters reported alongside the clean table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanStats {
    pub total_rows: usize,
    pub invalid_count: usize,
    pub removed_dups: usize,
}

/// Run the full cleaning sequence on a raw table: resolve the semantic
/// columns, drop rows with invalid emails, collapse duplicate emails
/// (first occurrence wins), derive the capture date per surviving row.
///
/// The only failure mode is a missing email column; per-row anomalies are
/// counted in `CleanStats` instead.
#[tracing::instrument(level = "info", skip(table), fields(rows = table.rows.len()))]
pub fn clean_leads(table: RawTable) -> Result<(CleanTable, CleanStats), PipelineError> {
    let RawTable { mut headers, rows } = table;
    let total_rows = rows.len();

    let ResolvedColumns { email, date } = resolve_columns(&headers)?;

    let validated = validate::partition_valid(rows, email);
    let invalid_count = validated.invalid_count;

    let deduped = dedup::dedup_by_email(validated.rows, email);
    let removed_dups = deduped.removed_dups;
    let mut rows = deduped.rows;

    // No date-like column: append an empty one so the clean output still
    // carries a `date` column, and downstream parsing sees only blanks.
    let date = date.unwrap_or_else(|| {
        headers.push("date".to_string());
        for row in &mut rows {
            row.push(String::new());
        }
        headers.len() - 1
    });

    let lead_days = enrich::derive_lead_days(&rows, Some(date));

    info!(
        clean = rows.len(),
        invalid = invalid_count,
        dups = removed_dups,
        "cleaned leads table"
    );

    Ok((
        CleanTable {
            headers,
            rows,
            email_idx: email,
            lead_days,
        },
        CleanStats {
            total_rows,
            invalid_count,
            removed_dups,
        },
    ))
}
