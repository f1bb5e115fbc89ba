use tracing::debug;

use crate::error::PipelineError;

/// Headers that may carry the lead capture date, checked case-insensitively.
/// Header order wins when several are present, not alias order.
pub const DATE_ALIASES: &[&str] = &["date", "created_at", "lead_date"];

/// Indices of the semantic columns inside a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub email: usize,
    /// `None` when the table has no date-like column; the pipeline then
    /// treats every record's date as absent.
    pub date: Option<usize>,
}

/// Locate the email and date-like columns among `headers`.
///
/// Headers are expected pre-trimmed (see `ingest::load_leads_csv`); matching
/// is ASCII case-insensitive. A missing email column is fatal, a missing
/// date column is not.
pub fn resolve_columns(headers: &[String]) -> Result<ResolvedColumns, PipelineError> {
    let email = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("email"))
        .ok_or(PipelineError::MissingEmailColumn)?;

    let date = headers.iter().position(|h| {
        DATE_ALIASES
            .iter()
            .any(|alias| h.eq_ignore_ascii_case(alias))
    });

    debug!(email, ?date, "resolved semantic columns");
    Ok(ResolvedColumns { email, date })
}
