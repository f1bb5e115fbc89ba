use std::path::PathBuf;
use thiserror::Error;

/// Structural failures that abort a run.
///
/// Per-row anomalies (invalid emails, unparsable dates) are data outcomes
/// absorbed into counters, never errors. Everything not covered here
/// propagates as an `anyhow` context chain.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read leads table {path:?}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("input has no 'email' column (matched case-insensitively against trimmed headers)")]
    MissingEmailColumn,
}
