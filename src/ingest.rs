use std::path::Path;

use csv::ReaderBuilder;
use tracing::info;

use crate::error::PipelineError;

/// An in-memory leads table: trimmed column names plus every data row, in
/// file order.
#[derive(Debug)]
pub struct RawTable {
    /// Column names as the file claims them, trimmed of surrounding whitespace.
    pub headers: Vec<String>,
    /// Each data row, as a Vec of Strings (one per field). Rows may be ragged;
    /// short rows are handled per-lookup downstream, never rejected here.
    pub rows: Vec<Vec<String>>,
}

/// Read `path` fully into a `RawTable`.
///
/// Every field is kept as a string; validation happens downstream. `flexible`
/// lets ragged rows through so they get counted as invalid instead of killing
/// the whole run. Any read or parse failure is a `SourceRead` carrying the
/// csv cause.
pub fn load_leads_csv<P: AsRef<Path>>(path: P) -> Result<RawTable, PipelineError> {
    let path = path.as_ref();
    let source_err = |source| PipelineError::SourceRead {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(&source_err)?;

    let headers: Vec<String> = rdr
        .headers()
        .map_err(&source_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(&source_err)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    info!(
        path = %path.display(),
        cols = headers.len(),
        rows = rows.len(),
        "loaded leads table"
    );
    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_rows_and_trims_headers() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, " name , email ,phone")?;
        writeln!(tmp, "Ada,ada@x.com,123")?;
        writeln!(tmp, "Bob,\"bob@x.com\",456")?;
        tmp.flush()?;

        let table = load_leads_csv(tmp.path())?;
        assert_eq!(table.headers, vec!["name", "email", "phone"]);
        assert_eq!(table.rows.len(), 2);
        // quotes are consumed by the reader, values stay untrimmed
        assert_eq!(table.rows[1][1], "bob@x.com");
        Ok(())
    }

    #[test]
    fn ragged_rows_survive_loading() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "email,date")?;
        writeln!(tmp, "a@x.com")?;
        writeln!(tmp, "b@x.com,2024-01-01,extra")?;
        tmp.flush()?;

        let table = load_leads_csv(tmp.path())?;
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].len(), 1);
        assert_eq!(table.rows[1].len(), 3);
        Ok(())
    }

    #[test]
    fn missing_file_is_a_source_error() {
        let err = load_leads_csv("no/such/file.csv").unwrap_err();
        assert!(matches!(err, PipelineError::SourceRead { .. }));
    }
}
