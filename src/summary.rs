use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::process::CleanStats;
use crate::report::Summary;

/// Operator-facing run summary; also the `--summary-json` payload.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub input: PathBuf,
    pub clean_path: PathBuf,
    pub clean_rows: usize,
    pub invalid_emails: usize,
    pub duplicates_removed: usize,
    pub report_path: PathBuf,
    pub unique_customers: usize,
}

impl RunSummary {
    pub fn new(
        input: &Path,
        clean_path: &Path,
        report_path: &Path,
        stats: &CleanStats,
        summary: &Summary,
    ) -> Self {
        Self {
            input: input.to_path_buf(),
            clean_path: clean_path.to_path_buf(),
            clean_rows: summary.total_clean_leads,
            invalid_emails: stats.invalid_count,
            duplicates_removed: stats.removed_dups,
            report_path: report_path.to_path_buf(),
            unique_customers: summary.unique_customers,
        }
    }

    /// Completion block printed to stdout after a successful run.
    pub fn print(&self) {
        println!("=== leadscrub: completed ===");
        println!("Input file: {}", self.input.display());
        println!(
            "Clean file written: {} ({} rows)",
            self.clean_path.display(),
            self.clean_rows
        );
        println!("Invalid emails removed: {}", self.invalid_emails);
        println!("Duplicate emails removed: {}", self.duplicates_removed);
        println!("Report written: {}", self.report_path.display());
        println!("Unique customers (by email): {}", self.unique_customers);
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let mut f =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(&mut f, self).context("serializing run summary")?;
        f.write_all(b"\n")?;
        Ok(())
    }
}
