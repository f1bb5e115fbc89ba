use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;
use tracing::info;

use super::{CountRow, Summary};

/// File names of the three report tables inside the report directory.
pub const DAILY_SHEET: &str = "daily_leads.csv";
pub const WEEKLY_SHEET: &str = "weekly_leads.csv";
pub const SUMMARY_SHEET: &str = "summary.csv";

fn write_counts(path: &Path, key_header: &str, rows: &[CountRow]) -> Result<()> {
    let mut wtr =
        Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record([key_header, "count"])?;
    for row in rows {
        wtr.write_record([row.bucket.label(), row.count.to_string()])?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))
}

/// Write the "Daily Leads", "Weekly Leads" and "Summary" tables into `dir`,
/// creating the directory if needed. Sinks are flushed before returning;
/// on error paths the writers close on drop.
pub fn write_report(
    dir: &Path,
    daily: &[CountRow],
    weekly: &[CountRow],
    summary: &Summary,
) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating report directory {}", dir.display()))?;

    write_counts(&dir.join(DAILY_SHEET), "lead_day", daily)?;
    write_counts(&dir.join(WEEKLY_SHEET), "lead_week", weekly)?;

    let path = dir.join(SUMMARY_SHEET);
    let mut wtr =
        Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(["Metric", "Value"])?;
    let total = summary.total_clean_leads.to_string();
    wtr.write_record(["Total Clean Leads", total.as_str()])?;
    let unique = summary.unique_customers.to_string();
    wtr.write_record(["Unique Customers (by email)", unique.as_str()])?;
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;

    info!(dir = %dir.display(), "wrote report tables");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::DateBucket;
    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
        let mut rdr = csv::Reader::from_path(path)?;
        let mut rows = vec![rdr.headers()?.iter().map(str::to_string).collect()];
        for record in rdr.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }

    #[test]
    fn writes_all_three_sheets() -> Result<()> {
        let dir = tempdir()?;
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let daily = vec![
            CountRow {
                bucket: DateBucket::Day(d),
                count: 2,
            },
            CountRow {
                bucket: DateBucket::Undated,
                count: 1,
            },
        ];
        let weekly = vec![CountRow {
            bucket: DateBucket::Day(d),
            count: 3,
        }];
        let summary = Summary {
            total_clean_leads: 3,
            unique_customers: 3,
        };

        write_report(dir.path(), &daily, &weekly, &summary)?;

        let daily_rows = read_rows(&dir.path().join(DAILY_SHEET))?;
        assert_eq!(daily_rows[0], vec!["lead_day", "count"]);
        assert_eq!(daily_rows[1], vec!["2024-01-01", "2"]);
        assert_eq!(daily_rows[2], vec!["unknown", "1"]);

        let weekly_rows = read_rows(&dir.path().join(WEEKLY_SHEET))?;
        assert_eq!(weekly_rows[0], vec!["lead_week", "count"]);
        assert_eq!(weekly_rows.len(), 2);

        let summary_rows = read_rows(&dir.path().join(SUMMARY_SHEET))?;
        assert_eq!(summary_rows[0], vec!["Metric", "Value"]);
        assert_eq!(summary_rows[1], vec!["Total Clean Leads", "3"]);
        assert_eq!(
            summary_rows[2],
            vec!["Unique Customers (by email)", "3"]
        );
        Ok(())
    }
}
