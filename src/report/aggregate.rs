use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::process::enrich::week_start;
use crate::process::{field, CleanTable};

/// Group key for the count tables.
///
/// The derived `Ord` sorts every real day ascending and `Undated` after all
/// of them, which fixes the report row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateBucket {
    Day(NaiveDate),
    /// Absent sentinel: the record had no parsable capture date.
    Undated,
}

impl DateBucket {
    pub fn from_day(day: Option<NaiveDate>) -> Self {
        match day {
            Some(d) => DateBucket::Day(d),
            None => DateBucket::Undated,
        }
    }

    /// Key-cell rendering used by the report sheets.
    pub fn label(&self) -> String {
        match self {
            DateBucket::Day(d) => d.format("%Y-%m-%d").to_string(),
            DateBucket::Undated => "unknown".to_string(),
        }
    }
}

/// One row of a count table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRow {
    pub bucket: DateBucket,
    pub count: u64,
}

fn count_buckets<I>(buckets: I) -> Vec<CountRow>
where
    I: IntoIterator<Item = DateBucket>,
{
    let mut counts: BTreeMap<DateBucket, u64> = BTreeMap::new();
    for bucket in buckets {
        *counts.entry(bucket).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(bucket, count)| CountRow { bucket, count })
        .collect()
}

/// Clean-record count per `lead_day`, ascending, undated bucket last.
/// Undated records stay in as their own bucket so totals reconcile.
pub fn count_by_day(table: &CleanTable) -> Vec<CountRow> {
    count_buckets(table.lead_days.iter().map(|d| DateBucket::from_day(*d)))
}

/// Clean-record count per `lead_week` (the Monday of the ISO week), same
/// ordering policy as the daily table.
pub fn count_by_week(table: &CleanTable) -> Vec<CountRow> {
    count_buckets(
        table
            .lead_days
            .iter()
            .map(|d| DateBucket::from_day(d.map(week_start))),
    )
}

/// Scalar totals for the Summary sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total_clean_leads: usize,
    pub unique_customers: usize,
}

/// Totals over the clean set. Deduplication already guarantees email
/// uniqueness, so the two figures must agree; both are still reported.
pub fn summarize(table: &CleanTable) -> Summary {
    let unique: HashSet<&str> = table
        .rows
        .iter()
        .map(|row| field(row, table.email_idx))
        .collect();
    debug_assert_eq!(unique.len(), table.rows.len());

    Summary {
        total_clean_leads: table.rows.len(),
        unique_customers: unique.len(),
    }
}
