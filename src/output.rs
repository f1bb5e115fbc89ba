use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Builder, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use csv::Writer;
use parquet::arrow::ArrowWriter;
use parquet::basic::{BrotliLevel, Compression};
use parquet::file::properties::WriterProperties;
use tracing::info;

use crate::process::enrich::week_start;
use crate::process::CleanTable;

/// Column layout of the clean sink. The derived `lead_day`/`lead_week`
/// columns overwrite same-named columns when re-cleaning an earlier clean
/// output; otherwise they are appended at the end.
fn derived_layout(headers: &[String]) -> (Vec<String>, usize, usize) {
    let mut out = headers.to_vec();
    let day = match out.iter().position(|h| h == "lead_day") {
        Some(i) => i,
        None => {
            out.push("lead_day".to_string());
            out.len() - 1
        }
    };
    let week = match out.iter().position(|h| h == "lead_week") {
        Some(i) => i,
        None => {
            out.push("lead_week".to_string());
            out.len() - 1
        }
    };
    (out, day, week)
}

fn fmt_day(day: Option<NaiveDate>) -> String {
    day.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Materialize the output cells: every original column padded to the header
/// width, plus the two derived date columns.
fn output_rows(table: &CleanTable) -> (Vec<String>, Vec<Vec<String>>, usize, usize) {
    let (headers, day_idx, week_idx) = derived_layout(&table.headers);
    let width = headers.len();

    let rows = table
        .rows
        .iter()
        .zip(&table.lead_days)
        .map(|(row, day)| {
            let mut out = row.clone();
            out.resize(width, String::new());
            out[day_idx] = fmt_day(*day);
            out[week_idx] = fmt_day(day.map(week_start));
            out
        })
        .collect();

    (headers, rows, day_idx, week_idx)
}

/// Write the clean table as CSV: survival order, no index column, derived
/// date cells formatted `%Y-%m-%d` and empty when absent.
pub fn write_clean_csv(path: &Path, table: &CleanTable) -> Result<()> {
    let (headers, rows, _, _) = output_rows(table);

    let mut wtr =
        Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(&headers)?;
    for row in &rows {
        wtr.write_record(row)?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;

    info!(path = %path.display(), rows = rows.len(), "wrote clean CSV");
    Ok(())
}

fn date32(d: NaiveDate) -> i32 {
    (d - NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()).num_days() as i32
}

/// Write the clean table as Parquet: original columns as Utf8, derived
/// `lead_day`/`lead_week` as Date32, Brotli-compressed.
pub fn write_clean_parquet(path: &Path, table: &CleanTable) -> Result<()> {
    let (headers, rows, day_idx, week_idx) = output_rows(table);

    let fields: Vec<Field> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let ty = if i == day_idx || i == week_idx {
                DataType::Date32
            } else {
                DataType::Utf8
            };
            Field::new(name, ty, true)
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let mut cols: Vec<ArrayRef> = Vec::with_capacity(headers.len());
    for i in 0..headers.len() {
        if i == day_idx || i == week_idx {
            let mut b = Date32Builder::new();
            for day in &table.lead_days {
                let d = if i == day_idx {
                    *day
                } else {
                    day.map(week_start)
                };
                b.append_option(d.map(date32));
            }
            cols.push(Arc::new(b.finish()) as ArrayRef);
        } else {
            let col: StringArray = rows.iter().map(|r| Some(r[i].as_str())).collect();
            cols.push(Arc::new(col) as ArrayRef);
        }
    }

    let batch =
        RecordBatch::try_new(schema.clone(), cols).context("building clean record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::BROTLI(BrotliLevel::try_new(5)?))
        .build();
    let mut writer =
        ArrowWriter::try_new(file, schema, Some(props)).context("creating parquet writer")?;
    writer.write(&batch).context("writing clean batch")?;
    writer.close().context("closing parquet writer")?;

    info!(path = %path.display(), rows = rows.len(), "wrote clean parquet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::load_leads_csv;
    use crate::process::clean_leads;
    use anyhow::Result;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn sample_csv() -> Result<NamedTempFile> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "name,email,date")?;
        writeln!(tmp, "Ada,ada@x.com,2024-01-01")?;
        writeln!(tmp, "Dup,ada@x.com,2024-01-08")?;
        writeln!(tmp, "Bad,not-an-email,2024-01-02")?;
        writeln!(tmp, "Cal,cal@x.com,")?;
        tmp.flush()?;
        Ok(tmp)
    }

    #[test]
    fn clean_csv_round_trips_with_derived_columns() -> Result<()> {
        let input = sample_csv()?;
        let (clean, _) = clean_leads(load_leads_csv(input.path())?)?;

        let dir = tempdir()?;
        let out = dir.path().join("clean_customers.csv");
        write_clean_csv(&out, &clean)?;

        let table = load_leads_csv(&out)?;
        assert_eq!(
            table.headers,
            vec!["name", "email", "date", "lead_day", "lead_week"]
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][3], "2024-01-01");
        assert_eq!(table.rows[0][4], "2024-01-01"); // 2024-01-01 is a Monday
        assert_eq!(table.rows[1][3], "");
        assert_eq!(table.rows[1][4], "");
        Ok(())
    }

    #[test]
    fn recleaning_a_clean_output_is_idempotent() -> Result<()> {
        let input = sample_csv()?;
        let (clean, _) = clean_leads(load_leads_csv(input.path())?)?;

        let dir = tempdir()?;
        let first = dir.path().join("clean1.csv");
        write_clean_csv(&first, &clean)?;

        let (reclean, stats) = clean_leads(load_leads_csv(&first)?)?;
        assert_eq!(stats.invalid_count, 0);
        assert_eq!(stats.removed_dups, 0);
        assert_eq!(reclean.rows.len(), clean.rows.len());
        assert_eq!(reclean.lead_days, clean.lead_days);

        // derived columns are overwritten, not duplicated
        let second = dir.path().join("clean2.csv");
        write_clean_csv(&second, &reclean)?;
        let table = load_leads_csv(&second)?;
        assert_eq!(
            table.headers,
            vec!["name", "email", "date", "lead_day", "lead_week"]
        );
        Ok(())
    }

    #[test]
    fn parquet_clean_output_has_typed_date_columns() -> Result<()> {
        let input = sample_csv()?;
        let (clean, _) = clean_leads(load_leads_csv(input.path())?)?;

        let dir = tempdir()?;
        let out = dir.path().join("clean_customers.parquet");
        write_clean_parquet(&out, &clean)?;

        let file = File::open(&out)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let schema = builder.schema().clone();
        assert_eq!(
            schema.field_with_name("lead_day")?.data_type(),
            &DataType::Date32
        );
        assert_eq!(
            schema.field_with_name("lead_week")?.data_type(),
            &DataType::Date32
        );

        let mut reader = builder.build()?;
        let mut total = 0;
        while let Some(batch) = reader.next().transpose()? {
            total += batch.num_rows();
        }
        assert_eq!(total, 2);
        Ok(())
    }
}
