use std::path::PathBuf;
use std::process::exit;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use leadscrub::error::PipelineError;
use leadscrub::summary::RunSummary;
use leadscrub::{ingest, output, process, report};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Clean a raw leads CSV and derive daily/weekly lead reports"
)]
struct Args {
    /// Input leads CSV file
    #[arg(short, long)]
    input: PathBuf,

    /// Output clean table
    #[arg(short, long, default_value = "clean_customers.csv")]
    out: PathBuf,

    /// Output report directory (daily/weekly/summary tables)
    #[arg(short, long, default_value = "leads_report")]
    report: PathBuf,

    /// Serialization format of the clean table
    #[arg(long, value_enum, default_value_t = CleanFormat::Csv)]
    format: CleanFormat,

    /// Optional machine-readable run summary
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CleanFormat {
    Csv,
    Parquet,
}

fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        // A missing email column is an expected input defect with its own
        // exit status; everything else is a fatal error with its cause chain.
        if matches!(
            e.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingEmailColumn)
        ) {
            eprintln!("Error: {e}");
            exit(2);
        }
        eprintln!("Error: {e:#}");
        exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    info!(input = %args.input.display(), "starting leadscrub run");

    // 1) Load the raw table fully into memory.
    let raw = ingest::load_leads_csv(&args.input)?;

    // 2) Resolve columns, validate, dedupe, derive dates.
    let (clean, stats) = process::clean_leads(raw)?;

    // 3) Derive the report tables before touching any sink.
    let daily = report::count_by_day(&clean);
    let weekly = report::count_by_week(&clean);
    let totals = report::summarize(&clean);

    // 4) Write sinks only after the full in-memory pipeline succeeded.
    match args.format {
        CleanFormat::Csv => output::write_clean_csv(&args.out, &clean)?,
        CleanFormat::Parquet => output::write_clean_parquet(&args.out, &clean)?,
    }
    report::write_report(&args.report, &daily, &weekly, &totals)?;

    let run_summary = RunSummary::new(&args.input, &args.out, &args.report, &stats, &totals);
    if let Some(path) = &args.summary_json {
        run_summary.write_json(path)?;
    }
    run_summary.print();

    Ok(())
}
