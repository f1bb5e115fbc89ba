use std::{collections::HashSet, env, path::Path, process::exit};

use leadscrub::ingest::load_leads_csv;
use leadscrub::process::enrich::derive_lead_days;
use leadscrub::schema::resolve_columns;

fn main() {
    // Expect exactly one CLI argument: path to a clean (or raw) leads CSV.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <LEADS_CSV>", args[0]);
        exit(1);
    }
    if let Err(e) = inspect(Path::new(&args[1])) {
        eprintln!("Error: {e:#}");
        exit(1);
    }
}

/// Load the table and print its headline stats.
fn inspect(path: &Path) -> anyhow::Result<()> {
    let table = load_leads_csv(path)?;
    let cols = resolve_columns(&table.headers)?;

    let emails: HashSet<&str> = table
        .rows
        .iter()
        .map(|r| r.get(cols.email).map(String::as_str).unwrap_or("").trim())
        .collect();
    let days = derive_lead_days(&table.rows, cols.date);
    let dated = days.iter().filter(|d| d.is_some()).count();

    println!("=== Leads table: {} ===", path.display());
    println!("Columns:         {}", table.headers.len());
    println!("Rows:            {}", table.rows.len());
    println!("Distinct emails: {}", emails.len());
    println!("Dated rows:      {}", dated);
    println!("Undated rows:    {}", table.rows.len() - dated);
    Ok(())
}
