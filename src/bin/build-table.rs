use anyhow::{Context, Result};
use clap::Parser;
use csv::{ReaderBuilder, StringRecord, Writer};
use molname::*;
use std::fs::File;
use tracing::*;

/// Read a CSV of names and write name, formula and condensed formula for each.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "names.csv")]
    input: String,

    #[arg(short, long, default_value = "formulas.csv")]
    output: String,

    /// Zero-based column holding the names
    #[arg(short, long, default_value_t = 0)]
    column: usize,

    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log);

    let input = File::open(&cli.input).with_context(|| format!("Failed to open {}", cli.input))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(input);
    let output =
        File::create(&cli.output).with_context(|| format!("Failed to create {}", cli.output))?;
    let mut wtr = Writer::from_writer(output);
    wtr.write_record(["name", "formula", "condensed_formula"])?;

    let (mut written, mut skipped) = (0usize, 0usize);
    for result in rdr.records() {
        let record: StringRecord = result?;
        let name = record.get(cli.column).unwrap_or("").trim();
        if name.is_empty() {
            warn!("Skipping record with no name: {:?}", record);
            skipped += 1;
            continue;
        }
        match parse(name) {
            Ok(molecule) => {
                wtr.write_record([
                    name.to_string(),
                    formula(&molecule),
                    condensed_formula(&molecule),
                ])?;
                written += 1;
            }
            Err(err) => {
                warn!("Skipping {name}: {err}");
                skipped += 1;
            }
        }
    }
    wtr.flush()?;
    info!(
        "Wrote {written} formulas to {} ({skipped} skipped)",
        cli.output
    );
    Ok(())
}
