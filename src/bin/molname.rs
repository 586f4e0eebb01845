use anyhow::{Context, Result};
use clap::Parser;
use molname::*;

/// Print the molecular and condensed formula of each name.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Names to convert, e.g. "2,2-dimethylpropane"
    #[arg(required = true)]
    names: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log: String,

    /// Accept novelty names ending in "une"
    #[arg(long)]
    novelty: bool,

    /// Reject multipliers that disagree with their locant count
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log);

    let options = ParseOptions {
        novelty_names: cli.novelty,
        strict_multipliers: cli.strict,
    };
    for name in &cli.names {
        let molecule = parse_with(name, &options)
            .with_context(|| format!("Failed to parse name {name}"))?;
        println!(
            "{name}\t{}\t{}",
            formula(&molecule),
            condensed_formula(&molecule)
        );
    }
    Ok(())
}
