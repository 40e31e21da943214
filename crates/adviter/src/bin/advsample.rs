use std::io::{self as stdio, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod commands;

use commands::{sample, summary};

#[derive(Parser, Debug)]
#[command(
    name = "advsample",
    about = "Draws random numbers and labels each one as bigger or smaller than a threshold.",
    version,
    author
)]
struct Cli {
    /// Number of values to draw.
    #[arg(short = 'n', long, default_value_t = 100)]
    count: usize,
    /// Values strictly greater than this are labelled "Bigger".
    #[arg(short, long, default_value_t = 50)]
    threshold: i32,
    /// Seed for a reproducible sequence. When omitted, the thread RNG is used.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Print occurrence checks computed on a worker pool after the labels.
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(stdio::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let values = sample::draw(cli.count, cli.seed);
    tracing::debug!(count = values.len(), seed = ?cli.seed, "values drawn");

    let stdout = stdio::stdout();
    let mut out = stdout.lock();
    sample::write_labels(&values, cli.threshold, &mut out)?;

    if cli.summary {
        let report = summary::run(values, cli.threshold)?;
        summary::write_report(&report, &mut out)?;
    }

    out.flush().context("Failed to flush standard output")?;
    Ok(())
}
