//! refscan: Report which metadata fields are filled in for a list of DOIs
//!
//! Usage:
//!   # Read dois.csv, write output.csv with the built-in field table
//!   refscan
//!
//!   # Custom input and output, fewer workers, contact address for the API
//!   refscan works.csv -o fields.csv --workers 8 --mailto me@example.org
//!
//!   # Custom field table, CSV to stdout
//!   refscan works.csv --config fields.toml --stdout

// Use MiMalloc allocator for better performance
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use refscan::input::read_identifiers;
use refscan::{run_report, CatalogClient, Config, ReportWriter};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "refscan")]
#[command(about = "Report nested metadata fields for a list of DOIs", long_about = None)]
struct Args {
    /// CSV file with a header row and an identifier column
    #[arg(value_name = "FILE", default_value = "dois.csv")]
    input: PathBuf,

    /// Output CSV file
    #[arg(long, short = 'o', default_value = "output.csv")]
    output: PathBuf,

    /// Write the report to stdout instead of the output file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// TOML config file (fetch, report and fields sections)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Number of concurrent requests (default: 20)
    #[arg(long)]
    workers: Option<usize>,

    /// Per-request timeout in seconds (default: 10)
    #[arg(long)]
    timeout: Option<u64>,

    /// Catalog base URL (default: https://api.crossref.org)
    #[arg(long)]
    base_url: Option<String>,

    /// Contact address sent in the User-Agent header
    #[arg(long)]
    mailto: Option<String>,

    /// Name of the identifier column in the output (default: "article")
    #[arg(long)]
    id_column: Option<String>,

    /// Name of the identifier column in the input (default: "doi")
    #[arg(long)]
    input_column: Option<String>,

    /// Text written for fields whose path does not resolve (default: empty)
    #[arg(long)]
    absent_marker: Option<String>,

    /// Log per-record progress
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Build config
    let mut config = Config::load(args.config.as_deref()).context("Invalid configuration")?;
    if let Some(workers) = args.workers {
        config.fetch.workers = workers;
    }
    if let Some(timeout) = args.timeout {
        config.fetch.timeout_secs = timeout;
    }
    if let Some(base_url) = args.base_url {
        config.fetch.base_url = base_url;
    }
    if args.mailto.is_some() {
        config.fetch.mailto = args.mailto;
    }
    if let Some(id_column) = args.id_column {
        config.report.id_column = id_column;
    }
    if let Some(input_column) = args.input_column {
        config.report.input_column = input_column;
    }
    if let Some(marker) = args.absent_marker {
        config.report.absent_marker = marker;
    }
    config.validate().context("Invalid configuration")?;

    let ids = read_identifiers(&args.input, &config.report.input_column);

    let client = CatalogClient::new(
        &config.fetch.base_url,
        Duration::from_secs(config.fetch.timeout_secs),
        config.fetch.mailto.as_deref(),
    );
    let report = run_report(&config, &client, &ids)?;

    if report.is_empty() {
        warn!("no record produced a row; writing header only");
    }

    if args.stdout {
        let mut writer = ReportWriter::new(std::io::stdout().lock())
            .with_absent_marker(config.report.absent_marker.as_str());
        writer.write_report(&report)?;
        writer.flush()?;
    } else {
        let mut writer = ReportWriter::to_path(&args.output)?
            .with_absent_marker(config.report.absent_marker.as_str());
        writer.write_report(&report)?;
        writer.flush()?;
        info!(path = %args.output.display(), rows = report.rows.len(), "report written");
    }

    Ok(())
}
