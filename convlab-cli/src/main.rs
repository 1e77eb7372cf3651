//! ConvLab CLI: inspect an experiment export from the terminal.
//!
//! Commands:
//! - `aggregate`: per-day or per-week conversion rates as JSON, CSV or a table
//! - `window`: the visible slice, Y domain and pan state for a zoom/pan setting
//! - `variations`: variation ids, names and chart colors
//! - `validate`: check dates, duplicates and counts before charting

mod output;
mod validate;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use convlab_core::view::{ViewContext, ViewEvent, ViewModel, ViewState};
use convlab_core::{aggregate_with, ChartConfig, Granularity, RawDataset, VariationRegistry};

use crate::output::WindowReport;
use crate::validate::ValidationReport;

#[derive(Parser)]
#[command(
    name = "convlab",
    about = "ConvLab CLI: A/B-test conversion rates by day or week"
)]
struct Cli {
    /// Chart config TOML (zoom limits, drag sensitivity, palette).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate an export into a conversion-rate series.
    Aggregate {
        /// Experiment export (JSON).
        #[arg(long)]
        input: PathBuf,

        /// day or week. Defaults to the config's default granularity.
        #[arg(long)]
        granularity: Option<Granularity>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show what a zoom/pan setting puts on screen.
    Window {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        granularity: Option<Granularity>,

        /// Zoom factor, snapped to the configured step.
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,

        /// First visible period index.
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Periods to pan after applying --start (negative pans left).
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        pan: isize,
    },
    /// List variations with their chart colors.
    Variations {
        #[arg(long)]
        input: PathBuf,
    },
    /// Check an export for malformed dates and duplicates.
    Validate {
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Table,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Aggregate {
            input,
            granularity,
            format,
            output,
        } => run_aggregate(
            &input,
            granularity.unwrap_or(config.default_granularity),
            format,
            output.as_deref(),
        ),
        Commands::Window {
            input,
            granularity,
            zoom,
            start,
            pan,
        } => run_window(
            &input,
            granularity.unwrap_or(config.default_granularity),
            zoom,
            start,
            pan,
            &config,
        ),
        Commands::Variations { input } => run_variations(&input, &config),
        Commands::Validate { input } => run_validate(&input),
    }
}

fn load_config(path: Option<&Path>) -> Result<ChartConfig> {
    match path {
        Some(path) => ChartConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ChartConfig::default()),
    }
}

fn load_dataset(path: &Path) -> Result<(RawDataset, VariationRegistry)> {
    let dataset = RawDataset::from_file(path)?;
    let registry = VariationRegistry::from_raw(&dataset.variations);
    tracing::info!(
        path = %path.display(),
        records = dataset.record_count(),
        variations = registry.len(),
        "loaded dataset"
    );
    Ok((dataset, registry))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn run_aggregate(
    input: &Path,
    granularity: Granularity,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let (dataset, registry) = load_dataset(input)?;
    let series = aggregate_with(&dataset, &registry, granularity)?;

    let mut out = open_output(output)?;
    match format {
        OutputFormat::Json => output::write_json(&series, &mut out)?,
        OutputFormat::Csv => output::write_csv(&series, &registry, &mut out)?,
        OutputFormat::Table => output::write_table(&series, &registry, &mut out)?,
    }
    out.flush()?;

    if let Some(path) = output {
        eprintln!(
            "Wrote {} {} points to {}",
            series.len(),
            granularity,
            path.display()
        );
    }
    Ok(())
}

fn run_window(
    input: &Path,
    granularity: Granularity,
    zoom: f64,
    start: usize,
    pan: isize,
    config: &ChartConfig,
) -> Result<()> {
    if !zoom.is_finite() {
        bail!("--zoom must be a finite number, got {zoom}");
    }
    let (dataset, registry) = load_dataset(input)?;
    let series = aggregate_with(&dataset, &registry, granularity)?;

    // The other granularity is never shown here; only its length matters.
    let ctx = ViewContext::new(series.len(), series.len(), config);
    let start_delta = isize::try_from(start).unwrap_or(isize::MAX);
    let state = ViewState::new(granularity, registry.ids())
        .apply(&ViewEvent::SetZoom(zoom), &ctx)
        .apply(&ViewEvent::PanBy(start_delta), &ctx)
        .apply(&ViewEvent::PanBy(pan), &ctx);

    let vm = ViewModel::build(&series, &registry, config.palette(), &state);
    let report = WindowReport::new(granularity, &vm);

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &report)?;
    writeln!(out)?;
    Ok(())
}

fn run_variations(input: &Path, config: &ChartConfig) -> Result<()> {
    let (_, registry) = load_dataset(input)?;
    let mut out = io::stdout().lock();
    output::write_variations(&registry, config.palette(), &mut out)?;
    Ok(())
}

fn run_validate(input: &Path) -> Result<()> {
    let dataset = RawDataset::from_file(input)?;
    let report = ValidationReport::from_dataset(&dataset);

    let mut out = io::stdout().lock();
    report.write_to(&mut out)?;

    if !report.is_ok() {
        bail!(
            "{} record(s) with malformed dates in {}",
            report.malformed_dates.len(),
            input.display()
        );
    }
    Ok(())
}
