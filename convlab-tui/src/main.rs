//! ConvLab TUI: conversion-rate chart with keyboard and mouse navigation.
//!
//! Layout:
//! 1. Header: granularity, zoom, visible range
//! 2. Chart: selected variations over the visible window
//! 3. Legend: numbered toggles and rates at the last visible period
//! 4. Status bar: messages and key hints

use std::fs::File;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use convlab_core::{Granularity, RawDataset};
use convlab_tui::app::{self, App};
use convlab_tui::{input, ui};

/// Log destination; unset means no logging (the alternate screen owns stdout/stderr).
const LOG_ENV: &str = "CONVLAB_LOG";

#[derive(Parser)]
#[command(name = "convlab-tui", about = "Interactive A/B-test conversion-rate chart")]
struct Cli {
    /// Experiment export (JSON).
    #[arg(default_value = "data/sample.json")]
    input: PathBuf,

    /// Chart config TOML. Defaults to <config dir>/convlab/config.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial granularity, overriding the config.
    #[arg(long)]
    granularity: Option<Granularity>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let mut config = app::load_config(cli.config.as_deref())?;
    if let Some(granularity) = cli.granularity {
        config.default_granularity = granularity;
    }
    let dataset = RawDataset::from_file(&cli.input)?;
    let mut app = App::new(&dataset, config)
        .with_context(|| format!("aggregating {}", cli.input.display()))?
        .with_source(cli.input.clone());
    app.set_status(format!(
        "Loaded {} records, {} variations from {}",
        dataset.record_count(),
        app.registry.len(),
        cli.input.display()
    ));
    tracing::info!(input = %cli.input.display(), "starting viewer");

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture);
        default_hook(info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // 50ms poll keeps the drag responsive without spinning.
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os(LOG_ENV) else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", PathBuf::from(&path).display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
