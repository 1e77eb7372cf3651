//! Application state: single-owner, main-thread only.
//!
//! The app owns both processed series and the current [`ViewState`]
//! snapshot. Every navigation event goes through `ViewState::apply` and the
//! result replaces the snapshot before the next event is read.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ratatui::layout::Rect;

use convlab_core::view::{ViewContext, ViewEvent, ViewModel, ViewState};
use convlab_core::{
    aggregate_with, AggregateError, ChartConfig, Granularity, ProcessedSeries, RawDataset,
    VariationRegistry,
};

use crate::theme::{Theme, ThemeKind};

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// `$XDG_CONFIG_HOME/convlab/config.toml` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("convlab").join("config.toml"))
}

/// `--config` when given, otherwise the per-user file if present, otherwise
/// defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<ChartConfig> {
    if let Some(path) = explicit {
        return ChartConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()));
    }
    match default_config_path() {
        Some(path) => ChartConfig::load_or_default(&path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ChartConfig::default()),
    }
}

pub struct App {
    pub config: ChartConfig,
    pub registry: VariationRegistry,
    pub day: ProcessedSeries,
    pub week: ProcessedSeries,
    pub view: ViewState,
    pub theme_kind: ThemeKind,
    pub running: bool,
    pub status_message: Option<(String, StatusLevel)>,
    /// Where the chart was last drawn; mouse events outside it are ignored.
    pub chart_area: Option<Rect>,
    /// Export to re-read on `r`.
    pub source: Option<PathBuf>,
}

impl App {
    /// Build the app from a dataset. Fails only if the initial aggregation does.
    pub fn new(dataset: &RawDataset, config: ChartConfig) -> Result<Self, AggregateError> {
        let registry = VariationRegistry::from_raw(&dataset.variations);
        let (day, week) = aggregate_both(dataset, &registry)?;
        let view = ViewState::new(config.default_granularity, registry.ids());

        Ok(Self {
            config,
            registry,
            day,
            week,
            view,
            theme_kind: ThemeKind::default(),
            running: true,
            status_message: None,
            chart_area: None,
            source: None,
        })
    }

    pub fn with_source(mut self, path: PathBuf) -> Self {
        self.source = Some(path);
        self
    }

    pub fn theme(&self) -> Theme {
        self.theme_kind.theme()
    }

    pub fn context(&self) -> ViewContext {
        ViewContext::new(self.day.len(), self.week.len(), &self.config)
    }

    pub fn series(&self) -> &ProcessedSeries {
        match self.view.granularity {
            Granularity::Day => &self.day,
            Granularity::Week => &self.week,
        }
    }

    pub fn view_model(&self) -> ViewModel<'_> {
        ViewModel::build(
            self.series(),
            &self.registry,
            self.config.palette(),
            &self.view,
        )
    }

    /// Feed one event through the reducer and keep the resulting snapshot.
    pub fn dispatch(&mut self, event: ViewEvent) {
        let next = self.view.apply(&event, &self.context());
        if next == self.view {
            return;
        }
        tracing::trace!(?event, start = next.window.start_index, zoom = next.window.zoom_factor, "view updated");
        self.view = next;
    }

    /// Replace the data. On failure the current series stay on screen and
    /// the error goes to the status bar.
    pub fn replace_dataset(&mut self, dataset: &RawDataset) {
        let registry = VariationRegistry::from_raw(&dataset.variations);
        match aggregate_both(dataset, &registry) {
            Ok((day, week)) => {
                self.day = day;
                self.week = week;

                let mut selected: Vec<String> = self
                    .view
                    .selected
                    .iter()
                    .filter(|id| registry.get(id).is_some())
                    .cloned()
                    .collect();
                if selected.is_empty() {
                    selected = registry.ids();
                }
                self.registry = registry;

                let len = self.series().len();
                self.view = ViewState {
                    window: self.view.window.clamp_to(len),
                    selected,
                    drag: None,
                    ..self.view.clone()
                };
                self.set_status(format!(
                    "Loaded {} records, {} variations",
                    dataset.record_count(),
                    self.registry.len()
                ));
            }
            Err(err) => {
                tracing::error!(%err, "aggregation failed, keeping previous series");
                self.set_error(format!("{err}; showing previous data"));
            }
        }
    }

    /// Re-read the source export from disk.
    pub fn reload(&mut self) {
        let Some(path) = self.source.clone() else {
            self.set_warning("No source file to reload");
            return;
        };
        match RawDataset::from_file(&path) {
            Ok(dataset) => self.replace_dataset(&dataset),
            Err(err) => {
                tracing::error!(%err, "reload failed");
                self.set_error(err.to_string());
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme_kind = self.theme_kind.toggle();
        self.set_status(format!("Theme: {}", self.theme_kind.label()));
    }

    /// Toggle the variation at a 0-based legend position.
    pub fn toggle_variation_at(&mut self, position: usize) {
        let Some(variation) = self.registry.by_position(position) else {
            return;
        };
        let id = variation.id.clone();
        let was_selected = self.view.is_selected(&id);
        self.dispatch(ViewEvent::ToggleVariation(id.clone()));
        if was_selected && self.view.is_selected(&id) {
            self.set_warning("At least one variation must stay selected");
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}

fn aggregate_both(
    dataset: &RawDataset,
    registry: &VariationRegistry,
) -> Result<(ProcessedSeries, ProcessedSeries), AggregateError> {
    let day = aggregate_with(dataset, registry, Granularity::Day)?;
    let week = aggregate_with(dataset, registry, Granularity::Week)?;
    Ok((day, week))
}
