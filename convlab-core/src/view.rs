//! View state: the host's interactive state as one immutable snapshot.
//!
//! A host keeps a `ViewState`, feeds each user event through
//! [`ViewState::apply`] and replaces its snapshot with the result before
//! handling the next event. [`ViewModel::build`] then derives everything a
//! renderer needs from the snapshot and the current series.

use serde::{Deserialize, Serialize};

use crate::config::ChartConfig;
use crate::domain::{Granularity, ProcessedPoint, ProcessedSeries, VariationRegistry};
use crate::window::{
    visible_values, y_domain, DragSession, PanAffordances, WindowState, YDomain, ZoomLimits,
};

/// Facts about the data the reducer needs but does not own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewContext {
    pub day_len: usize,
    pub week_len: usize,
    pub limits: ZoomLimits,
    pub drag_sensitivity_px: f64,
}

impl ViewContext {
    pub fn new(day_len: usize, week_len: usize, config: &ChartConfig) -> Self {
        Self {
            day_len,
            week_len,
            limits: config.zoom_limits(),
            drag_sensitivity_px: config.drag_sensitivity_px(),
        }
    }

    pub fn series_len(&self, granularity: Granularity) -> usize {
        match granularity {
            Granularity::Day => self.day_len,
            Granularity::Week => self.week_len,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewEvent {
    SetGranularity(Granularity),
    ZoomIn,
    ZoomOut,
    SetZoom(f64),
    ResetZoom,
    PanLeft,
    PanRight,
    PanBy(isize),
    DragStart { x: f64 },
    DragMove { x: f64 },
    /// Pointer released or left the chart.
    DragEnd,
    ToggleVariation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub granularity: Granularity,
    pub window: WindowState,
    /// Never empty once a variation has been selected.
    pub selected: Vec<String>,
    pub drag: Option<DragSession>,
}

impl ViewState {
    /// Full view with every listed variation selected.
    pub fn new(granularity: Granularity, selected: Vec<String>) -> Self {
        Self {
            granularity,
            window: WindowState::default(),
            selected,
            drag: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// The snapshot that follows `event`.
    pub fn apply(&self, event: &ViewEvent, ctx: &ViewContext) -> ViewState {
        let len = ctx.series_len(self.granularity);
        let mut next = self.clone();

        match event {
            ViewEvent::SetGranularity(granularity) => {
                next.granularity = *granularity;
                next.window = self.window.clamp_to(ctx.series_len(*granularity));
                next.drag = None;
            }
            ViewEvent::ZoomIn => {
                next.window = self.window.zoom_in(len, &ctx.limits);
                next.drag = None;
            }
            ViewEvent::ZoomOut => {
                next.window = self.window.zoom_out(len, &ctx.limits);
                next.drag = None;
            }
            ViewEvent::SetZoom(factor) => {
                next.window = self.window.set_zoom(*factor, len, &ctx.limits);
                next.drag = None;
            }
            ViewEvent::ResetZoom => {
                next.window = self.window.reset();
                next.drag = None;
            }
            ViewEvent::PanLeft => next.window = self.window.pan(-1, len),
            ViewEvent::PanRight => next.window = self.window.pan(1, len),
            ViewEvent::PanBy(delta) => next.window = self.window.pan(*delta, len),
            ViewEvent::DragStart { x } => {
                // One session at a time, and only when there is something to pan.
                if self.drag.is_none() && !self.window.is_full_view() {
                    next.drag = Some(DragSession::begin(*x, self.window, ctx.drag_sensitivity_px));
                }
            }
            ViewEvent::DragMove { x } => {
                if let Some(session) = &self.drag {
                    next.window = session.update(*x, self.window, len);
                }
            }
            ViewEvent::DragEnd => next.drag = None,
            ViewEvent::ToggleVariation(id) => {
                if let Some(pos) = self.selected.iter().position(|s| s == id) {
                    if self.selected.len() > 1 {
                        next.selected.remove(pos);
                    }
                } else {
                    next.selected.push(id.clone());
                }
            }
        }

        next
    }
}

/// One selected variation's visible values.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub color: &'a str,
    /// `(index within the visible slice, rate)`.
    pub values: Vec<(usize, f64)>,
}

/// Everything the renderer consumes for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel<'a> {
    pub points: &'a [ProcessedPoint],
    /// Index of `points[0]` in the full series.
    pub offset: usize,
    pub series_len: usize,
    pub window: WindowState,
    pub domain: YDomain,
    pub ticks: Vec<i64>,
    pub affordances: PanAffordances,
    pub lines: Vec<LineSeries<'a>>,
}

impl<'a> ViewModel<'a> {
    pub fn build(
        series: &'a ProcessedSeries,
        registry: &'a VariationRegistry,
        palette: &'a [String],
        state: &ViewState,
    ) -> Self {
        let series_len = series.len();
        let window = state.window.clamp_to(series_len);
        let points = window.visible_slice(series.points());
        let offset = if window.is_full_view() {
            0
        } else {
            window.visible_range(series_len).start
        };

        let domain = y_domain(visible_values(points, &state.selected));

        let lines = registry
            .iter()
            .filter(|v| state.is_selected(&v.id))
            .map(|v| LineSeries {
                id: v.id.as_str(),
                name: v.name.as_str(),
                color: registry.color_for(v, palette),
                values: points
                    .iter()
                    .enumerate()
                    .filter_map(|(i, p)| p.rate(&v.id).map(|r| (i, r)))
                    .collect(),
            })
            .collect();

        Self {
            points,
            offset,
            series_len,
            window,
            domain,
            ticks: domain.ticks(),
            affordances: window.affordances(series_len),
            lines,
        }
    }

    pub fn first_period(&self) -> Option<&'a str> {
        self.points.first().map(|p| p.period_key.as_str())
    }

    pub fn last_period(&self) -> Option<&'a str> {
        self.points.last().map(|p| p.period_key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::domain::{RawDailyRecord, RawDataset, RawVariation};

    fn ctx(day_len: usize, week_len: usize) -> ViewContext {
        ViewContext::new(day_len, week_len, &ChartConfig::default())
    }

    fn state() -> ViewState {
        ViewState::new(Granularity::Day, vec!["0".into(), "1".into()])
    }

    fn dataset(days: usize) -> RawDataset {
        let start = chrono::NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        RawDataset {
            variations: vec![
                RawVariation { id: None, name: "Original".into() },
                RawVariation { id: Some(1), name: "Variation A".into() },
            ],
            data: (0..days)
                .map(|i| RawDailyRecord {
                    date: (start + chrono::Duration::days(i as i64)).to_string(),
                    visits: [("0".to_string(), Some(100)), ("1".to_string(), Some(100))].into(),
                    conversions: [("0".to_string(), Some(10 + i as u64)), ("1".to_string(), Some(20))]
                        .into(),
                })
                .collect(),
        }
    }

    #[test]
    fn zoom_then_pan_then_reset() {
        let c = ctx(10, 2);
        let s = state()
            .apply(&ViewEvent::ZoomIn, &c)
            .apply(&ViewEvent::ZoomIn, &c)
            .apply(&ViewEvent::PanRight, &c)
            .apply(&ViewEvent::PanRight, &c);
        assert_eq!(s.window, WindowState { zoom_factor: 2.0, start_index: 2 });

        let s = s.apply(&ViewEvent::ResetZoom, &c);
        assert_eq!(s.window, WindowState::default());
    }

    #[test]
    fn apply_does_not_mutate_previous_snapshot() {
        let c = ctx(10, 2);
        let before = state();
        let after = before.apply(&ViewEvent::ZoomIn, &c);
        assert_eq!(before.window, WindowState::default());
        assert_eq!(after.window.zoom_factor, 1.5);
    }

    #[test]
    fn granularity_change_reclamps_window() {
        let c = ctx(28, 4);
        let s = state()
            .apply(&ViewEvent::SetZoom(2.0), &c)
            .apply(&ViewEvent::PanBy(14), &c);
        assert_eq!(s.window.start_index, 14);

        let s = s.apply(&ViewEvent::SetGranularity(Granularity::Week), &c);
        assert_eq!(s.granularity, Granularity::Week);
        assert_eq!(s.window.zoom_factor, 2.0);
        assert_eq!(s.window.start_index, 2);
    }

    #[test]
    fn drag_requires_zoom_and_single_session() {
        let c = ctx(40, 6);
        let s = state().apply(&ViewEvent::DragStart { x: 50.0 }, &c);
        assert!(!s.is_dragging());

        let s = s
            .apply(&ViewEvent::SetZoom(2.0), &c)
            .apply(&ViewEvent::PanBy(10), &c)
            .apply(&ViewEvent::DragStart { x: 50.0 }, &c);
        assert!(s.is_dragging());
        let origin = s.drag.unwrap().origin_start();

        // A second start while dragging is ignored.
        let s = s
            .apply(&ViewEvent::DragMove { x: 20.0 }, &c)
            .apply(&ViewEvent::DragStart { x: 500.0 }, &c);
        assert_eq!(s.drag.unwrap().origin_start(), origin);
        assert_eq!(s.window.start_index, 13);

        // Live: every sample moves the window.
        let s = s.apply(&ViewEvent::DragMove { x: 70.0 }, &c);
        assert_eq!(s.window.start_index, 8);

        let s = s.apply(&ViewEvent::DragEnd, &c);
        assert!(!s.is_dragging());
        let s = s.apply(&ViewEvent::DragMove { x: 0.0 }, &c);
        assert_eq!(s.window.start_index, 8);
    }

    #[test]
    fn last_selected_variation_cannot_be_removed() {
        let c = ctx(5, 1);
        let s = state().apply(&ViewEvent::ToggleVariation("0".into()), &c);
        assert_eq!(s.selected, vec!["1".to_string()]);

        let s = s.apply(&ViewEvent::ToggleVariation("1".into()), &c);
        assert_eq!(s.selected, vec!["1".to_string()]);

        let s = s.apply(&ViewEvent::ToggleVariation("0".into()), &c);
        assert_eq!(s.selected, vec!["1".to_string(), "0".to_string()]);
    }

    #[test]
    fn view_model_at_full_view_uses_whole_series() {
        let ds = dataset(10);
        let series = aggregate(&ds, Granularity::Day).unwrap();
        let registry = VariationRegistry::from_raw(&ds.variations);
        let config = ChartConfig::default();

        let vm = ViewModel::build(&series, &registry, config.palette(), &state());
        assert_eq!(vm.points.len(), 10);
        assert_eq!(vm.offset, 0);
        assert_eq!(vm.lines.len(), 2);
        assert_eq!(vm.lines[0].color, "#8884d8");
        assert_eq!(vm.affordances, PanAffordances::default());
        // Lowest visible rate is 10: floor(9.0) = 9
        assert_eq!(vm.domain.min, 9);
        assert_eq!(vm.ticks.first(), Some(&0));
    }

    #[test]
    fn view_model_follows_window_and_selection() {
        let ds = dataset(10);
        let series = aggregate(&ds, Granularity::Day).unwrap();
        let registry = VariationRegistry::from_raw(&ds.variations);
        let config = ChartConfig::default();
        let c = ctx(series.len(), 2);

        let s = state()
            .apply(&ViewEvent::SetZoom(2.0), &c)
            .apply(&ViewEvent::PanBy(5), &c)
            .apply(&ViewEvent::ToggleVariation("1".into()), &c);

        let vm = ViewModel::build(&series, &registry, config.palette(), &s);
        assert_eq!(vm.offset, 5);
        assert_eq!(vm.first_period(), Some("2025-01-11"));
        assert_eq!(vm.last_period(), Some("2025-01-15"));
        assert_eq!(vm.lines.len(), 1);
        assert_eq!(vm.lines[0].values.first(), Some(&(0, 15.0)));
        // Rates 15..=19 only: floor(13.5) = 13, ceil(20.9) = 21
        assert_eq!(vm.domain, YDomain { min: 13, max: 21 });
        assert_eq!(vm.affordances, PanAffordances { left: true, right: false });
    }
}
