//! Top-level UI layout: header, chart with legend, status bar.

pub mod chart;
pub mod legend;
pub mod status_bar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;

use self::chart::ChartPanel;
use self::legend::LegendPanel;

/// Width of the legend column.
const LEGEND_WIDTH: u16 = 32;

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub header: Rect,
    pub chart: Rect,
    pub legend: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(area);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(LEGEND_WIDTH)])
            .split(rows[1]);

        Self {
            header: rows[0],
            chart: body[0],
            legend: body[1],
            status: rows[2],
        }
    }
}

/// Draw the entire UI and remember where the chart went for mouse hit-testing.
pub fn draw(f: &mut Frame, app: &mut App) {
    let layout = AppLayout::new(f.area());
    app.chart_area = Some(layout.chart);
    let app = &*app;

    let theme = app.theme();
    let vm = app.view_model();

    render_header(f, layout.header, app);
    f.render_widget(
        ChartPanel::new(&vm, app.view.granularity, &theme),
        layout.chart,
    );
    f.render_widget(
        LegendPanel::new(
            &app.registry,
            app.config.palette(),
            &app.view.selected,
            &vm,
            &theme,
        ),
        layout.legend,
    );
    status_bar::render(f, layout.status, app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.theme();
    let vm = app.view_model();

    let range = match (vm.first_period(), vm.last_period()) {
        (Some(first), Some(last)) => format!("{first} → {last}"),
        _ => "no data".to_string(),
    };
    let mut spans = vec![
        Span::styled(" ConvLab ", theme.title()),
        Span::styled(format!("│ {} ", app.view.granularity), theme.accent()),
        Span::styled(format!("│ zoom {:.1}x ", vm.window.zoom_factor), theme.muted()),
        Span::styled(
            format!("│ {range} ({} of {}) ", vm.points.len(), vm.series_len),
            theme.muted(),
        ),
    ];
    if app.view.is_dragging() {
        spans.push(Span::styled("│ dragging ", theme.accent()));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).style(theme.base()), area);
}
