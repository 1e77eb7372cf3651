//! Conversion-rate line chart for the visible window.
//!
//! Y bounds are the padded domain from the view model; every tick inside the
//! domain is drawn as a dotted gridline so it sits at its exact value. Pan
//! markers appear on the bottom border when the window can move that way.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

use convlab_core::view::ViewModel;
use convlab_core::Granularity;

use crate::theme::Theme;

pub struct ChartPanel<'a> {
    vm: &'a ViewModel<'a>,
    granularity: Granularity,
    theme: &'a Theme,
}

impl<'a> ChartPanel<'a> {
    pub fn new(vm: &'a ViewModel<'a>, granularity: Granularity, theme: &'a Theme) -> Self {
        Self {
            vm,
            granularity,
            theme,
        }
    }

    fn block(&self) -> Block<'static> {
        let mut block = Block::default()
            .title(Span::styled(
                format!(" Conversion rate (%) · {} ", self.granularity),
                self.theme.title(),
            ))
            .borders(Borders::ALL)
            .border_style(self.theme.muted())
            .style(self.theme.base());

        let affordances = self.vm.affordances;
        if affordances.left {
            block = block.title_bottom(Line::styled(" ◀ earlier ", self.theme.accent()).left_aligned());
        }
        if affordances.right {
            block = block.title_bottom(Line::styled(" later ▶ ", self.theme.accent()).right_aligned());
        }
        block
    }
}

impl Widget for ChartPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block();

        if self.vm.points.is_empty() {
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new(Line::styled("No data for this granularity", self.theme.muted()))
                .render(inner, buf);
            return;
        }

        let x_max = self.vm.points.len().saturating_sub(1).max(1) as f64;
        let [y_min, y_max] = self.vm.domain.bounds();

        let gridlines: Vec<[(f64, f64); 2]> = self
            .vm
            .ticks
            .iter()
            .map(|&t| t as f64)
            .filter(|t| *t >= y_min && *t <= y_max)
            .map(|t| [(0.0, t), (x_max, t)])
            .collect();
        let series: Vec<Vec<(f64, f64)>> = self
            .vm
            .lines
            .iter()
            .map(|line| {
                line.values
                    .iter()
                    .map(|&(i, rate)| (i as f64, rate))
                    .collect()
            })
            .collect();

        let mut datasets: Vec<Dataset> = gridlines
            .iter()
            .map(|g| {
                Dataset::default()
                    .marker(symbols::Marker::Dot)
                    .graph_type(GraphType::Line)
                    .style(self.theme.muted())
                    .data(g)
            })
            .collect();
        datasets.extend(self.vm.lines.iter().zip(&series).map(|(line, data)| {
            Dataset::default()
                .name(line.name)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(self.theme.series_color(line.color)))
                .data(data)
        }));

        let first = self.vm.first_period().unwrap_or_default();
        let last = self.vm.last_period().unwrap_or_default();

        let chart = Chart::new(datasets)
            .block(block)
            .style(self.theme.base())
            .legend_position(None)
            .x_axis(
                Axis::default()
                    .style(self.theme.muted())
                    .bounds([0.0, x_max])
                    .labels(vec![
                        Span::styled(first.to_string(), self.theme.muted()),
                        Span::styled(last.to_string(), self.theme.muted()),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .style(self.theme.muted())
                    .bounds([y_min, y_max])
                    .labels(vec![
                        Span::styled(format!("{y_min:.0}"), self.theme.muted()),
                        Span::styled(format!("{y_max:.0}"), self.theme.muted()),
                    ]),
            );

        chart.render(area, buf);
    }
}
