//! Legend: numbered variations plus the rates at the last visible period.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use convlab_core::view::ViewModel;
use convlab_core::VariationRegistry;

use crate::theme::Theme;

const LEADER: &str = "★";

pub struct LegendPanel<'a> {
    registry: &'a VariationRegistry,
    palette: &'a [String],
    selected: &'a [String],
    vm: &'a ViewModel<'a>,
    theme: &'a Theme,
}

impl<'a> LegendPanel<'a> {
    pub fn new(
        registry: &'a VariationRegistry,
        palette: &'a [String],
        selected: &'a [String],
        vm: &'a ViewModel<'a>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            registry,
            palette,
            selected,
            vm,
            theme,
        }
    }

    fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }
}

impl Widget for LegendPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(" Variations ", self.theme.title()))
            .borders(Borders::ALL)
            .border_style(self.theme.muted())
            .style(self.theme.base());
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::new();
        for (position, v) in self.registry.iter().enumerate() {
            let color = self.theme.series_color(self.registry.color_for(v, self.palette));
            let (marker, name_style) = if self.is_selected(&v.id) {
                ("■", Style::default().fg(self.theme.text_primary))
            } else {
                ("□", self.theme.muted())
            };
            let key = if position < 9 {
                format!("[{}] ", position + 1)
            } else {
                "    ".to_string()
            };
            lines.push(Line::from(vec![
                Span::styled(key, self.theme.muted()),
                Span::styled(marker, Style::default().fg(color)),
                Span::styled(format!(" {}", v.name), name_style),
            ]));
        }

        if let Some(point) = self.vm.points.last() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                point.period_key.clone(),
                self.theme.accent().add_modifier(Modifier::BOLD),
            )));

            let leaders = point.leaders(self.selected);
            for v in self.registry.iter().filter(|v| self.is_selected(&v.id)) {
                let Some(rate) = point.rate(&v.id) else {
                    continue;
                };
                let mut spans = vec![
                    Span::styled(format!("{}: ", v.name), self.theme.muted()),
                    Span::styled(
                        format!("{rate:.2}%"),
                        Style::default().fg(self.theme.text_primary),
                    ),
                ];
                if leaders.contains(&v.id.as_str()) {
                    spans.push(Span::styled(format!(" {LEADER}"), self.theme.accent()));
                }
                lines.push(Line::from(spans));
            }
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
