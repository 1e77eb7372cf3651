//! Bottom status bar: last status message, then key hints.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, StatusLevel};
use crate::input::key_bindings_help;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    f.render_widget(
        Paragraph::new(status_line(app)).style(app.theme().base()),
        area,
    );
}

fn status_line(app: &App) -> Line<'static> {
    let theme = app.theme();
    let mut spans: Vec<Span> = Vec::new();

    // Message first so a narrow terminal truncates hints, not errors.
    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme.accent(),
            StatusLevel::Warning => theme.muted().fg(theme.warning),
            StatusLevel::Error => theme.muted().fg(theme.negative),
        };
        spans.push(Span::styled(format!(" {msg}"), style));
        spans.push(Span::styled(" |", theme.muted()));
    }

    for (keys, action) in key_bindings_help() {
        spans.push(Span::styled(format!(" {keys}"), theme.accent()));
        spans.push(Span::styled(format!(" {action} "), theme.secondary()));
    }

    Line::from(spans)
}
