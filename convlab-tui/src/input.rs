//! Keyboard and mouse dispatch: every navigation input becomes a `ViewEvent`.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use convlab_core::view::ViewEvent;
use convlab_core::Granularity;

use crate::app::App;

/// Horizontal pixels one terminal column stands for when mapping mouse
/// columns onto drag sensitivity.
pub const COLUMN_PX: f64 = 10.0;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        KeyCode::Char('+') | KeyCode::Char('=') => app.dispatch(ViewEvent::ZoomIn),
        KeyCode::Char('-') | KeyCode::Char('_') => app.dispatch(ViewEvent::ZoomOut),
        KeyCode::Char('0') => app.dispatch(ViewEvent::ResetZoom),

        KeyCode::Left | KeyCode::Char('h') => app.dispatch(ViewEvent::PanLeft),
        KeyCode::Right | KeyCode::Char('l') => app.dispatch(ViewEvent::PanRight),
        // A page is one visible window.
        KeyCode::Char('H') | KeyCode::PageUp => {
            let page = page_size(app);
            app.dispatch(ViewEvent::PanBy(-page));
        }
        KeyCode::Char('L') | KeyCode::PageDown => {
            let page = page_size(app);
            app.dispatch(ViewEvent::PanBy(page));
        }
        KeyCode::Home => app.dispatch(ViewEvent::PanBy(isize::MIN)),
        KeyCode::End => app.dispatch(ViewEvent::PanBy(isize::MAX)),

        KeyCode::Char('d') => app.dispatch(ViewEvent::SetGranularity(Granularity::Day)),
        KeyCode::Char('w') => app.dispatch(ViewEvent::SetGranularity(Granularity::Week)),
        KeyCode::Tab => {
            let next = app.view.granularity.toggle();
            app.dispatch(ViewEvent::SetGranularity(next));
        }

        KeyCode::Char(c @ '1'..='9') => {
            let position = c as usize - '1' as usize;
            app.toggle_variation_at(position);
        }

        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('r') => app.reload(),

        _ => {}
    }
}

/// Left-button drag pans live; release or leaving the chart ends the gesture.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let Some(area) = app.chart_area else {
        return;
    };
    let inside = contains(area, mouse.column, mouse.row);
    let x = f64::from(mouse.column) * COLUMN_PX;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if inside => {
            app.dispatch(ViewEvent::DragStart { x });
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if inside {
                app.dispatch(ViewEvent::DragMove { x });
            } else {
                app.dispatch(ViewEvent::DragEnd);
            }
        }
        MouseEventKind::Up(_) => app.dispatch(ViewEvent::DragEnd),
        MouseEventKind::Moved if !inside => app.dispatch(ViewEvent::DragEnd),
        MouseEventKind::ScrollUp if inside => app.dispatch(ViewEvent::ZoomIn),
        MouseEventKind::ScrollDown if inside => app.dispatch(ViewEvent::ZoomOut),
        _ => {}
    }
}

fn page_size(app: &App) -> isize {
    let visible = app.view.window.visible_count(app.series().len());
    isize::try_from(visible.max(1)).unwrap_or(isize::MAX)
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    area.contains(Position::new(column, row))
}

/// Key bindings help text
pub fn key_bindings_help() -> Vec<(&'static str, &'static str)> {
    vec![
        ("+ / -", "Zoom in / out"),
        ("0", "Reset zoom"),
        ("←/h, →/l", "Pan one period"),
        ("H / L", "Pan one page"),
        ("d / w / Tab", "Day, week, toggle"),
        ("1-9", "Toggle variation"),
        ("drag", "Pan with the mouse"),
        ("t", "Theme"),
        ("r", "Reload"),
        ("q", "Quit"),
    ]
}
