//! Theme tokens for the ConvLab viewer.
//!
//! Two variants, toggled with `t`:
//! - **Dark**: near-black surface, cyan accent
//! - **Light**: off-white surface, deep blue accent
//!
//! Series colors come from the chart palette (hex strings) and are
//! converted with [`parse_hex_color`].

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    pub fn toggle(self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
        }
    }

    pub fn theme(self) -> Theme {
        match self {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    /// Focus, title, pan markers
    pub accent: Color,
    pub warning: Color,
    pub negative: Color,
    /// Axes, hints, deselected variations
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            warning: Color::Rgb(255, 140, 0),
            negative: Color::Rgb(255, 20, 147),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    pub fn light() -> Self {
        Self {
            background: Color::Rgb(250, 250, 247),
            accent: Color::Rgb(0, 82, 204),
            warning: Color::Rgb(191, 87, 0),
            negative: Color::Rgb(200, 0, 70),
            muted: Color::Rgb(110, 110, 120),
            text_primary: Color::Rgb(20, 20, 24),
            text_secondary: Color::Rgb(80, 80, 90),
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text_primary).bg(self.background)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Series color for a palette entry, falling back to the accent.
    pub fn series_color(&self, hex: &str) -> Color {
        parse_hex_color(hex).unwrap_or(self.accent)
    }
}

/// `#rrggbb` (or `rrggbb`) to an RGB color.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secondary_style_uses_secondary_text() {
        assert_eq!(Theme::dark().secondary().fg, Some(Color::Rgb(170, 170, 170)));
        assert_eq!(Theme::light().secondary().fg, Some(Color::Rgb(80, 80, 90)));
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(ThemeKind::Dark.toggle(), ThemeKind::Light);
        assert_eq!(ThemeKind::Light.toggle().theme(), Theme::dark());
        assert_eq!(ThemeKind::default().theme(), Theme::default());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#8884d8"), Some(Color::Rgb(0x88, 0x84, 0xd8)));
        assert_eq!(parse_hex_color("82ca9d"), Some(Color::Rgb(0x82, 0xca, 0x9d)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_series_color_fallback() {
        let theme = Theme::dark();
        assert_eq!(theme.series_color("not-a-color"), theme.accent);
        assert_eq!(theme.series_color("#ff7300"), Color::Rgb(255, 115, 0));
    }
}
