//! ConvLab TUI: terminal viewer for A/B-test conversion rates.
//!
//! Provides interactive exploration of a processed series with:
//! - Day / ISO-week granularity switching
//! - Zoom and keyboard panning
//! - Live mouse-drag panning
//! - Variation toggles with a per-period leader in the legend

pub mod app;
pub mod input;
pub mod theme;
pub mod ui;

pub use app::App;
pub use input::{handle_key, handle_mouse};
pub use theme::Theme;
