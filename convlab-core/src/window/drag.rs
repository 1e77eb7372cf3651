//! Pointer-drag panning.
//!
//! A session records where the pointer went down and which period was
//! first on screen at that moment. Every movement sample maps the total
//! horizontal displacement to whole periods and pans from the origin, so
//! the window follows the pointer live rather than on release.

use serde::{Deserialize, Serialize};

use super::WindowState;

/// Pixels of horizontal travel per period step.
pub const DEFAULT_DRAG_SENSITIVITY_PX: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    origin_x: f64,
    origin_start: usize,
    sensitivity_px: f64,
}

impl DragSession {
    pub fn begin(x: f64, window: WindowState, sensitivity_px: f64) -> Self {
        let sensitivity_px = if sensitivity_px.is_finite() && sensitivity_px > 0.0 {
            sensitivity_px
        } else {
            DEFAULT_DRAG_SENSITIVITY_PX
        };
        Self {
            origin_x: x,
            origin_start: window.start_index,
            sensitivity_px,
        }
    }

    pub fn origin_start(&self) -> usize {
        self.origin_start
    }

    /// `-round(dx / sensitivity)`: dragging right reveals earlier periods.
    pub fn steps(&self, x: f64) -> isize {
        let steps = -((x - self.origin_x) / self.sensitivity_px).round();
        if steps.is_finite() {
            steps as isize
        } else {
            0
        }
    }

    /// Window for a movement sample at `x`.
    pub fn update(&self, x: f64, window: WindowState, series_len: usize) -> WindowState {
        let target = (self.origin_start as isize).saturating_add(self.steps(x));
        let delta = target.saturating_sub(window.start_index as isize);
        window.pan(delta, series_len)
    }
}
