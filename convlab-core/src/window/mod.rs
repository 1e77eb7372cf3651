//! Window manager: which slice of a series is on screen.
//!
//! Knows nothing about conversion rates: every operation takes the series
//! length, never the series. `WindowState` is `Copy` and every transition
//! returns the next state, so a host can replace its snapshot wholesale per
//! event.
//!
//! Invariant: `start_index + visible_count(len) <= len` after every
//! transition, and `start_index == 0` whenever the zoom factor is 1.

pub mod axis;
pub mod drag;

use std::ops::Range;

use serde::{Deserialize, Serialize};

pub use axis::{visible_values, y_domain, YDomain};
pub use drag::{DragSession, DEFAULT_DRAG_SENSITIVITY_PX};

/// Number of periods shown at a zoom factor: `ceil(len / factor)`.
pub fn visible_count(series_len: usize, zoom_factor: f64) -> usize {
    if series_len == 0 {
        return 0;
    }
    let factor = if zoom_factor.is_finite() && zoom_factor >= 1.0 {
        zoom_factor
    } else {
        1.0
    };
    ((series_len as f64 / factor).ceil() as usize).clamp(1, series_len)
}

/// Allowed zoom range and button step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 4.0,
            step: 0.5,
        }
    }
}

impl ZoomLimits {
    /// Snap a requested factor onto the step grid and clamp it into range.
    pub fn snap(&self, factor: f64) -> f64 {
        if !factor.is_finite() {
            return self.min;
        }
        let steps = ((factor - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }
}

/// Whether the left/right pan affordances should be enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanAffordances {
    pub left: bool,
    pub right: bool,
}

/// Zoom factor plus pan offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowState {
    pub zoom_factor: f64,
    pub start_index: usize,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            zoom_factor: 1.0,
            start_index: 0,
        }
    }
}

impl WindowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full view: nothing hidden, no offset.
    pub fn is_full_view(&self) -> bool {
        self.zoom_factor <= 1.0
    }

    pub fn visible_count(&self, series_len: usize) -> usize {
        visible_count(series_len, self.zoom_factor)
    }

    /// Largest legal start index for a series of this length.
    pub fn max_start(&self, series_len: usize) -> usize {
        series_len.saturating_sub(self.visible_count(series_len))
    }

    /// Index range of the visible periods.
    pub fn visible_range(&self, series_len: usize) -> Range<usize> {
        let count = self.visible_count(series_len);
        let start = self.start_index.min(self.max_start(series_len));
        start..start + count
    }

    /// The visible part of `items`. At zoom 1 this is `items` itself.
    pub fn visible_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        if self.is_full_view() {
            return items;
        }
        &items[self.visible_range(items.len())]
    }

    /// Set the zoom factor, snapped to the step grid and clamped to the
    /// limits. Returning to 1 drops the pan offset.
    pub fn set_zoom(self, factor: f64, series_len: usize, limits: &ZoomLimits) -> Self {
        let zoom_factor = limits.snap(factor);
        Self {
            zoom_factor,
            start_index: self.start_index,
        }
        .clamp_to(series_len)
    }

    pub fn zoom_in(self, series_len: usize, limits: &ZoomLimits) -> Self {
        self.set_zoom(self.zoom_factor + limits.step, series_len, limits)
    }

    pub fn zoom_out(self, series_len: usize, limits: &ZoomLimits) -> Self {
        self.set_zoom(self.zoom_factor - limits.step, series_len, limits)
    }

    /// Move the window by `delta` periods, clamped to the series bounds.
    pub fn pan(self, delta: isize, series_len: usize) -> Self {
        let max_start = self.max_start(series_len) as isize;
        let target = (self.start_index as isize).saturating_add(delta);
        Self {
            zoom_factor: self.zoom_factor,
            start_index: target.clamp(0, max_start) as usize,
        }
    }

    pub fn reset(self) -> Self {
        Self::default()
    }

    /// Re-establish the invariant for a (possibly new) series length.
    pub fn clamp_to(self, series_len: usize) -> Self {
        let start_index = if self.is_full_view() {
            0
        } else {
            self.start_index.min(self.max_start(series_len))
        };
        Self {
            zoom_factor: self.zoom_factor,
            start_index,
        }
    }

    pub fn affordances(&self, series_len: usize) -> PanAffordances {
        let start = self.start_index.min(self.max_start(series_len));
        PanAffordances {
            left: start > 0,
            right: start < self.max_start(series_len),
        }
    }
}
