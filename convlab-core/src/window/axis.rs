//! Y-axis domain and ticks for the visible window.

use serde::{Deserialize, Serialize};

use crate::domain::ProcessedPoint;

pub const TICK_STEP: i64 = 10;

/// Integer Y range in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YDomain {
    pub min: i64,
    pub max: i64,
}

impl Default for YDomain {
    fn default() -> Self {
        Self { min: 0, max: 100 }
    }
}

impl YDomain {
    /// Every 10 units from `floor(min / 10) * 10` up to `max` inclusive.
    pub fn ticks(&self) -> Vec<i64> {
        let first = self.min.div_euclid(TICK_STEP) * TICK_STEP;
        (0..)
            .map(|i| first + i * TICK_STEP)
            .take_while(|t| *t <= self.max)
            .collect()
    }

    pub fn bounds(&self) -> [f64; 2] {
        [self.min as f64, self.max as f64]
    }
}

/// Padded domain around the given rates: 10% below (never under 0) and
/// 10% above. `[0, 100]` when there is nothing to show.
pub fn y_domain<I>(values: I) -> YDomain
where
    I: IntoIterator<Item = f64>,
{
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return YDomain::default();
    }
    YDomain {
        min: ((min * 0.9).floor() as i64).max(0),
        max: (max * 1.1).ceil() as i64,
    }
}

/// Rates of the selected variations across a slice of points.
pub fn visible_values(points: &[ProcessedPoint], selected: &[String]) -> Vec<f64> {
    points
        .iter()
        .flat_map(|p| selected.iter().filter_map(move |id| p.rate(id)))
        .collect()
}
