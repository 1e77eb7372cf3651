//! Processed series: one conversion rate per variation per period.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Time-bucketing resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    /// Monday-anchored ISO week.
    Week,
}

impl Granularity {
    pub fn label(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Granularity::Day => Granularity::Week,
            Granularity::Week => Granularity::Day,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown granularity '{0}' (expected 'day' or 'week')")]
pub struct ParseGranularityError(pub String);

impl FromStr for Granularity {
    type Err = ParseGranularityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            other => Err(ParseGranularityError(other.to_string())),
        }
    }
}

/// Conversion rates for a single day or week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedPoint {
    /// Day mode: the record's date as given. Week mode: the Monday, `YYYY-MM-DD`.
    pub period_key: String,
    /// Rate in percent, two decimals, keyed by variation id.
    pub rates: BTreeMap<String, f64>,
}

impl ProcessedPoint {
    pub fn rate(&self, id: &str) -> Option<f64> {
        self.rates.get(id).copied()
    }

    /// Ids among `selected` that hold this point's highest rate.
    ///
    /// Empty unless at least two variations are selected; a single line has
    /// nothing to lead.
    pub fn leaders<'a>(&self, selected: &'a [String]) -> Vec<&'a str> {
        if selected.len() < 2 {
            return Vec::new();
        }
        let max = selected
            .iter()
            .filter_map(|id| self.rate(id))
            .fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Vec::new();
        }
        selected
            .iter()
            .filter(|id| self.rate(id) == Some(max))
            .map(String::as_str)
            .collect()
    }
}

/// Ordered sequence of processed points for one granularity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedSeries {
    pub granularity: Granularity,
    pub points: Vec<ProcessedPoint>,
}

impl ProcessedSeries {
    pub fn new(granularity: Granularity, points: Vec<ProcessedPoint>) -> Self {
        Self {
            granularity,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ProcessedPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessedPoint> {
        self.points.iter()
    }

    /// Period keys in series order.
    pub fn period_keys(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.period_key.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a ProcessedSeries {
    type Item = &'a ProcessedPoint;
    type IntoIter = std::slice::Iter<'a, ProcessedPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
