//! Aggregator: raw daily records to a per-period conversion-rate series.
//!
//! Day mode emits one point per record in input order. Week mode sums visits
//! and conversions per variation across every record in a Monday-anchored
//! week, then computes one rate from the totals (rate of sums, so busy days
//! weigh more than quiet ones). Weeks are emitted in ascending key order.

pub mod rate;
pub mod week;

use std::collections::BTreeMap;

use crate::domain::{
    Granularity, ProcessedPoint, ProcessedSeries, RawDailyRecord, RawDataset, VariationRegistry,
};

pub use rate::conversion_rate;
pub use week::{parse_record_date, week_key, week_start};

/// Aggregate a dataset using its own variation list.
pub fn aggregate(
    dataset: &RawDataset,
    granularity: Granularity,
) -> Result<ProcessedSeries, AggregateError> {
    let registry = VariationRegistry::from_raw(&dataset.variations);
    aggregate_with(dataset, &registry, granularity)
}

/// Aggregate a dataset against an already-built registry.
///
/// Metric entries for ids that are not in the registry are ignored.
pub fn aggregate_with(
    dataset: &RawDataset,
    registry: &VariationRegistry,
    granularity: Granularity,
) -> Result<ProcessedSeries, AggregateError> {
    let duplicates = dataset.duplicate_dates();
    if !duplicates.is_empty() {
        tracing::warn!(
            count = duplicates.len(),
            first = %duplicates[0],
            "dataset has duplicate dates; each record is counted"
        );
    }

    let points = match granularity {
        Granularity::Day => aggregate_days(dataset, registry)?,
        Granularity::Week => aggregate_weeks(dataset, registry)?,
    };

    tracing::debug!(
        %granularity,
        records = dataset.record_count(),
        points = points.len(),
        variations = registry.len(),
        "aggregated series"
    );

    Ok(ProcessedSeries::new(granularity, points))
}

fn aggregate_days(
    dataset: &RawDataset,
    registry: &VariationRegistry,
) -> Result<Vec<ProcessedPoint>, AggregateError> {
    dataset
        .data
        .iter()
        .enumerate()
        .map(|(index, record)| {
            check_date(index, record)?;
            let rates = registry
                .iter()
                .map(|v| {
                    let rate = conversion_rate(record.conversions_for(&v.id), record.visits_for(&v.id));
                    (v.id.clone(), rate)
                })
                .collect();
            Ok(ProcessedPoint {
                period_key: record.date.clone(),
                rates,
            })
        })
        .collect()
}

/// Summed counts for one variation in one week.
#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    visits: u64,
    conversions: u64,
}

fn aggregate_weeks(
    dataset: &RawDataset,
    registry: &VariationRegistry,
) -> Result<Vec<ProcessedPoint>, AggregateError> {
    // `YYYY-MM-DD` keys sort chronologically.
    let mut buckets: BTreeMap<String, BTreeMap<&str, Totals>> = BTreeMap::new();

    for (index, record) in dataset.data.iter().enumerate() {
        let date = check_date(index, record)?;
        let bucket = buckets.entry(week_key(date)).or_default();
        for v in registry.iter() {
            let totals = bucket.entry(v.id.as_str()).or_default();
            totals.visits = totals
                .visits
                .saturating_add(record.visits_for(&v.id).unwrap_or(0));
            totals.conversions = totals
                .conversions
                .saturating_add(record.conversions_for(&v.id).unwrap_or(0));
        }
    }

    Ok(buckets
        .into_iter()
        .map(|(period_key, totals)| ProcessedPoint {
            period_key,
            rates: totals
                .into_iter()
                .map(|(id, t)| (id.to_string(), conversion_rate(Some(t.conversions), Some(t.visits))))
                .collect(),
        })
        .collect())
}

fn check_date(index: usize, record: &RawDailyRecord) -> Result<chrono::NaiveDate, AggregateError> {
    parse_record_date(&record.date).ok_or_else(|| AggregateError::MalformedDate {
        index,
        date: record.date.clone(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error("Malformed date '{date}' in record {index}")]
    MalformedDate { index: usize, date: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RawDailyRecord, RawVariation};

    fn variations() -> Vec<RawVariation> {
        vec![
            RawVariation { id: None, name: "Original".into() },
            RawVariation { id: Some(1), name: "Variation A".into() },
        ]
    }

    fn record(date: &str, visits: &[(&str, u64)], conversions: &[(&str, u64)]) -> RawDailyRecord {
        RawDailyRecord {
            date: date.into(),
            visits: visits.iter().map(|(k, v)| (k.to_string(), Some(*v))).collect(),
            conversions: conversions.iter().map(|(k, v)| (k.to_string(), Some(*v))).collect(),
        }
    }

    fn dataset(data: Vec<RawDailyRecord>) -> RawDataset {
        RawDataset { variations: variations(), data }
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let ds = dataset(vec![]);
        assert!(aggregate(&ds, Granularity::Day).unwrap().is_empty());
        assert!(aggregate(&ds, Granularity::Week).unwrap().is_empty());
    }

    #[test]
    fn day_mode_preserves_input_order_and_keys() {
        let ds = dataset(vec![
            record("2025-01-03", &[("0", 100)], &[("0", 5)]),
            record("2025-01-01", &[("0", 200)], &[("0", 50)]),
        ]);
        let series = aggregate(&ds, Granularity::Day).unwrap();

        assert_eq!(series.period_keys(), vec!["2025-01-03", "2025-01-01"]);
        assert_eq!(series.points[0].rate("0"), Some(5.0));
        assert_eq!(series.points[1].rate("0"), Some(25.0));
    }

    #[test]
    fn day_mode_defaults_missing_metrics_to_zero() {
        let ds = dataset(vec![record("2025-01-01", &[("0", 100)], &[])]);
        let series = aggregate(&ds, Granularity::Day).unwrap();

        assert_eq!(series.points[0].rate("0"), Some(0.0));
        assert_eq!(series.points[0].rate("1"), Some(0.0));
    }

    #[test]
    fn unknown_variation_ids_are_ignored() {
        let ds = dataset(vec![record("2025-01-01", &[("0", 10), ("999", 10)], &[("999", 5)])]);
        let series = aggregate(&ds, Granularity::Day).unwrap();

        assert_eq!(series.points[0].rates.len(), 2);
        assert_eq!(series.points[0].rate("999"), None);
    }

    #[test]
    fn week_mode_is_rate_of_sums() {
        // Mon + Tue of the same week with skewed traffic.
        let ds = dataset(vec![
            record("2025-01-06", &[("0", 100)], &[("0", 10)]),
            record("2025-01-07", &[("0", 900)], &[("0", 1)]),
        ]);
        let series = aggregate(&ds, Granularity::Week).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].period_key, "2025-01-06");
        assert_eq!(series.points[0].rate("0"), Some(1.1));
    }

    #[test]
    fn week_mode_sorts_buckets_regardless_of_input_order() {
        let ds = dataset(vec![
            record("2025-01-15", &[("0", 10)], &[("0", 1)]),
            record("2025-01-01", &[("0", 10)], &[("0", 2)]),
            record("2025-01-08", &[("0", 10)], &[("0", 3)]),
            record("2025-01-14", &[("0", 10)], &[("0", 1)]),
        ]);
        let series = aggregate(&ds, Granularity::Week).unwrap();

        assert_eq!(series.period_keys(), vec!["2024-12-30", "2025-01-06", "2025-01-13"]);
        assert_eq!(series.points[2].rate("0"), Some(10.0));
    }

    #[test]
    fn week_mode_counts_duplicate_dates_twice() {
        let day = record("2025-01-06", &[("0", 100)], &[("0", 10)]);
        let ds = dataset(vec![
            day.clone(),
            day,
            record("2025-01-07", &[("0", 200)], &[("0", 0)]),
        ]);
        let week = aggregate(&ds, Granularity::Week).unwrap();
        // (10 + 10 + 0) / (100 + 100 + 200)
        assert_eq!(week.points[0].rate("0"), Some(5.0));

        let days = aggregate(&ds, Granularity::Day).unwrap();
        assert_eq!(days.len(), 3);
    }

    #[test]
    fn malformed_date_aborts_in_both_modes() {
        let ds = dataset(vec![
            record("2025-01-06", &[("0", 1)], &[]),
            record("not-a-date", &[("0", 1)], &[]),
        ]);
        let expected = AggregateError::MalformedDate {
            index: 1,
            date: "not-a-date".into(),
        };
        assert_eq!(aggregate(&ds, Granularity::Day).unwrap_err(), expected);
        assert_eq!(aggregate(&ds, Granularity::Week).unwrap_err(), expected);
    }

    #[test]
    fn aggregation_is_pure() {
        let ds = dataset(vec![
            record("2025-01-06", &[("0", 30), ("1", 40)], &[("0", 3), ("1", 8)]),
            record("2025-01-07", &[("0", 30), ("1", 40)], &[("0", 1), ("1", 2)]),
        ]);
        let a = aggregate(&ds, Granularity::Day).unwrap();
        let b = aggregate(&ds, Granularity::Day).unwrap();
        assert_eq!(a, b);
    }
}
