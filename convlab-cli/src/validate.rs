//! Pre-flight checks for an export.

use std::collections::HashMap;
use std::io::Write;

use anyhow::Result;

use convlab_core::aggregate::parse_record_date;
use convlab_core::{RawDataset, VariationRegistry};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub records: usize,
    pub variations: usize,
    /// `(record index, date as given)`.
    pub malformed_dates: Vec<(usize, String)>,
    pub duplicate_dates: Vec<String>,
    pub duplicate_variation_ids: Vec<String>,
    /// `(date, variation id)` where conversions exceed a nonzero visit count
    /// for a listed variation, i.e. where the aggregator caps the rate.
    pub over_visits: Vec<(String, String)>,
}

impl ValidationReport {
    pub fn from_dataset(dataset: &RawDataset) -> Self {
        let malformed_dates = dataset
            .data
            .iter()
            .enumerate()
            .filter(|(_, r)| parse_record_date(&r.date).is_none())
            .map(|(i, r)| (i, r.date.clone()))
            .collect();

        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut duplicate_variation_ids = Vec::new();
        for v in &dataset.variations {
            let id = v.id_string();
            let count = seen.entry(id.clone()).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicate_variation_ids.push(id);
            }
        }

        let registry = VariationRegistry::from_raw(&dataset.variations);
        let mut over_visits = Vec::new();
        for record in &dataset.data {
            for variation in registry.iter() {
                let visits = record.visits_for(&variation.id).unwrap_or(0);
                let conversions = record.conversions_for(&variation.id).unwrap_or(0);
                // Zero visits yields a rate of 0, nothing to cap.
                if visits > 0 && conversions > visits {
                    over_visits.push((record.date.clone(), variation.id.clone()));
                }
            }
        }

        Self {
            records: dataset.record_count(),
            variations: dataset.variations.len(),
            malformed_dates,
            duplicate_dates: dataset.duplicate_dates(),
            duplicate_variation_ids,
            over_visits,
        }
    }

    /// Only malformed dates make an export unusable; the rest are warnings.
    pub fn is_ok(&self) -> bool {
        self.malformed_dates.is_empty()
    }

    pub fn write_to<W: Write>(&self, mut w: W) -> Result<()> {
        writeln!(
            w,
            "{} record(s), {} variation(s)",
            self.records, self.variations
        )?;

        for (index, date) in &self.malformed_dates {
            writeln!(w, "error: record {index} has malformed date '{date}'")?;
        }
        for date in &self.duplicate_dates {
            writeln!(w, "warning: date {date} appears on more than one record")?;
        }
        for id in &self.duplicate_variation_ids {
            writeln!(w, "warning: variation id {id} is listed more than once; the later entry wins")?;
        }
        for (date, id) in &self.over_visits {
            writeln!(w, "warning: {date}: conversions exceed visits for variation {id}; rate capped at 100")?;
        }

        if self.is_ok() {
            writeln!(w, "ok")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
        "variations": [
            {"name": "Original"},
            {"id": 3, "name": "A"},
            {"id": 3, "name": "A (relaunch)"}
        ],
        "data": [
            {"date": "2025-02-03", "visits": {"0": 10, "3": 10}, "conversions": {"0": 2, "3": 12}},
            {"date": "2025-02-03", "visits": {"0": 10}, "conversions": {"0": 1}},
            {"date": "Feb 4", "visits": {}, "conversions": {}},
            {"date": "2025-02-05T09:30:00Z", "visits": {}, "conversions": {"0": null}}
        ]
    }"#;

    #[test]
    fn reports_every_problem() {
        let ds = RawDataset::from_json_str(EXPORT).unwrap();
        let report = ValidationReport::from_dataset(&ds);

        assert_eq!(report.records, 4);
        assert_eq!(report.malformed_dates, vec![(2, "Feb 4".to_string())]);
        assert_eq!(report.duplicate_dates, vec!["2025-02-03".to_string()]);
        assert_eq!(report.duplicate_variation_ids, vec!["3".to_string()]);
        assert_eq!(
            report.over_visits,
            vec![("2025-02-03".to_string(), "3".to_string())]
        );
        assert!(!report.is_ok());
    }

    #[test]
    fn zero_visits_and_unlisted_ids_are_not_capped() {
        let ds = RawDataset::from_json_str(
            r#"{"variations":[{"name":"Original"},{"id":4,"name":"B"}],
                "data":[
                    {"date":"2025-02-03","visits":{"0":0},"conversions":{"0":5,"999":3}},
                    {"date":"2025-02-04","visits":{"999":1},"conversions":{"4":2,"999":3}},
                    {"date":"2025-02-05","visits":{"4":1},"conversions":{"4":2}}
                ]}"#,
        )
        .unwrap();
        let report = ValidationReport::from_dataset(&ds);
        assert_eq!(
            report.over_visits,
            vec![("2025-02-05".to_string(), "4".to_string())]
        );

        let series = convlab_core::aggregate(&ds, convlab_core::Granularity::Day).unwrap();
        assert_eq!(series.points[0].rate("0"), Some(0.0));
        assert_eq!(series.points[1].rate("4"), Some(0.0));
        assert_eq!(series.points[2].rate("4"), Some(100.0));

        let mut buf = Vec::new();
        report.write_to(&mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out.matches("rate capped at 100").count(), 1);
        assert!(!out.contains("variation 999"));
    }

    #[test]
    fn clean_export_prints_ok() {
        let ds = RawDataset::from_json_str(
            r#"{"variations":[{"name":"Original"}],
                "data":[{"date":"2025-02-03","visits":{"0":5},"conversions":{"0":1}}]}"#,
        )
        .unwrap();
        let report = ValidationReport::from_dataset(&ds);
        assert!(report.is_ok());

        let mut buf = Vec::new();
        report.write_to(&mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "1 record(s), 1 variation(s)\nok\n");
    }
}
