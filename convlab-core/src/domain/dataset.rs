//! Raw dataset: the static experiment export loaded once at startup.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One arm of the experiment as listed in the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVariation {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

impl RawVariation {
    /// String form of the id used as the key into the metric maps.
    ///
    /// An absent id is the control arm and maps to `"0"`.
    pub fn id_string(&self) -> String {
        self.id.unwrap_or(0).to_string()
    }
}

/// Visits and conversions for one calendar day, keyed by variation id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDailyRecord {
    pub date: String,
    #[serde(default)]
    pub visits: BTreeMap<String, Option<u64>>,
    #[serde(default)]
    pub conversions: BTreeMap<String, Option<u64>>,
}

impl RawDailyRecord {
    /// Visits for a variation; absent and null entries are `None`.
    pub fn visits_for(&self, id: &str) -> Option<u64> {
        self.visits.get(id).copied().flatten()
    }

    /// Conversions for a variation; absent and null entries are `None`.
    pub fn conversions_for(&self, id: &str) -> Option<u64> {
        self.conversions.get(id).copied().flatten()
    }
}

/// The complete export: variation list plus daily records.
///
/// Records are assumed, but not required, to be date-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDataset {
    #[serde(default)]
    pub variations: Vec<RawVariation>,
    #[serde(default)]
    pub data: Vec<RawDailyRecord>,
}

impl RawDataset {
    /// Parse a dataset from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a dataset from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Number of daily records.
    pub fn record_count(&self) -> usize {
        self.data.len()
    }

    /// Dates that appear on more than one record, in first-seen order.
    pub fn duplicate_dates(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();
        for record in &self.data {
            let count = counts.entry(record.date.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(record.date.clone());
            }
        }
        order
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "variations": [{"name": "Original"}, {"id": 10001, "name": "Variation A"}],
        "data": [
            {"date": "2025-01-01", "visits": {"0": 100, "10001": 90}, "conversions": {"0": 10, "10001": null}},
            {"date": "2025-01-02", "visits": {"0": 80}, "conversions": {}}
        ]
    }"#;

    #[test]
    fn parses_optional_ids_and_null_metrics() {
        let dataset = RawDataset::from_json_str(SAMPLE).unwrap();
        assert_eq!(dataset.variations.len(), 2);
        assert_eq!(dataset.variations[0].id_string(), "0");
        assert_eq!(dataset.variations[1].id_string(), "10001");

        let day = &dataset.data[0];
        assert_eq!(day.visits_for("10001"), Some(90));
        assert_eq!(day.conversions_for("10001"), None);
        assert_eq!(dataset.data[1].conversions_for("0"), None);
        assert_eq!(dataset.data[1].visits_for("missing"), None);
    }

    #[test]
    fn negative_variation_id_is_kept_as_signed_key() {
        let json = r#"{
            "variations": [{"name": "Original"}, {"id": -1, "name": "Holdout"}],
            "data": [{"date": "2025-01-01", "visits": {"0": 50, "-1": 40}, "conversions": {"-1": 4}}]
        }"#;
        let dataset = RawDataset::from_json_str(json).unwrap();
        assert_eq!(dataset.variations[1].id, Some(-1));
        assert_eq!(dataset.variations[1].id_string(), "-1");
        assert_eq!(dataset.data[0].visits_for("-1"), Some(40));
        assert_eq!(dataset.data[0].conversions_for("-1"), Some(4));
    }

    #[test]
    fn rejects_negative_counts() {
        let json = r#"{"variations": [], "data": [{"date": "2025-01-01", "visits": {"0": -5}, "conversions": {}}]}"#;
        let err = RawDataset::from_json_str(json).unwrap_err();
        assert!(matches!(err, DatasetError::Json(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RawDataset::from_file(Path::new("/nonexistent/convlab/data.json")).unwrap_err();
        match err {
            DatasetError::Io { path, .. } => assert!(path.ends_with("data.json")),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_dates_are_listed_once() {
        let mut dataset = RawDataset::from_json_str(SAMPLE).unwrap();
        let first = dataset.data[0].clone();
        dataset.data.push(first.clone());
        dataset.data.push(first);

        assert_eq!(dataset.duplicate_dates(), vec!["2025-01-01".to_string()]);
    }

    #[test]
    fn empty_document_is_an_empty_dataset() {
        let dataset = RawDataset::from_json_str("{}").unwrap();
        assert_eq!(dataset.record_count(), 0);
        assert!(dataset.variations.is_empty());
    }
}
