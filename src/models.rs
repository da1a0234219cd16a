//! Core data structures for subcatchment data lookups.
//!
//! Defines the request keys used to resolve files in the data roots and
//! the scalar dataset produced by the map data loader.

use crate::constants::{mapdata_filename, timeseries_filename, vector_filename};
use crate::error::{Result, ServiceError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Reject path segments that could leave the directory they are joined onto
pub fn validate_segment(segment: &str) -> Result<()> {
    let escapes = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(&['/', '\\', '\0'][..]);
    if escapes {
        return Err(ServiceError::InvalidSegment {
            segment: segment.to_string(),
        });
    }
    Ok(())
}

/// Identifies one map dataset: a scenario, variable and year
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetKey {
    pub scenario: String,
    pub variable: String,
    pub year: String,
}

impl DatasetKey {
    /// Build a key, validating every segment
    pub fn new(
        scenario: impl Into<String>,
        variable: impl Into<String>,
        year: impl Into<String>,
    ) -> Result<Self> {
        let key = Self {
            scenario: scenario.into(),
            variable: variable.into(),
            year: year.into(),
        };
        validate_segment(&key.scenario)?;
        validate_segment(&key.variable)?;
        validate_segment(&key.year)?;
        Ok(key)
    }

    /// `<mapdata_root>/<scenario>/<variable>/<variable>_<year>_all_subcatchments.csv`
    pub fn mapdata_path(&self, mapdata_root: &Path) -> PathBuf {
        mapdata_root
            .join(&self.scenario)
            .join(&self.variable)
            .join(mapdata_filename(&self.variable, &self.year))
    }

    /// `<geojson_root>/vector_<year>.geojson`
    pub fn vector_path(&self, geojson_root: &Path) -> PathBuf {
        geojson_root.join(vector_filename(&self.year))
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.scenario, self.variable, self.year)
    }
}

/// Identifies one time series: a scenario, variable and subcatchment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub scenario: String,
    pub variable: String,
    pub sc_id: String,
}

impl SeriesKey {
    pub fn new(
        scenario: impl Into<String>,
        variable: impl Into<String>,
        sc_id: impl Into<String>,
    ) -> Result<Self> {
        let key = Self {
            scenario: scenario.into(),
            variable: variable.into(),
            sc_id: sc_id.into(),
        };
        validate_segment(&key.scenario)?;
        validate_segment(&key.variable)?;
        validate_segment(&key.sc_id)?;
        Ok(key)
    }

    /// `<timeseries_root>/<scenario>/<variable>/<variable>_<sc_id>.csv`
    pub fn timeseries_path(&self, timeseries_root: &Path) -> PathBuf {
        timeseries_root
            .join(&self.scenario)
            .join(&self.variable)
            .join(timeseries_filename(&self.variable, &self.sc_id))
    }
}

/// Scalar values for one map dataset, keyed by SC_ID
///
/// Serialises as a plain JSON object with keys in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScalarDataset {
    values: BTreeMap<String, f64>,
}

impl ScalarDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; a later insert for the same SC_ID replaces the earlier one
    pub fn insert(&mut self, sc_id: impl Into<String>, value: f64) {
        self.values.insert(sc_id.into(), value);
    }

    pub fn get(&self, sc_id: &str) -> Option<f64> {
        self.values.get(sc_id).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sc_ids(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl FromIterator<(String, f64)> for ScalarDataset {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_key_paths() {
        let key = DatasetKey::new("ssp126", "pr", "2025").unwrap();
        assert_eq!(
            key.mapdata_path(Path::new("/data/mapdata")),
            PathBuf::from("/data/mapdata/ssp126/pr/pr_2025_all_subcatchments.csv")
        );
        assert_eq!(
            key.vector_path(Path::new("/data/geojson")),
            PathBuf::from("/data/geojson/vector_2025.geojson")
        );
        assert_eq!(key.to_string(), "ssp126/pr/2025");
    }

    #[test]
    fn test_series_key_path() {
        let key = SeriesKey::new("ssp585", "et", "042").unwrap();
        assert_eq!(
            key.timeseries_path(Path::new("/data/timeseries")),
            PathBuf::from("/data/timeseries/ssp585/et/et_042.csv")
        );
    }

    #[test]
    fn test_rejects_escaping_segments() {
        assert!(DatasetKey::new("..", "pr", "2025").is_err());
        assert!(DatasetKey::new("ssp126", "", "2025").is_err());
        assert!(SeriesKey::new("ssp126", "pr", "a/b").is_err());
        assert!(SeriesKey::new("ssp126", "pr", "..\\secret").is_err());
        assert!(validate_segment("ssp126").is_ok());
        assert!(validate_segment("..pr").is_ok());
    }

    #[test]
    fn test_scalar_dataset_last_insert_wins() {
        let mut dataset = ScalarDataset::new();
        dataset.insert("A", 1.0);
        dataset.insert("B", 2.0);
        dataset.insert("A", 3.5);

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get("A"), Some(3.5));
        assert_eq!(dataset.get("C"), None);
        assert_eq!(dataset.sc_ids().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_scalar_dataset_serialises_as_object() {
        let dataset: ScalarDataset = vec![("B".to_string(), 2.0), ("A".to_string(), 1.5)]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&dataset).unwrap();
        assert_eq!(json, r#"{"A":1.5,"B":2.0}"#);
    }
}
