//! Geometry loading and the map data join
//!
//! Loads a year-specific GeoJSON FeatureCollection and annotates every
//! feature with the scalar value for its SC_ID under a `{variable}_{year}`
//! property. Features without a value receive `null`; none are dropped.

use crate::constants::SC_ID_COLUMN;
use crate::error::{Result, ServiceError};
use crate::models::{DatasetKey, ScalarDataset};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Outcome of a join, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JoinSummary {
    /// Features annotated (all of them)
    pub features: usize,
    /// Features whose SC_ID had a value
    pub matched: usize,
}

impl JoinSummary {
    pub fn unmatched(&self) -> usize {
        self.features - self.matched
    }
}

/// Read and parse a GeoJSON file; absence is reported as `GeometryNotFound`
pub fn load_geometry(path: &Path) -> Result<Value> {
    let content = match std::fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ServiceError::GeometryNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    debug!(
        "Parsing geometry document {} ({} bytes)",
        path.display(),
        content.len()
    );
    Ok(serde_json::from_slice(&content)?)
}

/// Load the year-specific geometry document for a key
pub fn load_vector_geometry(geojson_root: &Path, key: &DatasetKey) -> Result<Value> {
    let path = key.vector_path(geojson_root);
    debug!("GeoJSON file path: {}", path.display());
    load_geometry(&path)
}

/// Set `property` on every feature to its SC_ID's value, or `null`
pub fn join_scalar_values(
    document: &mut Value,
    dataset: &ScalarDataset,
    property: &str,
) -> Result<JoinSummary> {
    let features = document
        .get_mut("features")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| ServiceError::malformed_geometry("missing 'features' array"))?;

    let mut summary = JoinSummary::default();
    for (index, feature) in features.iter_mut().enumerate() {
        let properties = feature
            .get_mut("properties")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| {
                ServiceError::malformed_geometry(format!(
                    "feature {} has no 'properties' object",
                    index
                ))
            })?;

        // Null and boolean ids never match a CSV key; the feature still gets `null`
        let sc_id = match properties.get(SC_ID_COLUMN) {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            Some(Value::Null | Value::Bool(_)) => None,
            Some(other) => {
                return Err(ServiceError::malformed_geometry(format!(
                    "feature {} has a non-scalar {} property: {}",
                    index, SC_ID_COLUMN, other
                )));
            }
            None => {
                return Err(ServiceError::malformed_geometry(format!(
                    "feature {} has no '{}' property",
                    index, SC_ID_COLUMN
                )));
            }
        };

        let value = match sc_id.as_deref().and_then(|id| dataset.get(id)) {
            Some(value) => {
                summary.matched += 1;
                Value::from(value)
            }
            None => Value::Null,
        };
        properties.insert(property.to_string(), value);
        summary.features += 1;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_feature_document() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"SC_ID": "A"}, "geometry": null},
                {"type": "Feature", "properties": {"SC_ID": "B"}, "geometry": null}
            ]
        })
    }

    #[test]
    fn test_join_sets_value_or_null() {
        let mut document = two_feature_document();
        let mut dataset = ScalarDataset::new();
        dataset.insert("A", 1.5);

        let summary = join_scalar_values(&mut document, &dataset, "pr_2025").unwrap();

        assert_eq!(summary.features, 2);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.unmatched(), 1);
        assert_eq!(
            document["features"][0]["properties"],
            json!({"SC_ID": "A", "pr_2025": 1.5})
        );
        assert_eq!(
            document["features"][1]["properties"],
            json!({"SC_ID": "B", "pr_2025": null})
        );
    }

    #[test]
    fn test_numeric_sc_id_matches_text_key() {
        let mut document = json!({
            "features": [{"properties": {"SC_ID": 17}}]
        });
        let mut dataset = ScalarDataset::new();
        dataset.insert("17", 0.25);

        join_scalar_values(&mut document, &dataset, "et_2055").unwrap();
        assert_eq!(document["features"][0]["properties"]["et_2055"], json!(0.25));
    }

    #[test]
    fn test_null_and_boolean_sc_ids_join_as_null() {
        let mut document = json!({
            "features": [
                {"properties": {"SC_ID": "A"}},
                {"properties": {"SC_ID": null}},
                {"properties": {"SC_ID": true}}
            ]
        });
        let mut dataset = ScalarDataset::new();
        dataset.insert("A", 1.5);
        dataset.insert("true", 9.0);

        let summary = join_scalar_values(&mut document, &dataset, "pr_2025").unwrap();

        assert_eq!(summary.features, 3);
        assert_eq!(summary.matched, 1);
        assert_eq!(document["features"][0]["properties"]["pr_2025"], json!(1.5));
        assert_eq!(
            document["features"][1]["properties"],
            json!({"SC_ID": null, "pr_2025": null})
        );
        assert_eq!(
            document["features"][2]["properties"],
            json!({"SC_ID": true, "pr_2025": null})
        );
    }

    #[test]
    fn test_array_sc_id_is_malformed() {
        let mut document = json!({
            "features": [{"properties": {"SC_ID": ["A", "B"]}}]
        });
        let err = join_scalar_values(&mut document, &ScalarDataset::new(), "pr_2025").unwrap_err();
        assert!(matches!(err, ServiceError::MalformedGeometry { .. }));
    }

    #[test]
    fn test_missing_features_is_malformed() {
        let mut document = json!({"type": "FeatureCollection"});
        let err = join_scalar_values(&mut document, &ScalarDataset::new(), "pr_2025").unwrap_err();
        assert!(matches!(err, ServiceError::MalformedGeometry { .. }));
        assert!(err.to_string().contains("features"));
    }

    #[test]
    fn test_feature_without_sc_id_is_malformed() {
        let mut document = json!({
            "features": [{"properties": {"NAME": "upper basin"}}]
        });
        let err = join_scalar_values(&mut document, &ScalarDataset::new(), "pr_2025").unwrap_err();
        assert!(err.to_string().contains("SC_ID"));
    }

    #[test]
    fn test_empty_collection_joins_nothing() {
        let mut document = json!({"type": "FeatureCollection", "features": []});
        let summary =
            join_scalar_values(&mut document, &ScalarDataset::new(), "rh_1995").unwrap();
        assert_eq!(summary, JoinSummary::default());
    }
}
