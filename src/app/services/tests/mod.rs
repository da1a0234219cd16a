//! Shared test utilities and fixtures for the data services

use crate::config::Config;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub mod timeseries_tests;

/// Two-feature FeatureCollection with SC_IDs "A" and "B"
pub const TWO_FEATURE_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"SC_ID": "A", "NAME": "upper"}, "geometry": {"type": "Point", "coordinates": [-70.1, -33.4]}},
    {"type": "Feature", "properties": {"SC_ID": "B", "NAME": "lower"}, "geometry": {"type": "Point", "coordinates": [-70.5, -33.6]}}
  ]
}"#;

/// Write a map data CSV under `<root>/<scenario>/<variable>/`
pub fn write_mapdata_csv(
    mapdata_root: &Path,
    scenario: &str,
    variable: &str,
    year: &str,
    content: &str,
) -> std::io::Result<PathBuf> {
    let dir = mapdata_root.join(scenario).join(variable);
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}_{}_all_subcatchments.csv", variable, year));
    fs::write(&path, content)?;
    Ok(path)
}

/// Write a time series CSV under `<root>/<scenario>/<variable>/`
pub fn write_timeseries_csv(
    timeseries_root: &Path,
    scenario: &str,
    variable: &str,
    sc_id: &str,
    content: &str,
) -> std::io::Result<PathBuf> {
    let dir = timeseries_root.join(scenario).join(variable);
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}_{}.csv", variable, sc_id));
    fs::write(&path, content)?;
    Ok(path)
}

/// Create an empty data tree and a config pointing at it
pub fn create_test_data_tree(temp_dir: &TempDir) -> std::io::Result<Config> {
    let config = Config::default().with_data_root(temp_dir.path());
    fs::create_dir_all(&config.data.geojson_dir)?;
    fs::create_dir_all(&config.data.mapdata_dir)?;
    fs::create_dir_all(&config.data.timeseries_dir)?;
    Ok(config)
}

/// Data tree with `vector_2025.geojson` and `ssp126/pr` values for SC_ID "A"
pub fn create_joined_fixture(temp_dir: &TempDir) -> std::io::Result<Config> {
    let config = create_test_data_tree(temp_dir)?;
    fs::write(
        config.data.geojson_dir.join("vector_2025.geojson"),
        TWO_FEATURE_GEOJSON,
    )?;
    write_mapdata_csv(
        &config.data.mapdata_dir,
        "ssp126",
        "pr",
        "2025",
        "SC_ID,pr\nA,1.5\n",
    )?;
    Ok(config)
}
