//! Tests for raw time series lookup

use super::*;
use crate::app::services::timeseries::read_time_series;
use crate::error::ServiceError;
use crate::models::SeriesKey;
use tempfile::TempDir;

#[test]
fn test_time_series_returned_unmodified() {
    let temp_dir = TempDir::new().unwrap();
    let content = "date,pr\r\n2025-01-01,3.2\r\n2025-01-02,0.0\r\n";
    write_timeseries_csv(temp_dir.path(), "ssp126", "pr", "042", content).unwrap();

    let key = SeriesKey::new("ssp126", "pr", "042").unwrap();
    let bytes = read_time_series(temp_dir.path(), &key).unwrap();

    assert_eq!(bytes, content.as_bytes());
}

#[test]
fn test_missing_time_series_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let key = SeriesKey::new("ssp126", "pr", "000").unwrap();

    match read_time_series(temp_dir.path(), &key) {
        Err(ServiceError::TimeSeriesNotFound { path }) => {
            assert!(path.ends_with("ssp126/pr/pr_000.csv"));
        }
        other => panic!("Expected TimeSeriesNotFound, got {:?}", other),
    }
}
