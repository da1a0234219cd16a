//! Raw time series lookup
//!
//! Time series are served byte-for-byte; they are never parsed.

use crate::error::{Result, ServiceError};
use crate::models::SeriesKey;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Read the time series CSV for a key
pub fn read_time_series(timeseries_root: &Path, key: &SeriesKey) -> Result<Vec<u8>> {
    let path = key.timeseries_path(timeseries_root);
    debug!("Looking for file: {}", path.display());

    match std::fs::read(&path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ServiceError::TimeSeriesNotFound { path }),
        Err(e) => Err(e.into()),
    }
}
