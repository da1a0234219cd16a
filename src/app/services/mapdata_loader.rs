//! Scalar dataset loading from per-year map data CSVs
//!
//! Each CSV holds one row per subcatchment with an `SC_ID` column and a
//! column named after the variable. Missing files, a missing variable
//! column and header-only files are reported as distinct errors by
//! [`read_scalar_dataset`]; [`load_scalar_dataset`] collapses them into an
//! empty dataset, which callers treat as "no data".

use crate::constants::SC_ID_COLUMN;
use crate::error::{Result, ServiceError};
use crate::models::{DatasetKey, ScalarDataset};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;
use tracing::{debug, warn};

/// Load the scalar dataset for a key, treating absent data as empty
pub fn load_scalar_dataset(mapdata_root: &Path, key: &DatasetKey) -> Result<ScalarDataset> {
    match read_scalar_dataset(mapdata_root, key) {
        Err(e) if e.is_absent_data() => {
            warn!("No map data for {}: {}", key, e);
            Ok(ScalarDataset::new())
        }
        other => other,
    }
}

/// Resolve and parse the map data CSV for a key
pub fn read_scalar_dataset(mapdata_root: &Path, key: &DatasetKey) -> Result<ScalarDataset> {
    let path = key.mapdata_path(mapdata_root);
    debug!("Resolving map data file: {}", path.display());

    if !path.is_file() {
        return Err(ServiceError::MapDataNotFound { path });
    }

    parse_scalar_csv(&path, &key.variable)
}

/// Parse `SC_ID` and `variable` columns of a CSV into a dataset
///
/// Later rows overwrite earlier rows with the same SC_ID. Rows may be
/// longer or shorter than the header; a row without the value field, or
/// with a value that is not a number, fails the whole file.
pub fn parse_scalar_csv(path: &Path, variable: &str) -> Result<ScalarDataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ServiceError::csv(path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| ServiceError::csv(path, e))?
        .clone();
    let mut records = reader.into_records();

    let first = match records.next() {
        Some(record) => record.map_err(|e| ServiceError::csv(path, e))?,
        None => {
            return Err(ServiceError::EmptyDataset {
                path: path.to_path_buf(),
            });
        }
    };

    debug!("Available columns in {}: {:?}", path.display(), headers);

    let value_index =
        column_index(&headers, variable).ok_or_else(|| ServiceError::SchemaMismatch {
            path: path.to_path_buf(),
            column: variable.to_string(),
        })?;
    let sc_id_index =
        column_index(&headers, SC_ID_COLUMN).ok_or_else(|| ServiceError::MissingColumn {
            path: path.to_path_buf(),
            column: SC_ID_COLUMN.to_string(),
        })?;

    let mut dataset = ScalarDataset::new();
    for record in std::iter::once(Ok(first)).chain(records) {
        let record = record.map_err(|e| ServiceError::csv(path, e))?;
        let sc_id = record.get(sc_id_index).unwrap_or_default();
        let raw = record.get(value_index).unwrap_or_default();
        let value = parse_value(raw).ok_or_else(|| ServiceError::InvalidValue {
            column: variable.to_string(),
            value: raw.to_string(),
            line: record.position().map(|p| p.line()).unwrap_or_default(),
        })?;
        dataset.insert(sc_id, value);
    }

    debug!(
        "Loaded {} subcatchment values from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

/// Position of a header, ignoring a UTF-8 byte order mark; a repeated name resolves to its last occurrence
fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, header)| header.trim_start_matches('\u{feff}') == name)
        .map(|(index, _)| index)
        .last()
}

fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}
