//! Error handling for subcatchment data operations.
//!
//! Provides error types with context for file resolution, CSV schema
//! checks, value parsing and geometry joins.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error in file '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Map data file not found: {path}")]
    MapDataNotFound { path: PathBuf },

    #[error("Expected column '{column}' not found in {path}")]
    SchemaMismatch { path: PathBuf, column: String },

    #[error("CSV file {path} is empty")]
    EmptyDataset { path: PathBuf },

    #[error("Required column '{column}' missing in {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("could not convert string to float: '{value}' (column '{column}', line {line})")]
    InvalidValue {
        column: String,
        value: String,
        line: u64,
    },

    #[error("Geometry file not found: {path}")]
    GeometryNotFound { path: PathBuf },

    #[error("Malformed geometry document: {reason}")]
    MalformedGeometry { reason: String },

    #[error("Time series data not found: {path}")]
    TimeSeriesNotFound { path: PathBuf },

    #[error("Invalid path segment: '{segment}'")]
    InvalidSegment { segment: String },

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ServiceError {
    /// Create a CSV error bound to the file being read
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed geometry error
    pub fn malformed_geometry(reason: impl Into<String>) -> Self {
        Self::MalformedGeometry {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Errors that mean "there is no data here" rather than "the data is broken"
    pub fn is_absent_data(&self) -> bool {
        matches!(
            self,
            Self::MapDataNotFound { .. } | Self::SchemaMismatch { .. } | Self::EmptyDataset { .. }
        )
    }

    /// Errors surfaced to HTTP clients as 404
    pub fn is_not_found(&self) -> bool {
        self.is_absent_data()
            || matches!(
                self,
                Self::GeometryNotFound { .. }
                    | Self::TimeSeriesNotFound { .. }
                    | Self::InvalidSegment { .. }
            )
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
