//! Subcatchment Data Server Library
//!
//! A read-only data backend for a geographic climate dashboard. It serves
//! subcatchment geometries, per-year map values joined onto those
//! geometries, and per-subcatchment time series from a directory tree
//! produced by an upstream simulation pipeline.
//!
//! This library provides tools for:
//! - Loading SC_ID → value datasets from map data CSVs
//! - Joining scalar values onto GeoJSON features by SC_ID
//! - Serving raw time series CSVs
//! - An optional read-through cache invalidated by file modification time
//! - An axum router exposing the dashboard API

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Core application modules
pub mod app {
    pub mod services {
        pub mod dataset_cache;
        pub mod geometry_join;
        pub mod join_service;
        pub mod mapdata_loader;
        pub mod timeseries;

        #[cfg(test)]
        pub mod tests;
    }
    pub mod http;
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::http::{AppState, build_router};
pub use app::services::join_service::JoinService;
pub use config::Config;
pub use error::{Result, ServiceError};
pub use models::{DatasetKey, ScalarDataset, SeriesKey};
