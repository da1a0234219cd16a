//! Join service: the entry point used by the HTTP handlers
//!
//! Wraps the blocking loaders in `spawn_blocking` so file reads and
//! parsing never stall the async executor. The service holds only
//! immutable paths and the optional cache, so clones are cheap and
//! requests share no mutable state beyond cached snapshots.

use super::dataset_cache::{CacheStats, MapDataCache};
use super::geometry_join::{join_scalar_values, load_vector_geometry};
use super::mapdata_loader::load_scalar_dataset;
use super::timeseries::read_time_series;
use crate::config::{Config, DataPaths};
use crate::constants::{SUBCATCHMENTS_FILENAME, joined_property_name};
use crate::error::{Result, ServiceError};
use crate::models::{DatasetKey, ScalarDataset, SeriesKey};
use serde_json::Value;
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::task;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct JoinService {
    paths: Arc<DataPaths>,
    cache: Option<Arc<MapDataCache>>,
}

impl JoinService {
    pub fn new(config: &Config) -> Self {
        let cache = config
            .cache
            .enabled
            .then(|| Arc::new(MapDataCache::new(config.cache.max_entries)));
        Self {
            paths: Arc::new(config.data.clone()),
            cache,
        }
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    /// Scalar dataset for a key; empty when the file or column is absent
    pub async fn map_data(&self, key: DatasetKey) -> Result<Arc<ScalarDataset>> {
        let service = self.clone();
        task::spawn_blocking(move || service.map_data_blocking(&key)).await?
    }

    /// Year geometry annotated with `{variable}_{year}` on every feature
    pub async fn joined_geometry(&self, key: DatasetKey) -> Result<Value> {
        let service = self.clone();
        task::spawn_blocking(move || {
            let mut document = load_vector_geometry(&service.paths.geojson_dir, &key)?;
            let dataset = service.map_data_blocking(&key)?;
            let property = joined_property_name(&key.variable, &key.year);
            let summary = join_scalar_values(&mut document, &dataset, &property)?;
            info!(
                "Joined {} onto {} features ({} without data)",
                property,
                summary.features,
                summary.unmatched()
            );
            Ok(document)
        })
        .await?
    }

    /// Raw bytes of a time series CSV
    pub async fn time_series(&self, key: SeriesKey) -> Result<Vec<u8>> {
        let paths = Arc::clone(&self.paths);
        task::spawn_blocking(move || read_time_series(&paths.timeseries_dir, &key)).await?
    }

    /// Raw bytes of the static subcatchment geometry file
    pub async fn subcatchments(&self) -> Result<Vec<u8>> {
        let path = self.paths.geojson_dir.join(SUBCATCHMENTS_FILENAME);
        debug!("Serving {}", path.display());
        task::spawn_blocking(move || {
            std::fs::read(&path).map_err(|e| match e.kind() {
                ErrorKind::NotFound => ServiceError::GeometryNotFound { path },
                _ => e.into(),
            })
        })
        .await?
    }

    fn map_data_blocking(&self, key: &DatasetKey) -> Result<Arc<ScalarDataset>> {
        match &self.cache {
            Some(cache) => cache.get_or_load(&self.paths.mapdata_dir, key),
            None => load_scalar_dataset(&self.paths.mapdata_dir, key).map(Arc::new),
        }
    }
}
