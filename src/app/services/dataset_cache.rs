//! Optional read-through cache for parsed map datasets
//!
//! Entries are keyed by (scenario, variable, year) and hold the source
//! file's modification time alongside an immutable `Arc<ScalarDataset>`.
//! Every lookup stats the file, so an updated CSV is re-parsed on the next
//! request. Errors are never cached.

use super::mapdata_loader::load_scalar_dataset;
use crate::error::Result;
use crate::models::{DatasetKey, ScalarDataset};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;
use tracing::debug;

#[derive(Debug, Clone)]
struct CachedDataset {
    modified: SystemTime,
    inserted: u64,
    dataset: Arc<ScalarDataset>,
}

/// Cache statistics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug)]
pub struct MapDataCache {
    max_entries: usize,
    entries: RwLock<HashMap<DatasetKey, CachedDataset>>,
    insertions: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MapDataCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries: max_entries.max(1),
            entries: RwLock::new(HashMap::new()),
            insertions: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached dataset if the file is unchanged, otherwise reload it
    pub fn get_or_load(&self, mapdata_root: &Path, key: &DatasetKey) -> Result<Arc<ScalarDataset>> {
        let path = key.mapdata_path(mapdata_root);
        let modified = match std::fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.remove(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                return load_scalar_dataset(mapdata_root, key).map(Arc::new);
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(dataset) = self.lookup(key, modified) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Map data cache hit for {}", key);
            return Ok(dataset);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let dataset = Arc::new(load_scalar_dataset(mapdata_root, key)?);
        self.store(key.clone(), modified, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.read_entries().len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn lookup(&self, key: &DatasetKey, modified: SystemTime) -> Option<Arc<ScalarDataset>> {
        self.read_entries()
            .get(key)
            .filter(|entry| entry.modified == modified)
            .map(|entry| Arc::clone(&entry.dataset))
    }

    fn store(&self, key: DatasetKey, modified: SystemTime, dataset: Arc<ScalarDataset>) {
        let inserted = self.insertions.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                debug!("Evicting map data cache entry {}", oldest);
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            CachedDataset {
                modified,
                inserted,
                dataset,
            },
        );
    }

    fn remove(&self, key: &DatasetKey) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    fn read_entries(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<DatasetKey, CachedDataset>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }
}
