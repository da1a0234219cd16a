//! Configuration management and validation.
//!
//! Provides the configuration structure injected at startup: filesystem
//! roots for geometries, map data and time series, listening address,
//! the optional map data cache, and logging. Configuration is layered:
//! defaults, then an optional TOML file, then CLI/environment overrides.

use crate::constants::{
    APP_NAME, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_DATA_ROOT, DEFAULT_HOST, DEFAULT_LOG_LEVEL,
    DEFAULT_PORT, GEOJSON_DIR_NAME, LOG_LEVELS, MAPDATA_DIR_NAME, TIMESERIES_DIR_NAME,
};
use crate::error::{Result, ServiceError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Filesystem roots populated by the upstream pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    /// Directory holding subcatchments.geojson and vector_<year>.geojson
    pub geojson_dir: PathBuf,

    /// Root of <scenario>/<variable>/<variable>_<year>_all_subcatchments.csv
    pub mapdata_dir: PathBuf,

    /// Root of <scenario>/<variable>/<variable>_<sc_id>.csv
    pub timeseries_dir: PathBuf,
}

impl DataPaths {
    /// Derive all three roots from a single data directory
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            geojson_dir: root.join(GEOJSON_DIR_NAME),
            mapdata_dir: root.join(MAPDATA_DIR_NAME),
            timeseries_dir: root.join(TIMESERIES_DIR_NAME),
        }
    }

    /// Iterate over (label, path) pairs
    pub fn entries(&self) -> [(&'static str, &Path); 3] {
        [
            ("geojson", self.geojson_dir.as_path()),
            ("mapdata", self.mapdata_dir.as_path()),
            ("timeseries", self.timeseries_dir.as_path()),
        ]
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::from_root(DEFAULT_DATA_ROOT)
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Read-through cache for parsed map datasets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Disabled by default: every request re-reads its CSV
    pub enabled: bool,

    /// Maximum number of (scenario, variable, year) datasets kept
    pub max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataPaths,
    pub server: ServerSettings,
    pub cache: CacheSettings,
    pub logging: LoggingSettings,

    /// File the settings were read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Default config file location (~/.config/subcatchment-server/config.toml on Linux)
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_NAME).join("config.toml"))
            .ok_or_else(|| ServiceError::configuration("Could not determine config directory"))
    }

    /// Parse a TOML configuration file; missing sections fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ServiceError::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            ServiceError::configuration(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load defaults, then the config file if one is given
    ///
    /// CLI and environment overrides are applied afterwards by the caller.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self {
                    source: Some(path.to_path_buf()),
                    ..Self::from_file(path)?
                }
            }
            None => Self::default(),
        };
        Ok(config)
    }

    /// Point all data roots at `<root>/{geojson,mapdata,timeseries}`
    pub fn with_data_root(mut self, root: impl AsRef<Path>) -> Self {
        self.data = DataPaths::from_root(root);
        self
    }

    /// Enable the map data cache with the given capacity
    pub fn with_cache(mut self, max_entries: usize) -> Self {
        self.cache.enabled = true;
        self.cache.max_entries = max_entries;
        self
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Validate settings; missing data directories only warn
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(ServiceError::configuration("Server host must not be empty"));
        }

        if self.cache.enabled && self.cache.max_entries == 0 {
            return Err(ServiceError::configuration(
                "Cache max_entries must be greater than zero when the cache is enabled",
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ServiceError::configuration(format!(
                "Unknown log level '{}' (expected one of: {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        for (label, path) in self.data.entries() {
            if !path.is_dir() {
                warn!("{} directory does not exist: {}", label, path.display());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 10000);
        assert_eq!(config.bind_address(), "0.0.0.0:10000");
        assert!(!config.cache.enabled);
        assert_eq!(config.data.mapdata_dir, PathBuf::from("data").join("mapdata"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_data_root() {
        let config = Config::default().with_data_root("/srv/vecc");
        assert_eq!(config.data.geojson_dir, PathBuf::from("/srv/vecc/geojson"));
        assert_eq!(config.data.mapdata_dir, PathBuf::from("/srv/vecc/mapdata"));
        assert_eq!(
            config.data.timeseries_dir,
            PathBuf::from("/srv/vecc/timeseries")
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8080

[cache]
enabled = true
"#,
        )
        .unwrap();

        let config = Config::load_layered(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.max_entries, 64);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();

        match Config::load_layered(Some(&path)) {
            Err(ServiceError::Configuration { message }) => {
                assert!(message.contains("Failed to parse"));
            }
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let zero_cache = Config::default().with_cache(0);
        assert!(zero_cache.validate().is_err());

        let mut bad_level = Config::default();
        bad_level.logging.level = "loud".to_string();
        assert!(bad_level.validate().is_err());

        let mut empty_host = Config::default();
        empty_host.server.host = "  ".to_string();
        assert!(empty_host.validate().is_err());
    }
}
