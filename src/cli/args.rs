//! Command-line argument definitions for the subcatchment data server
//!
//! This module defines the CLI interface using the clap derive API. Every
//! path and listener option can also be supplied through a
//! `SUBCATCHMENT_*` environment variable.

use crate::config::{Config, DataPaths};
use crate::error::{Result, ServiceError};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the subcatchment data server
///
/// Serves subcatchment geometries, climate map data and time series to the
/// dashboard frontend from a read-only data directory.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "subcatchment-server",
    version,
    about = "Serve subcatchment geometries, climate map data and time series over HTTP",
    long_about = "A read-only HTTP backend for the subcatchment climate dashboard. Reads GeoJSON \
                  geometries and simulation CSVs produced by the upstream pipeline and joins map \
                  values onto geometry features by SC_ID."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Report which data files are present in the data directories
    Check(CheckArgs),
}

/// Data directory and config file options shared by all commands
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct DataArgs {
    /// Data root containing geojson/, mapdata/ and timeseries/
    #[arg(
        short = 'd',
        long = "data-root",
        value_name = "PATH",
        env = "SUBCATCHMENT_DATA_ROOT",
        help = "Data root containing geojson/, mapdata/ and timeseries/"
    )]
    pub data_root: Option<PathBuf>,

    /// Directory with subcatchments.geojson and vector_<year>.geojson
    #[arg(long = "geojson-dir", value_name = "PATH", env = "SUBCATCHMENT_GEOJSON_DIR")]
    pub geojson_dir: Option<PathBuf>,

    /// Root of <scenario>/<variable>/<variable>_<year>_all_subcatchments.csv
    #[arg(long = "mapdata-dir", value_name = "PATH", env = "SUBCATCHMENT_MAPDATA_DIR")]
    pub mapdata_dir: Option<PathBuf>,

    /// Root of <scenario>/<variable>/<variable>_<sc_id>.csv
    #[arg(
        long = "timeseries-dir",
        value_name = "PATH",
        env = "SUBCATCHMENT_TIMESERIES_DIR"
    )]
    pub timeseries_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// ~/.config/subcatchment-server/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        env = "SUBCATCHMENT_CONFIG",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,
}

impl DataArgs {
    /// Apply directory overrides; specific directories win over --data-root
    pub fn apply(&self, data: &mut DataPaths) {
        if let Some(root) = &self.data_root {
            *data = DataPaths::from_root(root);
        }
        if let Some(dir) = &self.geojson_dir {
            data.geojson_dir = dir.clone();
        }
        if let Some(dir) = &self.mapdata_dir {
            data.mapdata_dir = dir.clone();
        }
        if let Some(dir) = &self.timeseries_dir {
            data.timeseries_dir = dir.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.is_file() {
                return Err(ServiceError::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }
        Ok(())
    }
}

/// Arguments for the serve command
#[derive(Debug, Clone, Parser)]
pub struct ServeArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Address to bind
    #[arg(long = "host", value_name = "HOST", env = "SUBCATCHMENT_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(
        short = 'p',
        long = "port",
        value_name = "PORT",
        env = "SUBCATCHMENT_PORT"
    )]
    pub port: Option<u16>,

    /// Cache parsed map data between requests
    ///
    /// Entries are re-read when the source CSV's modification time changes.
    #[arg(long = "cache", help = "Cache parsed map data between requests")]
    pub cache: bool,

    /// Maximum number of cached map datasets
    #[arg(long = "cache-entries", value_name = "COUNT")]
    pub cache_entries: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl ServeArgs {
    /// Apply CLI overrides on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        self.data.apply(&mut config.data);

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.cache {
            config.cache.enabled = true;
        }
        if let Some(entries) = self.cache_entries {
            config.cache.max_entries = entries;
        }
        if self.verbose > 0 || self.quiet {
            config.logging.level = self.get_log_level().to_string();
        }
    }

    /// Get the log level based on verbosity settings
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Arguments for the check command
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output format for the report
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the data report"
    )]
    pub output_format: OutputFormat,

    /// Enable verbose logging output
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Enable verbose logging (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

impl CheckArgs {
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Output format options for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}
