//! Shared components for CLI commands
//!
//! Logging setup and layered configuration loading used by every command.

use crate::cli::args::DataArgs;
use crate::config::Config;
use crate::constants::APP_NAME;
use crate::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence; otherwise `subcatchment_server=<level>` and
/// `tower_http=<level>` are enabled.
pub fn setup_logging(level: &str, compact: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("subcatchment_server={},tower_http={}", level, level))
    });

    if compact {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }

    debug!("Logging initialized at level: {}", level);
    Ok(())
}

/// Resolve the config file: explicit path, else the default location if it exists
pub fn resolve_config_file(data_args: &DataArgs) -> Option<PathBuf> {
    match &data_args.config_file {
        Some(path) => Some(path.clone()),
        None => Config::default_config_path()
            .ok()
            .filter(|path| path.is_file()),
    }
}

/// Load configuration using layered approach (defaults -> file); callers apply CLI overrides
pub fn load_configuration(data_args: &DataArgs) -> Result<Config> {
    data_args.validate()?;

    let config_file = resolve_config_file(data_args);
    let mut config = Config::load_layered(config_file.as_deref())?;
    data_args.apply(&mut config.data);
    Ok(config)
}

/// Report where the configuration came from; call after `setup_logging`
pub fn log_config_source(config: &Config) {
    match &config.source {
        Some(path) => info!("Using config file: {}", path.display()),
        None => info!(
            "No config file found for {}, using defaults and command line options",
            APP_NAME
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_configuration_applies_data_root_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "[data]\ngeojson_dir = \"/from/file/geojson\"\n\n[server]\nport = 9000\n",
        )
        .unwrap();

        let data_args = DataArgs {
            data_root: Some(temp_dir.path().to_path_buf()),
            config_file: Some(config_path),
            ..DataArgs::default()
        };

        let config = load_configuration(&data_args).unwrap();
        assert_eq!(config.source, data_args.config_file);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.data.geojson_dir, temp_dir.path().join("geojson"));
    }

    #[test]
    fn test_explicit_config_file_is_resolved() {
        let data_args = DataArgs {
            config_file: Some(PathBuf::from("/etc/subcatchment/config.toml")),
            ..DataArgs::default()
        };
        assert_eq!(
            resolve_config_file(&data_args),
            Some(PathBuf::from("/etc/subcatchment/config.toml"))
        );
    }
}
