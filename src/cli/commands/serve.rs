//! Serve command implementation
//!
//! Loads configuration, initialises logging, binds the listener and runs
//! the router until the cancellation token fires.

use super::shared::{load_configuration, log_config_source, setup_logging};
use crate::app::http::{AppState, build_router};
use crate::cli::args::ServeArgs;
use crate::error::{Result, ServiceError};
use colored::*;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Serve command runner
pub async fn run_serve(args: ServeArgs, cancellation_token: CancellationToken) -> Result<()> {
    let mut config = load_configuration(&args.data)?;
    args.apply_overrides(&mut config);

    setup_logging(&config.logging.level, args.quiet)?;
    log_config_source(&config);
    debug!("Loaded configuration: {:?}", config);
    config.validate()?;

    let state = AppState::new(&config);
    let app = build_router(state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await.map_err(|e| {
        ServiceError::configuration(format!("Failed to bind {}: {}", address, e))
    })?;

    if !args.quiet {
        println!(
            "{} listening on {}",
            "subcatchment-server".green().bold(),
            address.cyan()
        );
        for (label, path) in config.data.entries() {
            println!("  {:<11} {}", format!("{}:", label), path.display());
        }
        if config.cache.enabled {
            println!(
                "  {:<11} up to {} datasets",
                "cache:", config.cache.max_entries
            );
        }
    }
    info!("Server started on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancellation_token.cancelled().await })
        .await?;

    info!("Server stopped");
    Ok(())
}
