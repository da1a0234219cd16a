//! Command implementations for the subcatchment data server CLI
//!
//! Each command is implemented in its own module; shared setup such as
//! logging and layered configuration lives in `shared`.

pub mod check;
pub mod serve;
pub mod shared;

use crate::Result;
use crate::cli::args::{Args, Commands};
use tokio_util::sync::CancellationToken;

/// Main command runner
///
/// Dispatches to the appropriate subcommand handler:
/// - `serve`: run the HTTP server until the token is cancelled
/// - `check`: report data directory coverage
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<()> {
    match args.command {
        Some(Commands::Serve(serve_args)) => serve::run_serve(serve_args, cancellation_token).await,
        Some(Commands::Check(check_args)) => check::run_check(check_args).await.map(|_| ()),
        None => Ok(()),
    }
}
