use anyhow::Context;
use clap::Parser;
use std::process;
use subcatchment_server::cli::args::{Args, Commands};
use subcatchment_server::cli::commands;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result: anyhow::Result<()> = runtime.block_on(async {
        // Cancelled on Ctrl+C; the server drains in-flight requests and returns
        let cancellation_token = CancellationToken::new();
        let signal_token = cancellation_token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                signal_token.cancel();
            }
        });

        let command = match &args.command {
            Some(Commands::Serve(_)) => "serve",
            _ => "check",
        };
        commands::run(args, cancellation_token)
            .await
            .with_context(|| format!("{} command failed", command))
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Subcatchment Server - Climate Dashboard Data Backend");
    println!("====================================================");
    println!();
    println!("Serve subcatchment geometries, climate map data and time series");
    println!("to the dashboard frontend from a read-only data directory.");
    println!();
    println!("USAGE:");
    println!("    subcatchment-server <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    serve       Start the HTTP server (main command)");
    println!("    check       Report which data files are present");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Serve ./data on the default port 10000:");
    println!("    subcatchment-server serve");
    println!();
    println!("    # Serve a custom data root with map data caching:");
    println!("    subcatchment-server serve --data-root /srv/vecc/data --port 8080 --cache");
    println!();
    println!("    # Check data coverage as JSON:");
    println!("    subcatchment-server check --data-root /srv/vecc/data --format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    subcatchment-server <COMMAND> --help");
}
