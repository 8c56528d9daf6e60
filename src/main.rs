//! Slotwatch - Unattended booking slot watcher
//!
#![doc = "Slotwatch - Unattended booking slot watcher"]
#![doc = "Main entry point for the slotwatch application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use slotwatch::cli::{Cli, Commands};
use slotwatch::commands;
use slotwatch::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(&cli);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Watch { dry_run, once } => {
            tracing::info!("Starting watch mode");
            if dry_run {
                tracing::info!("Dry run enabled, bookings will not be submitted");
            }
            if once {
                tracing::debug!("Single-cycle mode enabled");
            }

            commands::watch::run_watch(config, dry_run, once).await?;
            Ok(())
        }
        Commands::Check => {
            tracing::info!("Starting configuration check");
            commands::check::run_check(&config).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `--verbose` lowers the default level to debug and `--json-logs` swaps
/// the human-readable format for JSON lines. `RUST_LOG` still wins when
/// set.
fn init_tracing(cli: &Cli) {
    let default_directive = if cli.verbose {
        "slotwatch=debug"
    } else {
        "slotwatch=info"
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
