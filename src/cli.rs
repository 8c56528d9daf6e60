//! Command-line interface definition for Slotwatch
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the watch loop and configuration checks.

use clap::{Parser, Subcommand};

/// Slotwatch - Unattended booking slot watcher
///
/// Polls a driving school's booking site for newly released practical
/// lesson slots, books the eligible ones, and reports over Telegram.
#[derive(Parser, Debug, Clone)]
#[command(name = "slotwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "SLOTWATCH_CONFIG", default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Slotwatch
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Watch the booking site and book eligible slots as they appear
    Watch {
        /// Report eligible slots without booking or notifying
        #[arg(long)]
        dry_run: bool,

        /// Run a single poll cycle and exit instead of looping
        #[arg(long)]
        once: bool,
    },

    /// Verify credentials and connectivity, then exit
    Check,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            json_logs: false,
            command: Commands::Watch {
                dry_run: false,
                once: false,
            },
        }
    }
}
