//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod config_cmd;
mod scan;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "pharmaudit")]
#[command(about = "Forensic verification of medicine packaging")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a photo or video of a medicine pack
    Scan {
        /// Image or video file to analyze
        file: PathBuf,
        /// Print the report as JSON instead of the dashboard
        #[arg(long)]
        json: bool,
    },

    /// Start the web interface
    Serve {
        /// Address to bind: "PORT", "HOST" or "HOST:PORT" (default from config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Show the effective configuration
    Config,
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load_with_override(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Scan { file, json } => scan::cmd_scan(&config, &file, json).await,
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            serve::cmd_serve(&config, &bind).await
        }
        Commands::Config => config_cmd::cmd_config_show(&config),
    }
}
