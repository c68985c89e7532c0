//! Lectern CLI - static documentation site generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "Static documentation site generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to lectern.toml config file
    #[arg(short, long, default_value = lectern_config::CONFIG_FILE)]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new documentation site
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Start development server with live reload
    Dev {
        /// Port to listen on
        #[arg(short, long, default_value = "5173")]
        port: u16,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Build the static site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Serve the built site under its base path
    Preview {
        /// Port to listen on
        #[arg(short, long, default_value = "4173")]
        port: u16,

        /// Directory to serve (defaults to the configured output directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Open browser
        #[arg(long)]
        open: bool,
    },

    /// Validate the configuration without building
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
        Commands::Dev { port, no_open } => {
            commands::dev::run(&cli.config, port, !no_open).await?;
        }
        Commands::Build { out, no_minify } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&cli.config, out, minify).await?;
        }
        Commands::Preview { port, dir, open } => {
            commands::preview::run(&cli.config, port, dir, open).await?;
        }
        Commands::Check => {
            commands::check::run(&cli.config)?;
        }
    }

    Ok(())
}
