//! Bulkload - bulk product import client
//!
//! Previews CSV and Excel product files locally, uploads them to the import
//! service and reports what was created, updated and rejected.

mod commands;
mod config;
mod progress;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::CommandContext;
use crate::config::Config;

#[derive(Parser)]
#[command(name = "bulkload")]
#[command(author = "Bulkload Team")]
#[command(version = bulkload_core::VERSION)]
#[command(about = "Preview and import product spreadsheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration profile
    #[arg(short, long, global = true, env = "BULKLOAD_PROFILE")]
    profile: Option<String>,

    /// Client settings file (replaces the profile's settings)
    #[arg(short, long, global = true, env = "BULKLOAD_CONFIG")]
    config: Option<String>,

    /// Import service endpoint (overrides the profile)
    #[arg(long, global = true, env = "BULKLOAD_ENDPOINT")]
    endpoint: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Only print results
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "BULKLOAD_LOG", default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the first rows of a CSV or Excel file
    Preview {
        /// File to preview
        file: PathBuf,
    },

    /// Upload a file to the import service
    Import {
        /// CSV or Excel file to import
        file: PathBuf,

        /// Directory the result file is saved into
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,

        /// Download the result file when the service produced one
        #[arg(long)]
        download: bool,
    },

    /// Download the result file of a previous import
    Download {
        /// Download id reported by the import
        id: String,

        /// Directory the result file is saved into
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,
    },

    /// Check that the import service is reachable
    Health,

    /// Manage configuration
    Configure {
        #[command(subcommand)]
        action: Option<ConfigureAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigureAction {
    /// Set a configuration value
    Set { key: String, value: String },

    /// Get a configuration value
    Get { key: String },

    /// List configuration values and profiles
    List,

    /// Create a profile with default settings
    AddProfile { name: String },

    /// Remove a profile
    RemoveProfile { name: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with results or the progress bar
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = Config::load(cli.profile.as_deref())?;
    let mut client_config = config.client_config(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        client_config.endpoint = endpoint;
    }
    debug!(
        endpoint = %client_config.endpoint,
        profile = cli.profile.as_deref().unwrap_or("default"),
        "Resolved configuration"
    );

    let ctx = CommandContext {
        config,
        client_config,
        profile: cli.profile,
        output_format: cli.output,
        quiet: cli.quiet,
    };

    let succeeded = match cli.command {
        Commands::Preview { file } => commands::preview::execute(&ctx, &file).await?,
        Commands::Import {
            file,
            output_dir,
            download,
        } => commands::import::execute(&ctx, &file, output_dir, download).await?,
        Commands::Download { id, output_dir } => {
            commands::download::execute(&ctx, &id, output_dir).await?
        }
        Commands::Health => commands::health::execute(&ctx).await?,
        Commands::Configure { action } => commands::configure::execute(&ctx, action)?,
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
