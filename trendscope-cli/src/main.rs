//! Trendscope CLI - Command-line interface
//!
//! Runs the API server or issues one-off queries against the Trends API.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use trendscope_core::config::DEFAULT_DOTENV_PATH;
use trendscope_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "trendscope")]
#[command(about = "Google Trends search volume service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Environment file loaded before configuration is read, relative to the working directory
    #[arg(long, env = "DOTENV_PATH", default_value = DEFAULT_DOTENV_PATH, global = true)]
    dotenv: PathBuf,

    /// Console log level
    #[arg(long, value_enum, default_value_t = CliLogLevel::Info, global = true)]
    log_level: CliLogLevel,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let dotenv_loaded = trendscope_core::load_dotenv(&cli.dotenv)?;
    init_tracing(cli.log_level.as_tracing_level(), None)?;
    if dotenv_loaded {
        tracing::info!(path = %cli.dotenv.display(), "loaded environment file");
    }

    commands::handle_command(cli.command).await
}
