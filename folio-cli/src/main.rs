//! folio CLI - runs the portfolio API backend
//!
//! - `serve`: long-lived HTTP server with an eager database connection
//! - `check`: verify the database is reachable with the current settings

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(name = "folio", author, version, about = "Portfolio API backend")]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Connect to the database once and report the result
    Check(commands::check::CheckArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = config::load_dotenv();

    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    match dotenv {
        Ok(Some(path)) => debug!("Loaded .env from {}", path.display()),
        Ok(None) => debug!("No .env file found, using environment variables only"),
        Err(e) => warn!("Failed to read .env: {}", e),
    }

    match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args).await,
        Commands::Check(args) => commands::check::run_check(args).await,
    }
}
