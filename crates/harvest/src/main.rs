//! Harvest CLI - fetch images for a keyword, keeping only large, unique ones.
//!
//! # Usage
//!
//! ```bash
//! # Fetch 10 images from a list of candidate URLs
//! harvest fetch "steampunk simple images" --urls candidates.txt
//!
//! # Pipe candidates from another tool, emit JSON Lines
//! my-search "steampunk" | harvest fetch steampunk --urls - --format jsonl
//!
//! # View configuration
//! harvest config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Harvest - concurrent keyword image fetcher with quality and dedupe gates.
#[derive(Parser, Debug)]
#[command(name = "harvest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Download images for a keyword
    Fetch(cli::fetch::FetchArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match harvest_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `harvest config path`."
            );
            harvest_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Harvest v{}", harvest_core::VERSION);

    match cli.command {
        Commands::Fetch(args) => cli::fetch::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
