//! Infobar CLI - stamp capture details and camera logos onto photos.
//!
//! Every photo in a folder gets an information bar along its bottom edge:
//! ISO, aperture, shutter speed and focal length, the capture time, a
//! signature, and the manufacturer logo next to the camera model.
//!
//! # Usage
//!
//! ```bash
//! # Annotate a folder into ./output
//! infobar process ./photos
//!
//! # Custom output directory and worker cap, with a run report
//! infobar process ./photos -o ./annotated -w 8 --report run.jsonl --report-format jsonl
//!
//! # View configuration
//! infobar config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Infobar - stamp capture details and camera logos onto a folder of photos.
#[derive(Parser, Debug)]
#[command(name = "infobar")]
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
    /// Annotate every photo in a directory
    Process(cli::process::ProcessArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match infobar_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `infobar config path`."
            );
            infobar_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Infobar v{}", infobar_core::VERSION);

    match cli.command {
        Commands::Process(args) => cli::process::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
