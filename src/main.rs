//! reelstate - Processing State for Media Pipelines
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use reelstate::cli::{Cli, Commands};
use reelstate::config::{Config, ConfigManager, StatePaths};
use reelstate::error::ReelResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> ReelResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load()?;

    init_logging(cli.verbose, &config);

    let paths = StatePaths::resolve(&config, cli.state_dir.as_deref());
    debug!("State files: {:?}", paths);

    // Dispatch to command
    match cli.command {
        Commands::Fingerprint(args) => reelstate::cli::commands::fingerprint(args),
        Commands::Check(args) => reelstate::cli::commands::check(args, &config, &paths),
        Commands::Mark(args) => reelstate::cli::commands::mark(args, &config, &paths),
        Commands::Cache(args) => reelstate::cli::commands::cache(args, &config, &paths),
        Commands::Batch(args) => reelstate::cli::commands::batch(args, &config, &paths),
        Commands::Config(args) => {
            reelstate::cli::commands::config(args, &config, &config_manager)
        }
    }
}

/// Logging goes to stderr: 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("reelstate=warn"),
        1 => EnvFilter::new("reelstate=info"),
        _ => EnvFilter::new("reelstate=debug"),
    };

    if config.general.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
    }
}
