//! HOUSEWAR CLI - Command-line interface
//!
//! Commands:
//! - normalize: Equalize the four house trackers
//! - run: Normalize and play groups until a queue runs dry
//! - standings: Print the score ledger
//! - hashes: Compute the ground truth hash table
//! - verify: Score the houses' integrity claims

mod hashes_cmd;
mod normalize_cmd;
mod run_cmd;
mod standings_cmd;
mod verify_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use housewar_tournament::TournamentConfig;

#[derive(Parser)]
#[command(name = "housewar")]
#[command(about = "HOUSEWAR four-house warrior tournament")]
struct Cli {
    /// Tournament configuration JSON file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Random seed for draws
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Directory the tournament layout is relative to
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replicate trackers to a common length
    Normalize,
    /// Run the tournament
    Run(run_cmd::RunArgs),
    /// Print the score ledger
    Standings(standings_cmd::StandingsArgs),
    /// Compute SHA-256 ground truth from the submission folders
    Hashes(hashes_cmd::HashesArgs),
    /// Score integrity claims against the ground truth
    Verify(verify_cmd::VerifyArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Normalize => normalize_cmd::run(&config),
        Commands::Run(args) => run_cmd::run(args, &config),
        Commands::Standings(args) => standings_cmd::run(args, &config),
        Commands::Hashes(args) => hashes_cmd::run(args, &config),
        Commands::Verify(args) => verify_cmd::run(args, &config),
    }
}

/// RUST_LOG wins over --verbose
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file (or defaults), then command-line overrides
fn load_config(cli: &Cli) -> Result<TournamentConfig> {
    let mut config = match &cli.config {
        Some(path) => TournamentConfig::load(path)?,
        None => TournamentConfig::new(),
    };
    if let Some(root) = &cli.root {
        config = config.rooted(root);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}
