//! Hashes command - compute the ground truth table from submission folders

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use housewar_core::Roster;
use housewar_integrity::{compute_ground_truth, write_ground_truth};
use housewar_tournament::TournamentConfig;

#[derive(Args)]
pub struct HashesArgs {
    /// Intake roster CSV (defaults to the layout's roster file)
    #[arg(long, value_name = "FILE")]
    pub roster: Option<PathBuf>,

    /// Ground truth CSV to write (defaults to the layout's ground truth file)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: HashesArgs, config: &TournamentConfig) -> Result<()> {
    let layout = &config.layout;
    let roster_path = args.roster.unwrap_or_else(|| layout.roster_file.clone());
    let output = args.output.unwrap_or_else(|| layout.ground_truth_file.clone());

    let text = std::fs::read_to_string(&roster_path)
        .with_context(|| format!("Failed to read roster: {}", roster_path.display()))?;
    let roster = Roster::parse(&text);
    tracing::info!("Loaded {} roster entries from {}", roster.len(), roster_path.display());

    let rows = compute_ground_truth(layout, &roster);
    write_ground_truth(&output, &rows)?;

    println!("Wrote {} rows to {}", rows.len(), output.display());
    Ok(())
}
