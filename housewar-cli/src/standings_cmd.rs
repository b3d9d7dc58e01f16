//! Standings command - print the score ledger

use anyhow::{Context, Result};
use clap::Args;

use housewar_core::{standings, FsStore};
use housewar_tournament::TournamentConfig;

#[derive(Args)]
pub struct StandingsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: StandingsArgs, config: &TournamentConfig) -> Result<()> {
    let store = FsStore::new(config.layout.clone());
    let table = standings(&store).with_context(|| {
        format!("Failed to read ledger: {}", config.layout.ledger_file.display())
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        println!("=== Standings ===");
        for (label, points) in &table {
            println!("{} - {}", label, points);
        }
    }
    Ok(())
}
