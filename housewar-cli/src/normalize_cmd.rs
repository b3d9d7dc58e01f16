//! Normalize command - equalize tracker lengths without scheduling

use anyhow::{Context, Result};

use housewar_core::{normalize_trackers, Error, FsStore, House, NormalizeSummary};
use housewar_tournament::TournamentConfig;

pub fn run(config: &TournamentConfig) -> Result<()> {
    let mut store = FsStore::new(config.layout.clone());

    for line in outcome_lines(normalize_trackers(&mut store))? {
        println!("{}", line);
    }
    Ok(())
}

/// Console report; missing data is reported once and is not a failure
fn outcome_lines(result: housewar_core::Result<NormalizeSummary>) -> Result<Vec<String>> {
    match result {
        Ok(summary) => {
            let mut lines = vec![format!("Normalized trackers to {} entries each", summary.length)];
            for house in House::ALL {
                lines.push(format!(
                    "  {}: {} submissions x{}",
                    house,
                    summary.original_counts[house.index()],
                    summary.factor(house)
                ));
            }
            Ok(lines)
        }
        Err(Error::MissingData(house)) => {
            Ok(vec![format!("Missing data for {}. Nothing normalized.", house)])
        }
        Err(e) => Err(e).context("Failed to normalize trackers"),
    }
}
