//! Verify command - score integrity claims against the ground truth
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_claims(), report_results()

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use housewar_core::{House, Layout, HOUSE_COUNT};
use housewar_integrity::{verify, write_results, ClaimTable, GroundTruth, VerificationReport};
use housewar_tournament::TournamentConfig;

#[derive(Args)]
pub struct VerifyArgs {
    /// Ground truth CSV (defaults to the layout's ground truth file)
    #[arg(long, value_name = "FILE")]
    pub truth: Option<PathBuf>,

    /// Directory holding Part3_<n>.csv claim files
    #[arg(long, value_name = "DIR")]
    pub claims_dir: Option<PathBuf>,

    /// Results file to write
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: VerifyArgs, config: &TournamentConfig) -> Result<()> {
    let mut layout = config.layout.clone();
    if let Some(dir) = args.claims_dir {
        layout.claims_dir = dir;
    }
    let truth_path = args.truth.unwrap_or_else(|| layout.ground_truth_file.clone());
    let output = args.output.unwrap_or_else(|| layout.integrity_results_file.clone());

    let truth = GroundTruth::load(&truth_path)?;
    tracing::info!("Loaded {} ground truth rows", truth.len());

    let claims = load_claims(&layout)?;
    let Some(report) = verify(&truth, &claims) else {
        println!("No calculated hashes found. Exiting.");
        return Ok(());
    };

    write_results(&output, &report)?;
    report_results(&report);
    println!("Results written to {}", output.display());
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_claims(layout: &Layout) -> Result<[Option<ClaimTable>; HOUSE_COUNT]> {
    let mut claims: [Option<ClaimTable>; HOUSE_COUNT] = Default::default();
    for house in House::ALL {
        claims[house.index()] = ClaimTable::load(&layout.claims_path(house))?;
    }
    Ok(claims)
}

fn report_results(report: &VerificationReport) {
    println!("\n=== Integrity Results ===");
    for score in &report.scores {
        println!(
            "{}: {} points ({} claims)",
            score.house,
            score.points,
            score.verdicts.len()
        );
    }
}
