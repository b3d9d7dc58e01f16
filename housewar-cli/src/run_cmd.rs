//! Run command - normalize trackers and play groups to exhaustion
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_phase(), report_results()
//! - Level 3: progress_bar()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use housewar_core::{FsResolver, FsStore, House, HOUSE_COUNT};
use housewar_tournament::{
    HaltReason, PmarsSimulator, Progress, ScheduleSummary, Scheduler, TournamentConfig,
};

type FsScheduler = Scheduler<FsStore, PmarsSimulator, FsResolver, ChaCha8Rng>;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RunArgs {
    /// Resume with the trackers as they are
    #[arg(long)]
    pub no_normalize: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run the tournament
///
/// 1. Normalize trackers (unless resuming)
/// 2. Play groups until a house runs out
/// 3. Report results
pub fn run(args: RunArgs, config: &TournamentConfig) -> Result<()> {
    let started = Utc::now();
    let mut scheduler = Scheduler::new(
        FsStore::new(config.layout.clone()),
        PmarsSimulator::new(config.simulator.clone()),
        FsResolver::new(config.layout.clone()),
        create_rng(config.seed),
        config.simulator.rounds,
    );

    tracing::info!(
        "Starting tournament (simulator={}, rounds={})",
        config.simulator.program.display(),
        config.simulator.rounds
    );

    let normalize = config.normalize && !args.no_normalize;
    let summary = play_phase(&mut scheduler, normalize)?;

    report_results(&summary, started, args.json);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_phase(scheduler: &mut FsScheduler, normalize: bool) -> Result<ScheduleSummary> {
    let pb = progress_bar()?;

    let summary = scheduler
        .run_with_callback(normalize, |event| match event {
            Progress::Started { groups } => pb.set_length(groups as u64),
            Progress::GroupComplete(group) => {
                pb.set_message(format!("group {}", group.number));
                pb.inc(1);
            }
        })
        .context("Tournament aborted")?;
    pb.finish_and_clear();
    Ok(summary)
}

fn report_results(summary: &ScheduleSummary, started: DateTime<Utc>, json: bool) {
    if json {
        print_json_results(summary, started);
    } else {
        print_text_results(summary);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Bar sized once scheduling starts
fn progress_bar() -> Result<ProgressBar> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40}] {pos}/{len} groups {msg} ({eta})")?
            .progress_chars("=> "),
    );
    Ok(pb)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn halt_description(halt: &HaltReason) -> String {
    match halt {
        HaltReason::MissingData(house) => format!("missing data for {}", house),
        HaltReason::NoFullGroup => "no more full groups".to_string(),
        HaltReason::QueueExhausted(house) => format!("{} ran out mid-group", house),
    }
}

/// Print results as JSON
fn print_json_results(summary: &ScheduleSummary, started: DateTime<Utc>) {
    #[derive(serde::Serialize)]
    struct JsonGroup {
        number: u64,
        members: Vec<String>,
        tally: [u64; HOUSE_COUNT],
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        normalized_length: Option<usize>,
        groups_played: usize,
        next_group: u64,
        points: [u64; HOUSE_COUNT],
        halt: String,
        groups: Vec<JsonGroup>,
    }

    let output = JsonOutput {
        started_at: started,
        finished_at: Utc::now(),
        normalized_length: summary.normalized.as_ref().map(|n| n.length),
        groups_played: summary.groups_played(),
        next_group: summary.next_group,
        points: summary.points,
        halt: halt_description(&summary.halt),
        groups: summary
            .groups
            .iter()
            .map(|g| JsonGroup {
                number: g.number,
                members: g.members.iter().map(|m| m.label()).collect(),
                tally: g.tally,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(summary: &ScheduleSummary) {
    println!("\n=== Tournament Results ===");
    if let Some(normalized) = &summary.normalized {
        println!("Normalized:    {} entries per house", normalized.length);
    }
    println!("Groups played: {}", summary.groups_played());
    println!("Next group:    {}", summary.next_group);
    println!("Stopped:       {}", halt_description(&summary.halt));

    println!("\nPoints this run:");
    for house in House::ALL {
        println!("  {}: {}", house, summary.points[house.index()]);
    }
}

// ============================================================================
// TESTS
// ============================================================================
