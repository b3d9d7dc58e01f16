//! HOUSEWAR Tournament - Group scheduling and battle scoring
//!
//! This crate provides tournament infrastructure:
//! - Simulator adapter for the external battle program
//! - Report parsing and the match decision rule
//! - Forfeiture rules and match play
//! - Group scheduling with round logs and ledger updates
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: Scheduler::run (orchestration)
//! - Level 2: form_group, play_group, play_match (phases)
//! - Level 3: battle, parse_report, award (steps)
//! - Level 4: round log formatting, configuration

mod config;
mod match_play;
mod report;
mod round_log;
mod scheduler;
mod simulator;

pub use config::{SimulatorConfig, TournamentConfig, DEFAULT_BATTLE_ROUNDS};
pub use match_play::{
    forfeit_rule, play_match, round_robin_pairings, ForfeitReason, MatchOutcome, MatchResult, Side,
};
pub use report::{parse_report, BattleReport, Decision};
pub use scheduler::{GroupResult, HaltReason, Progress, ScheduleSummary, Scheduler};
pub use simulator::{last_line, BattleSimulator, PmarsSimulator, SimulatorError};
