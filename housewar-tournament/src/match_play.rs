//! Match play - one pairing inside a group
//!
//! Level 2 - Phase-level implementation

use housewar_core::{House, Submission};

use crate::report::{parse_report, BattleReport, Decision};
use crate::simulator::BattleSimulator;

/// Position of a submission within a pairing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Why a side forfeited without a battle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForfeitReason {
    /// Flagged invalid by the build pipeline
    Invalid,
    /// Artifact file absent
    Missing,
}

/// Resolved outcome of one pairing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Simulator reported more wins for one side
    Decided { winner: Side, report: BattleReport },
    /// Simulator reported equal win counts
    Tie(BattleReport),
    /// One side could not play; the other takes the point
    Forfeit { loser: Side, reason: ForfeitReason },
    /// Neither side could play
    DoubleForfeit(ForfeitReason),
    /// Simulator output did not match the report grammar
    Unparsable,
}

impl MatchOutcome {
    /// Side awarded the point, if any
    pub fn winner(&self) -> Option<Side> {
        match self {
            MatchOutcome::Decided { winner, .. } => Some(*winner),
            MatchOutcome::Forfeit { loser, .. } => Some(loser.other()),
            MatchOutcome::Tie(_) | MatchOutcome::DoubleForfeit(_) | MatchOutcome::Unparsable => {
                None
            }
        }
    }
}

/// Result of a pairing between two group members
#[derive(Clone, Debug)]
pub struct MatchResult {
    /// Group positions of the two sides
    pub positions: (usize, usize),
    pub outcome: MatchOutcome,
    /// Raw simulator line, when the simulator ran
    pub raw: Option<String>,
}

impl MatchResult {
    /// House awarded the point, if any
    pub fn winning_house(&self, members: &[Submission]) -> Option<House> {
        let member = match self.outcome.winner()? {
            Side::A => &members[self.positions.0],
            Side::B => &members[self.positions.1],
        };
        Some(member.house)
    }
}

/// Forfeit that applies before any battle, if one does
///
/// Invalidity is checked first, then missing artifacts.
pub fn forfeit_rule(a: &Submission, b: &Submission) -> Option<MatchOutcome> {
    let by_flag = |reason: ForfeitReason, a_out: bool, b_out: bool| match (a_out, b_out) {
        (true, true) => Some(MatchOutcome::DoubleForfeit(reason)),
        (true, false) => Some(MatchOutcome::Forfeit {
            loser: Side::A,
            reason,
        }),
        (false, true) => Some(MatchOutcome::Forfeit {
            loser: Side::B,
            reason,
        }),
        (false, false) => None,
    };

    by_flag(ForfeitReason::Invalid, a.is_invalid(), b.is_invalid())
        .or_else(|| by_flag(ForfeitReason::Missing, a.is_missing(), b.is_missing()))
}

/// Resolve one pairing (Level 2 phase)
///
/// Forfeits short-circuit the simulator. A simulator that cannot be
/// launched produces an empty report, which is unparsable.
pub fn play_match<B: BattleSimulator + ?Sized>(
    positions: (usize, usize),
    a: &Submission,
    b: &Submission,
    simulator: &mut B,
    rounds: u32,
) -> MatchResult {
    if let Some(outcome) = forfeit_rule(a, b) {
        return MatchResult {
            positions,
            outcome,
            raw: None,
        };
    }

    let raw = match simulator.battle(&a.artifact, &b.artifact, rounds) {
        Ok(line) => line,
        Err(e) => {
            tracing::warn!("{} vs {}: {}", a.label(), b.label(), e);
            String::new()
        }
    };

    let outcome = match parse_report(&raw) {
        Some(report) => match report.decide() {
            Decision::AWins => MatchOutcome::Decided {
                winner: Side::A,
                report,
            },
            Decision::BWins => MatchOutcome::Decided {
                winner: Side::B,
                report,
            },
            Decision::Tie => MatchOutcome::Tie(report),
        },
        None => {
            tracing::warn!("{} vs {}: could not parse {:?}", a.label(), b.label(), raw);
            MatchOutcome::Unparsable
        }
    };

    MatchResult {
        positions,
        outcome,
        raw: Some(raw),
    }
}

/// Generate all pairings for a round-robin over `n` members
pub fn round_robin_pairings(n: usize) -> Vec<(usize, usize)> {
    let mut pairings = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            pairings.push((i, j));
        }
    }
    pairings
}
