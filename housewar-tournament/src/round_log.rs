//! Round log text for one group
//!
//! Level 4 - Formatting utilities

use housewar_core::{House, Submission, HOUSE_COUNT};

use crate::match_play::{ForfeitReason, MatchOutcome, MatchResult, Side};

/// Member list and section heading written when a group is formed
pub fn header(members: &[Submission]) -> String {
    let mut text = String::from("Group Members:\n");
    for member in members {
        text.push_str(&member.label());
        text.push('\n');
    }
    text.push_str("\nMatches:\n");
    text
}

/// Lines recording one match
pub fn match_lines(result: &MatchResult, members: &[Submission]) -> String {
    let a = members[result.positions.0].label();
    let b = members[result.positions.1].label();
    let side = |s: Side| if s == Side::A { &a } else { &b };

    let mut text = String::new();
    if let Some(raw) = &result.raw {
        text.push_str(&format!("{} vs {}: {}\n", a, b, raw));
    }

    match &result.outcome {
        MatchOutcome::Decided { winner, .. } => {
            text.push_str(&format!("{} wins\n", side(*winner)));
        }
        MatchOutcome::Tie(_) => text.push_str("Tie\n"),
        MatchOutcome::Unparsable => text.push_str("Could not parse\n"),
        MatchOutcome::Forfeit {
            loser,
            reason: ForfeitReason::Invalid,
        } => {
            text.push_str(&format!(
                "{} is invalid. Point → {}\n",
                side(*loser),
                side(loser.other())
            ));
        }
        MatchOutcome::Forfeit {
            loser,
            reason: ForfeitReason::Missing,
        } => {
            text.push_str(&format!(
                "{} missing, point → {}\n",
                side(*loser),
                side(loser.other())
            ));
        }
        MatchOutcome::DoubleForfeit(ForfeitReason::Invalid) => {
            text.push_str(&format!("Both {} and {} are invalid. No points.\n", a, b));
        }
        MatchOutcome::DoubleForfeit(ForfeitReason::Missing) => {
            text.push_str(&format!("Both missing for {} vs {}\n", a, b));
        }
    }
    text
}

/// Per-house tally written after the last match
pub fn footer(tally: &[u64; HOUSE_COUNT]) -> String {
    let mut text = String::from("\nGroup Scores:\n");
    for house in House::ALL {
        text.push_str(&format!("{}: {}\n", house, tally[house.index()]));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::BattleReport;
    use housewar_core::Validity;
    use std::path::PathBuf;

    fn members() -> Vec<Submission> {
        House::ALL
            .iter()
            .zip(["ann", "ben", "cat", "dov"])
            .map(|(&house, id)| Submission {
                id: id.to_string(),
                house,
                artifact: PathBuf::from(format!("{}.red", id)),
                validity: Validity::Valid,
            })
            .collect()
    }

    #[test]
    fn test_header() {
        assert_eq!(
            header(&members()),
            "Group Members:\nann_1\nben_2\ncat_3\ndov_4\n\nMatches:\n"
        );
    }

    #[test]
    fn test_simulated_lines() {
        let result = MatchResult {
            positions: (0, 2),
            outcome: MatchOutcome::Decided {
                winner: Side::A,
                report: BattleReport::new(15, 3, 2),
            },
            raw: Some("results: 15 3 2".to_string()),
        };
        assert_eq!(
            match_lines(&result, &members()),
            "ann_1 vs cat_3: results: 15 3 2\nann_1 wins\n"
        );
    }

    #[test]
    fn test_forfeit_lines() {
        let m = members();
        let invalid = MatchResult {
            positions: (1, 3),
            outcome: MatchOutcome::Forfeit {
                loser: Side::B,
                reason: ForfeitReason::Invalid,
            },
            raw: None,
        };
        assert_eq!(match_lines(&invalid, &m), "dov_4 is invalid. Point → ben_2\n");

        let missing = MatchResult {
            positions: (0, 1),
            outcome: MatchOutcome::Forfeit {
                loser: Side::B,
                reason: ForfeitReason::Missing,
            },
            raw: None,
        };
        assert_eq!(match_lines(&missing, &m), "ben_2 missing, point → ann_1\n");

        let both = MatchResult {
            positions: (0, 1),
            outcome: MatchOutcome::DoubleForfeit(ForfeitReason::Missing),
            raw: None,
        };
        assert_eq!(match_lines(&both, &m), "Both missing for ann_1 vs ben_2\n");
    }

    #[test]
    fn test_footer() {
        assert_eq!(
            footer(&[3, 0, 2, 1]),
            "\nGroup Scores:\nHouse 1: 3\nHouse 2: 0\nHouse 3: 2\nHouse 4: 1\n"
        );
    }
}
