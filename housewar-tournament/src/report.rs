//! Match outcome parser
//!
//! The simulator's final line reads `Results: <a> <b> <ties>`, counts from
//! the first artifact's perspective.

/// Parsed battle report
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BattleReport {
    pub wins_a: u32,
    pub wins_b: u32,
    /// Informational only
    pub ties: u32,
}

/// Decisive or drawn result of a parsed report
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    AWins,
    BWins,
    Tie,
}

impl Decision {
    /// Same decision seen from the other side
    pub fn mirrored(self) -> Self {
        match self {
            Decision::AWins => Decision::BWins,
            Decision::BWins => Decision::AWins,
            Decision::Tie => Decision::Tie,
        }
    }
}

impl BattleReport {
    pub fn new(wins_a: u32, wins_b: u32, ties: u32) -> Self {
        Self {
            wins_a,
            wins_b,
            ties,
        }
    }

    pub fn decide(&self) -> Decision {
        use std::cmp::Ordering;
        match self.wins_a.cmp(&self.wins_b) {
            Ordering::Greater => Decision::AWins,
            Ordering::Less => Decision::BWins,
            Ordering::Equal => Decision::Tie,
        }
    }

    /// Report with the two sides swapped
    pub fn mirrored(&self) -> Self {
        Self::new(self.wins_b, self.wins_a, self.ties)
    }
}

/// Parse a report line; `None` if it does not match the grammar
pub fn parse_report(line: &str) -> Option<BattleReport> {
    let mut tokens = line.split_whitespace();
    let head = tokens.next()?.to_ascii_lowercase();
    if head != "result:" && head != "results:" {
        return None;
    }

    let counts: Vec<u32> = tokens.map(|t| t.parse().ok()).collect::<Option<_>>()?;
    match counts[..] {
        [wins_a, wins_b, ties] => Some(BattleReport::new(wins_a, wins_b, ties)),
        _ => None,
    }
}
