//! Houses and submissions

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of competing houses
pub const HOUSE_COUNT: usize = 4;

/// One of the four fixed tournament participants
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct House(u8);

impl House {
    /// All houses in draw order
    pub const ALL: [House; HOUSE_COUNT] = [House(1), House(2), House(3), House(4)];

    /// Create a house from its number (1-4)
    pub fn new(number: u8) -> Option<Self> {
        (1..=HOUSE_COUNT as u8).contains(&number).then_some(House(number))
    }

    /// House number (1-4)
    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based index for per-house arrays
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Ledger label, e.g. `House 2`
    pub fn label(self) -> String {
        format!("House {}", self.0)
    }

    /// Directory name under the submissions root, e.g. `House_2`
    pub fn dir_name(self) -> String {
        format!("House_{}", self.0)
    }
}

impl fmt::Display for House {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "House {}", self.0)
    }
}

impl TryFrom<u8> for House {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        House::new(value).ok_or_else(|| format!("house number out of range: {}", value))
    }
}

impl From<House> for u8 {
    fn from(house: House) -> u8 {
        house.0
    }
}

impl FromStr for House {
    type Err = String;

    /// Accepts `3`, `House 3` and `House_3`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix("House")
            .map(|rest| rest.trim_start_matches(&[' ', '_'][..]))
            .unwrap_or(s);
        let number: u8 = digits
            .parse()
            .map_err(|_| format!("not a house: {:?}", s))?;
        House::try_from(number)
    }
}

/// Submission identifier as recorded in a tracker
pub type SubmissionId = String;

/// Validity flag supplied by the external build pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validity {
    /// Built and accepted by the simulator
    Valid,
    /// Flagged invalid by the build pipeline
    Invalid,
    /// Artifact file is absent
    Missing,
}

/// A drawn submission with its owner and artifact resolved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub house: House,
    pub artifact: PathBuf,
    pub validity: Validity,
}

impl Submission {
    /// Label used in round logs, e.g. `alice_2`
    pub fn label(&self) -> String {
        format!("{}_{}", self.id, self.house.number())
    }

    pub fn is_invalid(&self) -> bool {
        self.validity == Validity::Invalid
    }

    pub fn is_missing(&self) -> bool {
        self.validity == Validity::Missing
    }
}
