//! Submission-integrity scoring
//!
//! Level 1 - Orchestration: verify
//! Level 2 - Phases: score_house
//! Level 3 - Steps: judge
//! Level 4 - Output: render_results, write_results

use std::path::{Path, PathBuf};

use housewar_core::{write_atomic, House, HOUSE_COUNT};
use thiserror::Error;

use crate::status::{HashValue, Sentinel};
use crate::tables::{ClaimTable, GroundTruth, Key};

#[derive(Error, Debug)]
pub enum IntegrityError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How a single claim was scored
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Sentinel truth on another house's submission
    ForeignSentinel(Sentinel),
    /// Sentinel truth on the evaluator's own submission
    OwnSentinel(Sentinel),
    HashMatch,
    HashMismatch,
    /// Key not present in the ground truth
    Unknown,
}

impl Verdict {
    pub fn points(&self) -> u64 {
        match self {
            Verdict::ForeignSentinel(_) | Verdict::HashMatch => 1,
            Verdict::OwnSentinel(_) | Verdict::HashMismatch | Verdict::Unknown => 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClaimVerdict {
    pub key: Key,
    pub claimed: String,
    pub verdict: Verdict,
}

#[derive(Clone, Debug)]
pub struct HouseScore {
    pub house: House,
    pub points: u64,
    /// False when the house submitted no claims file
    pub submitted: bool,
    pub verdicts: Vec<ClaimVerdict>,
}

#[derive(Clone, Debug)]
pub struct VerificationReport {
    pub scores: [HouseScore; HOUSE_COUNT],
}

impl VerificationReport {
    pub fn points_for(&self, house: House) -> u64 {
        self.scores[house.index()].points
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Score every house; `None` when there's no ground truth to score against
pub fn verify(
    truth: &GroundTruth,
    claims: &[Option<ClaimTable>; HOUSE_COUNT],
) -> Option<VerificationReport> {
    if truth.is_empty() {
        tracing::warn!("No calculated hashes found, nothing to verify");
        return None;
    }

    let scores = House::ALL.map(|house| {
        let score = score_house(house, claims[house.index()].as_ref(), truth);
        tracing::info!("{}: {} points", house, score.points);
        score
    });
    Some(VerificationReport { scores })
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

pub fn score_house(evaluator: House, claims: Option<&ClaimTable>, truth: &GroundTruth) -> HouseScore {
    let Some(claims) = claims else {
        tracing::warn!("{} submitted no claims, scoring 0", evaluator);
        return HouseScore {
            house: evaluator,
            points: 0,
            submitted: false,
            verdicts: Vec::new(),
        };
    };

    let mut verdicts = Vec::with_capacity(claims.len());
    for (key, claimed) in claims.iter() {
        let verdict = judge(evaluator, key.0, claimed, truth.get(key));
        log_verdict(evaluator, key, claimed, &verdict);
        verdicts.push(ClaimVerdict {
            key: key.clone(),
            claimed: claimed.to_string(),
            verdict,
        });
    }

    HouseScore {
        house: evaluator,
        points: verdicts.iter().map(|v| v.verdict.points()).sum(),
        submitted: true,
        verdicts,
    }
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Score one claim made by `evaluator` about a submission owned by `owner`
pub fn judge(evaluator: House, owner: House, claimed: &str, truth: Option<&HashValue>) -> Verdict {
    match truth {
        None => Verdict::Unknown,
        Some(HashValue::Status(sentinel)) if owner != evaluator => Verdict::ForeignSentinel(*sentinel),
        Some(HashValue::Status(sentinel)) => Verdict::OwnSentinel(*sentinel),
        Some(HashValue::Hash(hash)) if hash.eq_ignore_ascii_case(claimed) => Verdict::HashMatch,
        Some(HashValue::Hash(_)) => Verdict::HashMismatch,
    }
}

fn log_verdict(evaluator: House, key: &Key, claimed: &str, verdict: &Verdict) {
    let (owner, id) = key;
    match verdict {
        Verdict::ForeignSentinel(s) => {
            tracing::info!("{} on {}/{}: {} (foreign), 1 point", evaluator, owner, id, s.as_str())
        }
        Verdict::OwnSentinel(s) => {
            tracing::info!("{} on {}/{}: {} (own), 0 points", evaluator, owner, id, s.as_str())
        }
        Verdict::HashMatch => tracing::info!("{} on {}/{}: match, 1 point", evaluator, owner, id),
        Verdict::HashMismatch => {
            tracing::info!("{} on {}/{}: mismatch ({}), 0 points", evaluator, owner, id, claimed)
        }
        Verdict::Unknown => {
            tracing::warn!("{} on {}/{}: unknown status, 0 points", evaluator, owner, id)
        }
    }
}

// ============================================================================
// Level 4 - Output
// ============================================================================

/// `House <n> - <points>` for houses 1..4
pub fn render_results(report: &VerificationReport) -> String {
    let mut text = String::new();
    for score in &report.scores {
        text.push_str(&format!("House {} - {}\n", score.house.number(), score.points));
    }
    text
}

/// Overwrite the results file
pub fn write_results(path: &Path, report: &VerificationReport) -> Result<(), IntegrityError> {
    write_atomic(path, render_results(report).as_bytes()).map_err(|source| IntegrityError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(n: u8) -> House {
        House::new(n).unwrap()
    }

    fn truth() -> GroundTruth {
        GroundTruth::parse(
            "1,ann.tgz,FILE_NOT_FOUND\n2,ben.tgz,ABC123\n3,cat.tgz,NOT_A_VALID_WARRIOR\n",
        )
    }

    #[test]
    fn test_sentinel_asymmetry() {
        let sentinel = HashValue::Status(Sentinel::FileNotFound);
        assert_eq!(judge(h(2), h(1), "whatever", Some(&sentinel)).points(), 1);
        assert_eq!(judge(h(1), h(1), "whatever", Some(&sentinel)).points(), 0);
        assert_eq!(judge(h(1), h(1), "FILE_NOT_FOUND", Some(&sentinel)).points(), 0);
    }

    #[test]
    fn test_hash_comparison_ignores_case() {
        let hash = HashValue::Hash("ABC123".to_string());
        assert_eq!(judge(h(1), h(2), "abc123", Some(&hash)), Verdict::HashMatch);
        assert_eq!(judge(h(1), h(2), "abc124", Some(&hash)), Verdict::HashMismatch);
        assert_eq!(judge(h(2), h(2), "abc123", Some(&hash)), Verdict::HashMatch);
    }

    #[test]
    fn test_unknown_key_scores_zero() {
        assert_eq!(judge(h(1), h(4), "abc", None), Verdict::Unknown);
        assert_eq!(Verdict::Unknown.points(), 0);
    }

    #[test]
    fn test_verify_report() {
        let claims = [
            Some(ClaimTable::parse("1,ann.tgz,x\n2,ben.tgz,abc123\n3,cat.tgz,y\n")),
            Some(ClaimTable::parse("1,ann.tgz,x\n4,dov.tgz,zzz\n")),
            Some(ClaimTable::default()),
            None,
        ];
        let report = verify(&truth(), &claims).unwrap();
        // House 1: own sentinel 0, match 1, foreign sentinel 1
        assert_eq!(report.points_for(h(1)), 2);
        // House 2: foreign sentinel 1, unknown 0
        assert_eq!(report.points_for(h(2)), 1);
        assert_eq!(report.points_for(h(3)), 0);
        assert_eq!(report.points_for(h(4)), 0);
        assert!(report.scores[2].submitted);
        assert!(!report.scores[3].submitted);
        assert_eq!(
            render_results(&report),
            "House 1 - 2\nHouse 2 - 1\nHouse 3 - 0\nHouse 4 - 0\n"
        );
    }

    #[test]
    fn test_empty_truth_produces_nothing() {
        let claims = [Some(ClaimTable::parse("1,ann.tgz,x\n")), None, None, None];
        assert!(verify(&GroundTruth::default(), &claims).is_none());
    }
}
