//! HOUSEWAR Integrity - Submission-integrity verification game
//!
//! Each house claims the content hash (or failure status) of the other
//! houses' submissions; claims are scored against a ground truth computed
//! from the submission folders.
//!
//! - `status`: hash-or-sentinel values
//! - `tables`: ground-truth and claim CSV tables
//! - `verifier`: per-claim verdicts and house scores
//! - `hashing`: SHA-256 ground truth calculator

pub mod hashing;
pub mod status;
pub mod tables;
pub mod verifier;

pub use hashing::{compute_ground_truth, render_truth_csv, sha256_hex, write_ground_truth, TruthRow};
pub use status::{HashValue, Sentinel};
pub use tables::{ClaimTable, GroundTruth, Key};
pub use verifier::{
    judge, render_results, score_house, verify, write_results, ClaimVerdict, HouseScore,
    IntegrityError, VerificationReport, Verdict,
};
