//! On-disk layout of tournament state
//!
//! Every path is relative to a root directory unless given absolute; see
//! [`Layout::rooted`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::house::House;

/// File and directory names used by the filesystem backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Root of the per-house submission folders
    pub submissions_dir: PathBuf,
    /// Tracker file name inside each `House_<n>` folder
    pub tracker_file: String,
    /// Artifact file name inside each submission folder
    pub artifact_file: String,
    /// Marker written by the build pipeline for invalid submissions
    pub invalid_marker: String,
    /// Score ledger
    pub ledger_file: PathBuf,
    /// Next group sequence number
    pub group_counter_file: PathBuf,
    /// Directory receiving one round log per group
    pub battle_results_dir: PathBuf,
    /// House/archive mapping produced by intake
    pub roster_file: PathBuf,
    /// Computed content hashes
    pub ground_truth_file: PathBuf,
    /// Directory holding `Part3_<n>.csv` claim tables
    pub claims_dir: PathBuf,
    /// Verifier results
    pub integrity_results_file: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            submissions_dir: PathBuf::from("submissions"),
            tracker_file: "Part_2_tracker.txt".to_string(),
            artifact_file: "chooseyourfighter.red".to_string(),
            invalid_marker: "Invalid.txt".to_string(),
            ledger_file: PathBuf::from("core/Round2_Results.txt"),
            group_counter_file: PathBuf::from("core/next_group.txt"),
            battle_results_dir: PathBuf::from("Battle_Results"),
            roster_file: PathBuf::from("Env_variables.csv"),
            ground_truth_file: PathBuf::from("calculated_sha256.csv"),
            claims_dir: PathBuf::from("."),
            integrity_results_file: PathBuf::from("Part3_Points.txt"),
        }
    }
}

impl Layout {
    /// Rebase every relative path onto `root`
    pub fn rooted(mut self, root: &Path) -> Self {
        for path in [
            &mut self.submissions_dir,
            &mut self.ledger_file,
            &mut self.group_counter_file,
            &mut self.battle_results_dir,
            &mut self.roster_file,
            &mut self.ground_truth_file,
            &mut self.claims_dir,
            &mut self.integrity_results_file,
        ] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
        self
    }

    pub fn house_dir(&self, house: House) -> PathBuf {
        self.submissions_dir.join(house.dir_name())
    }

    pub fn tracker_path(&self, house: House) -> PathBuf {
        self.house_dir(house).join(&self.tracker_file)
    }

    pub fn submission_dir(&self, house: House, id: &str) -> PathBuf {
        self.house_dir(house).join(id)
    }

    pub fn artifact_path(&self, house: House, id: &str) -> PathBuf {
        self.submission_dir(house, id).join(&self.artifact_file)
    }

    pub fn invalid_marker_path(&self, house: House, id: &str) -> PathBuf {
        self.submission_dir(house, id).join(&self.invalid_marker)
    }

    pub fn ledger_lock_path(&self) -> PathBuf {
        self.ledger_file.with_extension("lock")
    }

    pub fn round_log_path(&self, group: u64) -> PathBuf {
        self.battle_results_dir.join(format!("group_{}.txt", group))
    }

    pub fn claims_path(&self, house: House) -> PathBuf {
        self.claims_dir.join(format!("Part3_{}.csv", house.number()))
    }
}
