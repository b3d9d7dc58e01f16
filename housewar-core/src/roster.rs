//! Submission roster written by intake
//!
//! Rows are `house,archive[,env-var]`.

use crate::house::{House, SubmissionId};
use crate::lines::csv_records;

/// One intake record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterEntry {
    pub house: House,
    /// Archive file name as submitted, e.g. `alice.tar.gz`
    pub archive: String,
    /// Environment variable the build used, if recorded
    pub env_var: Option<String>,
}

impl RosterEntry {
    /// Submission id: the archive name up to its first `.`
    pub fn submission_id(&self) -> SubmissionId {
        self.archive
            .split('.')
            .next()
            .unwrap_or(&self.archive)
            .to_string()
    }
}

/// Parsed roster with the rows that were skipped
#[derive(Clone, Debug, Default)]
pub struct Roster {
    pub entries: Vec<RosterEntry>,
    /// 1-based line numbers of rows that could not be used
    pub skipped: Vec<usize>,
}

impl Roster {
    pub fn parse(text: &str) -> Self {
        let mut roster = Roster::default();
        for (line, fields) in csv_records(text) {
            let house = fields.first().and_then(|f| f.parse::<House>().ok());
            match (house, fields.get(1)) {
                (Some(house), Some(archive)) if !archive.is_empty() => {
                    roster.entries.push(RosterEntry {
                        house,
                        archive: archive.clone(),
                        env_var: fields.get(2).filter(|v| !v.is_empty()).cloned(),
                    });
                }
                _ => {
                    tracing::warn!("Skipping roster line {}: {:?}", line, fields);
                    roster.skipped.push(line);
                }
            }
        }
        roster
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
