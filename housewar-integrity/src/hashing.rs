//! Ground truth calculation from the submission folders

use std::path::Path;

use csv::WriterBuilder;
use housewar_core::{write_atomic, House, Layout, Roster, RosterEntry};
use sha2::{Digest, Sha256};

use crate::status::{HashValue, Sentinel};
use crate::verifier::IntegrityError;

/// One computed row, in roster order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TruthRow {
    pub house: House,
    pub archive: String,
    pub value: HashValue,
}

/// Lowercase hex SHA-256
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Hash or status for one roster entry
pub fn hash_entry(layout: &Layout, entry: &RosterEntry) -> HashValue {
    let id = entry.submission_id();
    if layout.invalid_marker_path(entry.house, &id).exists() {
        return HashValue::Status(Sentinel::NotAValidWarrior);
    }

    let artifact = layout.artifact_path(entry.house, &id);
    if !artifact.exists() {
        return HashValue::Status(Sentinel::FileNotFound);
    }
    match std::fs::read(&artifact) {
        Ok(bytes) => HashValue::Hash(sha256_hex(&bytes)),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", artifact.display(), e);
            HashValue::Status(Sentinel::Error)
        }
    }
}

pub fn compute_ground_truth(layout: &Layout, roster: &Roster) -> Vec<TruthRow> {
    let rows: Vec<TruthRow> = roster
        .entries
        .iter()
        .map(|entry| {
            let value = hash_entry(layout, entry);
            tracing::debug!("{} {}: {}", entry.house, entry.archive, value);
            TruthRow {
                house: entry.house,
                archive: entry.archive.clone(),
                value,
            }
        })
        .collect();

    let hashed = rows.iter().filter(|r| r.value.sentinel().is_none()).count();
    tracing::info!("Computed {} hashes ({} sentinel statuses)", hashed, rows.len() - hashed);
    rows
}

/// CSV `house,archive,value`
pub fn render_truth_csv(rows: &[TruthRow]) -> Result<String, IntegrityError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    for row in rows {
        writer.write_record([
            row.house.number().to_string(),
            row.archive.clone(),
            row.value.to_string(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn write_ground_truth(path: &Path, rows: &[TruthRow]) -> Result<(), IntegrityError> {
    let text = render_truth_csv(rows)?;
    write_atomic(path, text.as_bytes()).map_err(|source| IntegrityError::Write {
        path: path.to_path_buf(),
        source,
    })
}
