//! Ground-truth and claim tables
//!
//! Both are CSV rows `owner,submission,value` keyed by `(owner, submission)`.
//! Rows with fewer than three fields are skipped; a later row for the same
//! key replaces the earlier value but keeps its position.

use std::io;
use std::path::Path;

use anyhow::Context;
use housewar_core::lines::csv_records;
use housewar_core::House;
use rustc_hash::FxHashMap;

use crate::status::HashValue;

/// `(owning house, submission id)`
pub type Key = (House, String);

/// Ordered rows with keyed lookup
#[derive(Clone, Debug)]
struct KeyedRows<T> {
    rows: Vec<(Key, T)>,
    index: FxHashMap<Key, usize>,
}

impl<T> Default for KeyedRows<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: FxHashMap::default(),
        }
    }
}

impl<T> KeyedRows<T> {
    fn insert(&mut self, key: Key, value: T) {
        match self.index.get(&key) {
            Some(&i) => self.rows[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.rows.len());
                self.rows.push((key, value));
            }
        }
    }

    fn get(&self, key: &Key) -> Option<&T> {
        self.index.get(key).map(|&i| &self.rows[i].1)
    }
}

/// Parse `owner,submission,value` rows, skipping unusable ones
fn parse_rows(text: &str, source: &str) -> Vec<(Key, String)> {
    let mut out = Vec::new();
    for (line, fields) in csv_records(text) {
        if fields.len() < 3 {
            continue;
        }
        match fields[0].parse::<House>() {
            Ok(owner) => out.push(((owner, fields[1].clone()), fields[2].clone())),
            Err(e) => tracing::warn!("{} line {}: {}", source, line, e),
        }
    }
    out
}

/// Read a table file; a missing file reads as empty
fn read_table(path: &Path) -> anyhow::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Authoritative hash or status per submission
#[derive(Clone, Debug, Default)]
pub struct GroundTruth {
    rows: KeyedRows<HashValue>,
}

impl GroundTruth {
    pub fn parse(text: &str) -> Self {
        let mut truth = GroundTruth::default();
        for (key, value) in parse_rows(text, "ground truth") {
            truth.insert(key, HashValue::parse(&value));
        }
        truth
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match read_table(path)? {
            Some(text) => Ok(Self::parse(&text)),
            None => {
                tracing::warn!("Ground truth not found: {}", path.display());
                Ok(Self::default())
            }
        }
    }

    pub fn insert(&mut self, key: Key, value: HashValue) {
        self.rows.insert(key, value);
    }

    pub fn get(&self, key: &Key) -> Option<&HashValue> {
        self.rows.get(key)
    }

    pub fn len(&self) -> usize {
        self.rows.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.rows.is_empty()
    }
}

/// One house's claimed hashes or statuses
#[derive(Clone, Debug, Default)]
pub struct ClaimTable {
    rows: KeyedRows<String>,
}

impl ClaimTable {
    pub fn parse(text: &str) -> Self {
        let mut claims = ClaimTable::default();
        for (key, value) in parse_rows(text, "claims") {
            claims.insert(key, value);
        }
        claims
    }

    /// Load a claims file; `None` when the house submitted none
    pub fn load(path: &Path) -> anyhow::Result<Option<Self>> {
        Ok(read_table(path)?.map(|text| Self::parse(&text)))
    }

    pub fn insert(&mut self, key: Key, claimed: impl Into<String>) {
        self.rows.insert(key, claimed.into());
    }

    /// Claims in file order
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &str)> {
        self.rows.rows.iter().map(|(key, value)| (key, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.rows.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.rows.is_empty()
    }
}
