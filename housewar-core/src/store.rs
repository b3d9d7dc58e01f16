//! Durable tournament state behind a storage interface
//!
//! Trackers, the score ledger, the group counter and round logs are all
//! reached through [`Store`]. [`crate::FsStore`] is the production backend;
//! [`MemoryStore`] backs tests.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::house::{House, SubmissionId, HOUSE_COUNT};

/// Read/modify/write access to tournament state
pub trait Store {
    /// Tracker entries for a house, `None` if the tracker does not exist
    fn read_tracker(&self, house: House) -> Result<Option<Vec<SubmissionId>>>;

    /// Replace a house's tracker
    fn write_tracker(&mut self, house: House, entries: &[SubmissionId]) -> Result<()>;

    /// Raw ledger text, `None` if no ledger has been written yet
    fn read_ledger(&self) -> Result<Option<String>>;

    /// Replace the ledger text
    fn write_ledger(&mut self, contents: &str) -> Result<()>;

    /// Take exclusive ownership of the ledger; fails if already held
    fn lock_ledger(&mut self) -> Result<()>;

    fn unlock_ledger(&mut self) -> Result<()>;

    /// Next group sequence number, `None` before the first group
    fn read_next_group(&self) -> Result<Option<u64>>;

    fn write_next_group(&mut self, next: u64) -> Result<()>;

    /// Create (or truncate) the round log for a group
    fn begin_round_log(&mut self, group: u64) -> Result<()>;

    /// Append text to a group's round log
    fn append_round_log(&mut self, group: u64, text: &str) -> Result<()>;
}

/// Scoped exclusive hold on the ledger
///
/// The lock is released when the guard drops, including on early return.
pub struct LedgerGuard<'a, S: Store + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: Store + ?Sized> LedgerGuard<'a, S> {
    pub fn acquire(store: &'a mut S) -> Result<Self> {
        store.lock_ledger()?;
        Ok(Self { store })
    }

    pub fn read(&self) -> Result<Option<String>> {
        self.store.read_ledger()
    }

    pub fn write(&mut self, contents: &str) -> Result<()> {
        self.store.write_ledger(contents)
    }
}

impl<S: Store + ?Sized> Drop for LedgerGuard<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.store.unlock_ledger() {
            tracing::warn!("Failed to release ledger lock: {}", e);
        }
    }
}

/// In-memory store
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    trackers: [Option<Vec<SubmissionId>>; HOUSE_COUNT],
    ledger: Option<String>,
    ledger_locked: bool,
    next_group: Option<u64>,
    round_logs: BTreeMap<u64, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store with the given tracker entries for houses 1..4
    pub fn with_trackers<I, T>(trackers: [I; HOUSE_COUNT]) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SubmissionId>,
    {
        let mut store = Self::default();
        for (slot, entries) in store.trackers.iter_mut().zip(trackers) {
            *slot = Some(entries.into_iter().map(Into::into).collect());
        }
        store
    }

    pub fn set_tracker(&mut self, house: House, entries: Option<Vec<SubmissionId>>) {
        self.trackers[house.index()] = entries;
    }

    pub fn tracker(&self, house: House) -> Option<&[SubmissionId]> {
        self.trackers[house.index()].as_deref()
    }

    pub fn set_ledger(&mut self, contents: impl Into<String>) {
        self.ledger = Some(contents.into());
    }

    pub fn ledger_text(&self) -> Option<&str> {
        self.ledger.as_deref()
    }

    pub fn is_ledger_locked(&self) -> bool {
        self.ledger_locked
    }

    pub fn round_log(&self, group: u64) -> Option<&str> {
        self.round_logs.get(&group).map(String::as_str)
    }

    pub fn round_log_count(&self) -> usize {
        self.round_logs.len()
    }
}

impl Store for MemoryStore {
    fn read_tracker(&self, house: House) -> Result<Option<Vec<SubmissionId>>> {
        Ok(self.trackers[house.index()].clone())
    }

    fn write_tracker(&mut self, house: House, entries: &[SubmissionId]) -> Result<()> {
        self.trackers[house.index()] = Some(entries.to_vec());
        Ok(())
    }

    fn read_ledger(&self) -> Result<Option<String>> {
        Ok(self.ledger.clone())
    }

    fn write_ledger(&mut self, contents: &str) -> Result<()> {
        self.ledger = Some(contents.to_string());
        Ok(())
    }

    fn lock_ledger(&mut self) -> Result<()> {
        if self.ledger_locked {
            return Err(Error::LedgerBusy(PathBuf::from("<memory>")));
        }
        self.ledger_locked = true;
        Ok(())
    }

    fn unlock_ledger(&mut self) -> Result<()> {
        self.ledger_locked = false;
        Ok(())
    }

    fn read_next_group(&self) -> Result<Option<u64>> {
        Ok(self.next_group)
    }

    fn write_next_group(&mut self, next: u64) -> Result<()> {
        self.next_group = Some(next);
        Ok(())
    }

    fn begin_round_log(&mut self, group: u64) -> Result<()> {
        self.round_logs.insert(group, String::new());
        Ok(())
    }

    fn append_round_log(&mut self, group: u64, text: &str) -> Result<()> {
        self.round_logs.entry(group).or_default().push_str(text);
        Ok(())
    }
}
