//! Filesystem backend for [`Store`]

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::config::Layout;
use crate::error::{Error, Result};
use crate::house::{House, SubmissionId};
use crate::lines::non_blank_lines;
use crate::store::Store;

/// Plain-text files laid out according to a [`Layout`]
#[derive(Clone, Debug)]
pub struct FsStore {
    layout: Layout,
}

impl FsStore {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

impl Store for FsStore {
    fn read_tracker(&self, house: House) -> Result<Option<Vec<SubmissionId>>> {
        let path = self.layout.tracker_path(house);
        Ok(read_optional(&path)?.map(|text| non_blank_lines(&text).map(str::to_string).collect()))
    }

    fn write_tracker(&mut self, house: House, entries: &[SubmissionId]) -> Result<()> {
        let path = self.layout.tracker_path(house);
        let mut text = String::with_capacity(entries.iter().map(|e| e.len() + 1).sum());
        for entry in entries {
            text.push_str(entry);
            text.push('\n');
        }
        write_atomic(&path, text.as_bytes()).map_err(|e| Error::io(&path, e))
    }

    fn read_ledger(&self) -> Result<Option<String>> {
        read_optional(&self.layout.ledger_file)
    }

    fn write_ledger(&mut self, contents: &str) -> Result<()> {
        let path = &self.layout.ledger_file;
        write_atomic(path, contents.as_bytes()).map_err(|e| Error::io(path, e))
    }

    fn lock_ledger(&mut self) -> Result<()> {
        let path = self.layout.ledger_lock_path();
        ensure_parent(&path).map_err(|e| Error::io(&path, e))?;
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(Error::LedgerBusy(path)),
            Err(e) => Err(Error::io(&path, e)),
        }
    }

    fn unlock_ledger(&mut self) -> Result<()> {
        let path = self.layout.ledger_lock_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(&path, e)),
        }
    }

    fn read_next_group(&self) -> Result<Option<u64>> {
        match read_optional(&self.layout.group_counter_file)? {
            None => Ok(None),
            Some(text) => {
                let trimmed = text.trim();
                trimmed
                    .parse()
                    .map(Some)
                    .map_err(|_| Error::CounterCorrupt(trimmed.to_string()))
            }
        }
    }

    fn write_next_group(&mut self, next: u64) -> Result<()> {
        let path = &self.layout.group_counter_file;
        write_atomic(path, format!("{}\n", next).as_bytes()).map_err(|e| Error::io(path, e))
    }

    fn begin_round_log(&mut self, group: u64) -> Result<()> {
        let path = self.layout.round_log_path(group);
        ensure_parent(&path)
            .and_then(|_| fs::write(&path, b""))
            .map_err(|e| Error::io(&path, e))
    }

    fn append_round_log(&mut self, group: u64, text: &str) -> Result<()> {
        let path = self.layout.round_log_path(group);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut f| f.write_all(text.as_bytes()))
            .map_err(|e| Error::io(&path, e))
    }
}

/// Read a file, mapping "not found" to `None`
fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path, e)),
    }
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Write through a sibling temp file and rename over the target
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    ensure_parent(path)?;
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, bytes)?;
    fs::rename(temp_path, path)?;
    Ok(())
}
