//! Error types for tournament state

use std::path::PathBuf;

use crate::house::{House, HOUSE_COUNT};

/// Errors raised by the core scheduling state
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing tracker data for {0}")]
    MissingData(House),

    #[error("normalized tracker length overflows for counts {0:?}")]
    LengthOverflow([usize; HOUSE_COUNT]),

    #[error("score ledger line {line_no} is malformed: {line:?}")]
    LedgerCorrupt { line_no: usize, line: String },

    #[error("score ledger is locked by another writer: {}", .0.display())]
    LedgerBusy(PathBuf),

    #[error("group counter is malformed: {0:?}")]
    CounterCorrupt(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
