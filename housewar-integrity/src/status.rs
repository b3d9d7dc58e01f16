//! Hash-or-status values

use std::fmt;

/// Status recorded instead of a hash when an artifact could not be hashed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sentinel {
    FileNotFound,
    NotAValidWarrior,
    Error,
}

impl Sentinel {
    pub const ALL: [Sentinel; 3] = [
        Sentinel::FileNotFound,
        Sentinel::NotAValidWarrior,
        Sentinel::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Sentinel::FileNotFound => "FILE_NOT_FOUND",
            Sentinel::NotAValidWarrior => "NOT_A_VALID_WARRIOR",
            Sentinel::Error => "ERROR",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sentinel| sentinel.as_str() == s)
    }
}

/// Ground-truth value: a content hash or a sentinel status
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HashValue {
    Hash(String),
    Status(Sentinel),
}

impl HashValue {
    pub fn parse(s: &str) -> Self {
        match Sentinel::parse(s) {
            Some(sentinel) => HashValue::Status(sentinel),
            None => HashValue::Hash(s.to_string()),
        }
    }

    pub fn sentinel(&self) -> Option<Sentinel> {
        match self {
            HashValue::Status(sentinel) => Some(*sentinel),
            HashValue::Hash(_) => None,
        }
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashValue::Hash(hash) => f.write_str(hash),
            HashValue::Status(sentinel) => f.write_str(sentinel.as_str()),
        }
    }
}
