//! HOUSEWAR Core - Tournament state and scoring primitives
//!
//! This crate provides the durable state of a four-house tournament:
//! - Houses, submissions and validity flags
//! - Storage interface with filesystem and in-memory backends
//! - Tracker normalization (LCM replication)
//! - Draw queues (random removal without replacement)
//! - Score ledger (locked load-modify-store increments)
//! - Intake roster parsing

pub mod config;
pub mod error;
pub mod fs_store;
pub mod house;
pub mod ledger;
pub mod lines;
pub mod normalize;
pub mod queue;
pub mod roster;
pub mod store;
pub mod submission;

// Re-exports for convenient access
pub use config::Layout;
pub use error::{Error, Result};
pub use fs_store::{write_atomic, FsStore};
pub use house::{House, Submission, SubmissionId, Validity, HOUSE_COUNT};
pub use ledger::{increment, points_for, standings, Standings};
pub use normalize::{normalize_trackers, NormalizeSummary};
pub use queue::{all_houses_ready, draw_next, remaining};
pub use roster::{Roster, RosterEntry};
pub use store::{LedgerGuard, MemoryStore, Store};
pub use submission::{FsResolver, StaticResolver, SubmissionResolver};
