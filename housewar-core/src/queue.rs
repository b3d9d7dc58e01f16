//! Draw queues: random removal without replacement

use rand::Rng;

use crate::error::Result;
use crate::house::{House, SubmissionId};
use crate::store::Store;

/// Draw one entry uniformly at random from a house's queue
///
/// The entry is removed and the remainder persisted before returning.
/// Returns `None` when the queue is empty or absent.
pub fn draw_next<S, R>(store: &mut S, house: House, rng: &mut R) -> Result<Option<SubmissionId>>
where
    S: Store + ?Sized,
    R: Rng,
{
    let mut entries = match store.read_tracker(house)? {
        Some(entries) if !entries.is_empty() => entries,
        _ => return Ok(None),
    };

    let idx = rng.gen_range(0..entries.len());
    let drawn = entries.remove(idx);
    store.write_tracker(house, &entries)?;

    tracing::debug!("{} drew {} ({} left)", house, drawn, entries.len());
    Ok(Some(drawn))
}

/// Number of entries left in a house's queue (0 when absent)
pub fn remaining<S: Store + ?Sized>(store: &S, house: House) -> Result<usize> {
    Ok(store.read_tracker(house)?.map_or(0, |entries| entries.len()))
}

/// True when every house can contribute to another group
pub fn all_houses_ready<S: Store + ?Sized>(store: &S) -> Result<bool> {
    for house in House::ALL {
        if remaining(store, house)? == 0 {
            return Ok(false);
        }
    }
    Ok(true)
}
