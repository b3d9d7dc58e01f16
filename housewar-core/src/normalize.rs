//! Tracker normalization
//!
//! Houses submit different numbers of entries. Every tracker is replicated
//! end-to-end up to the least common multiple of the four lengths so each
//! house fields exactly the same number of draws, and every original entry
//! appears exactly `L / c_h` times.

use crate::error::{Error, Result};
use crate::house::{House, SubmissionId, HOUSE_COUNT};
use crate::store::Store;

/// Outcome of normalizing all trackers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizeSummary {
    /// Common queue length after normalization
    pub length: usize,
    /// Pre-normalization entry count per house
    pub original_counts: [usize; HOUSE_COUNT],
}

impl NormalizeSummary {
    /// Replication factor applied to a house
    pub fn factor(&self, house: House) -> usize {
        self.length / self.original_counts[house.index()]
    }
}

pub fn gcd(a: usize, b: usize) -> usize {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Least common multiple; `None` when it doesn't fit in a `usize`
pub fn lcm(a: usize, b: usize) -> Option<usize> {
    if a == 0 || b == 0 {
        Some(0)
    } else {
        (a / gcd(a, b)).checked_mul(b)
    }
}

/// Least common multiple of a sequence (1 for an empty one)
pub fn lcm_all(values: impl IntoIterator<Item = usize>) -> Option<usize> {
    values.into_iter().try_fold(1, lcm)
}

/// Replicate each list end-to-end up to the common length
///
/// Fails with [`Error::MissingData`] naming the first empty list, or
/// [`Error::LengthOverflow`] when the common length is not representable.
pub fn normalize_lists(
    lists: [Vec<SubmissionId>; HOUSE_COUNT],
) -> Result<([Vec<SubmissionId>; HOUSE_COUNT], NormalizeSummary)> {
    for house in House::ALL {
        if lists[house.index()].is_empty() {
            return Err(Error::MissingData(house));
        }
    }

    let original_counts = [lists[0].len(), lists[1].len(), lists[2].len(), lists[3].len()];
    let length = lcm_all(original_counts).ok_or(Error::LengthOverflow(original_counts))?;

    let normalized = lists.map(|list| {
        let factor = length / list.len();
        let mut out = Vec::with_capacity(length);
        for _ in 0..factor {
            out.extend(list.iter().cloned());
        }
        out
    });

    Ok((
        normalized,
        NormalizeSummary {
            length,
            original_counts,
        },
    ))
}

/// Normalize every house's persisted tracker in place
///
/// Nothing is written unless all four trackers are present and non-empty.
pub fn normalize_trackers<S: Store + ?Sized>(store: &mut S) -> Result<NormalizeSummary> {
    let mut lists: [Vec<SubmissionId>; HOUSE_COUNT] = Default::default();
    for house in House::ALL {
        match store.read_tracker(house)? {
            Some(entries) if !entries.is_empty() => lists[house.index()] = entries,
            _ => return Err(Error::MissingData(house)),
        }
    }

    let (normalized, summary) = normalize_lists(lists)?;
    for house in House::ALL {
        store.write_tracker(house, &normalized[house.index()])?;
    }

    tracing::info!(
        "Normalized trackers to {} entries (counts {:?})",
        summary.length,
        summary.original_counts
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn ids(prefix: &str, n: usize) -> Vec<SubmissionId> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    fn house(n: u8) -> House {
        House::new(n).unwrap()
    }

    #[test]
    fn test_lcm() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(lcm(4, 6), Some(12));
        assert_eq!(lcm_all([2, 3, 4, 6]), Some(12));
        assert_eq!(lcm_all([5, 5, 5, 5]), Some(5));
        assert_eq!(lcm_all([1, 7, 1, 1]), Some(7));
    }

    #[test]
    fn test_lcm_overflow_is_none() {
        let half = usize::MAX / 2;
        // Consecutive integers are coprime
        assert_eq!(lcm(half, half + 1), None);
        assert_eq!(lcm_all([half, half + 1, 3, 1]), None);
        assert_eq!(lcm_all([half, half, 1, 1]), Some(half));
    }

    #[test]
    fn test_normalize_2_3_4_6() {
        let lists = [ids("a", 2), ids("b", 3), ids("c", 4), ids("d", 6)];
        let (normalized, summary) = normalize_lists(lists.clone()).unwrap();

        assert_eq!(summary.length, 12);
        assert_eq!(summary.factor(house(1)), 6);
        for house in House::ALL {
            let queue = &normalized[house.index()];
            assert_eq!(queue.len(), 12);
            let factor = summary.factor(house);
            for entry in &lists[house.index()] {
                assert_eq!(queue.iter().filter(|e| *e == entry).count(), factor);
            }
        }
    }

    #[test]
    fn test_normalize_preserves_order_and_duplicates() {
        let lists = [
            vec!["x".to_string(), "y".to_string(), "x".to_string()],
            ids("b", 1),
            ids("c", 1),
            ids("d", 1),
        ];
        let (normalized, summary) = normalize_lists(lists).unwrap();
        assert_eq!(summary.length, 3);
        assert_eq!(normalized[0], vec!["x", "y", "x"]);
        assert_eq!(normalized[1], vec!["b0", "b0", "b0"]);
    }

    #[test]
    fn test_normalize_property_many_counts() {
        for c1 in 1..=5 {
            for c2 in 1..=4 {
                for c3 in [1, 3, 6] {
                    for c4 in [2, 5] {
                        let lists = [ids("a", c1), ids("b", c2), ids("c", c3), ids("d", c4)];
                        let (normalized, summary) = normalize_lists(lists).unwrap();
                        let expected = lcm_all([c1, c2, c3, c4]).unwrap();
                        assert_eq!(summary.length, expected);
                        assert!(normalized.iter().all(|q| q.len() == expected));
                    }
                }
            }
        }
    }

    #[test]
    fn test_normalize_empty_house_is_missing_data() {
        let lists = [ids("a", 2), vec![], ids("c", 1), vec![]];
        assert!(matches!(
            normalize_lists(lists),
            Err(Error::MissingData(h)) if h == house(2)
        ));
    }

    #[test]
    fn test_normalize_trackers_rewrites_store() {
        let mut store = MemoryStore::with_trackers([
            vec!["a1", "a2"],
            vec!["b1", "b2", "b3"],
            vec!["c1", "c2", "c3", "c4"],
            vec!["d1", "d2", "d3", "d4", "d5", "d6"],
        ]);
        let summary = normalize_trackers(&mut store).unwrap();
        assert_eq!(summary.length, 12);
        for house in House::ALL {
            assert_eq!(store.tracker(house).unwrap().len(), 12);
        }
        let first = store.tracker(house(1)).unwrap();
        assert_eq!(first.iter().filter(|e| *e == "a1").count(), 6);
    }

    #[test]
    fn test_normalize_trackers_absent_house_writes_nothing() {
        let mut store = MemoryStore::with_trackers([vec!["a1"], vec!["b1", "b2"], vec!["c1"], vec!["d1"]]);
        store.set_tracker(house(3), None);

        let err = normalize_trackers(&mut store).unwrap_err();
        assert!(matches!(err, Error::MissingData(h) if h == house(3)));
        assert_eq!(store.tracker(house(2)).unwrap().len(), 2);
    }
}
