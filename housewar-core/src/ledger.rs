//! Score ledger: durable, additive points per house
//!
//! One line per label, `House 2 - 5`, sorted by label and rewritten on
//! every increment.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::house::House;
use crate::store::{LedgerGuard, Store};

/// Points keyed by ledger label, in label order
pub type Standings = BTreeMap<String, u64>;

/// Parse ledger text
///
/// Blank lines are ignored; any other line not shaped `label - integer` is
/// [`Error::LedgerCorrupt`].
pub fn parse_ledger(text: &str) -> Result<Standings> {
    let mut standings = Standings::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let corrupt = || Error::LedgerCorrupt {
            line_no: i + 1,
            line: raw.to_string(),
        };
        let (label, value) = line.split_once('-').ok_or_else(corrupt)?;
        let label = label.trim();
        if label.is_empty() {
            return Err(corrupt());
        }
        let points: u64 = value.trim().parse().map_err(|_| corrupt())?;
        standings.insert(label.to_string(), points);
    }
    Ok(standings)
}

pub fn render_ledger(standings: &Standings) -> String {
    standings
        .iter()
        .map(|(label, points)| format!("{} - {}\n", label, points))
        .collect()
}

/// Ensure all four houses have an entry
fn fill_defaults(standings: &mut Standings) {
    for house in House::ALL {
        standings.entry(house.label()).or_insert(0);
    }
}

/// Current standings, with absent houses at 0
pub fn standings<S: Store + ?Sized>(store: &S) -> Result<Standings> {
    let mut standings = match store.read_ledger()? {
        Some(text) => parse_ledger(&text)?,
        None => Standings::new(),
    };
    fill_defaults(&mut standings);
    Ok(standings)
}

/// Points held by a house in a standings table
pub fn points_for(standings: &Standings, house: House) -> u64 {
    standings.get(&house.label()).copied().unwrap_or(0)
}

/// Add `amount` to a house and rewrite the ledger
///
/// The load-modify-store cycle runs under the ledger lock. Returns the new
/// total for the house.
pub fn increment<S: Store + ?Sized>(store: &mut S, house: House, amount: u64) -> Result<u64> {
    let mut guard = LedgerGuard::acquire(store)?;

    let mut standings = match guard.read()? {
        Some(text) => parse_ledger(&text)?,
        None => Standings::new(),
    };
    fill_defaults(&mut standings);

    let total = standings.entry(house.label()).or_insert(0);
    *total += amount;
    let total = *total;

    guard.write(&render_ledger(&standings))?;
    tracing::debug!("{} +{} -> {}", house, amount, total);
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn house(n: u8) -> House {
        House::new(n).unwrap()
    }

    #[test]
    fn test_increment_from_empty() {
        let mut store = MemoryStore::new();
        assert_eq!(increment(&mut store, house(3), 1).unwrap(), 1);
        assert_eq!(
            store.ledger_text(),
            Some("House 1 - 0\nHouse 2 - 0\nHouse 3 - 1\nHouse 4 - 0\n")
        );
        assert!(!store.is_ledger_locked());
    }

    #[test]
    fn test_ledger_additivity() {
        let mut store = MemoryStore::new();
        let winners = [1, 2, 2, 4, 2, 1, 3, 2];
        for &w in &winners {
            increment(&mut store, house(w), 1).unwrap();
        }
        let table = standings(&store).unwrap();
        for h in House::ALL {
            let expected = winners.iter().filter(|&&w| w == h.number()).count() as u64;
            assert_eq!(points_for(&table, h), expected);
        }
    }

    #[test]
    fn test_parse_tolerates_spacing_and_blank_lines() {
        let table = parse_ledger("House 2-7\n\n  House 1 -  3  \n").unwrap();
        assert_eq!(table.get("House 1"), Some(&3));
        assert_eq!(table.get("House 2"), Some(&7));
    }

    #[test]
    fn test_unknown_labels_are_kept_sorted() {
        let mut store = MemoryStore::new();
        store.set_ledger("Staff - 2\nHouse 4 - 1\n");
        increment(&mut store, house(1), 2).unwrap();
        assert_eq!(
            store.ledger_text(),
            Some("House 1 - 2\nHouse 2 - 0\nHouse 3 - 0\nHouse 4 - 1\nStaff - 2\n")
        );
    }

    #[test]
    fn test_corrupt_line_is_fatal_and_releases_lock() {
        let mut store = MemoryStore::new();
        store.set_ledger("House 1 - 2\nHouse 2 = 5\n");
        let err = increment(&mut store, house(1), 1).unwrap_err();
        assert!(matches!(err, Error::LedgerCorrupt { line_no: 2, .. }));
        assert!(!store.is_ledger_locked());
        assert_eq!(store.ledger_text(), Some("House 1 - 2\nHouse 2 = 5\n"));
    }

    #[test]
    fn test_corrupt_values() {
        assert!(parse_ledger("House 1 - lots\n").is_err());
        assert!(parse_ledger("House 1 - -3\n").is_err());
        assert!(parse_ledger(" - 3\n").is_err());
    }

    #[test]
    fn test_busy_ledger() {
        let mut store = MemoryStore::new();
        store.lock_ledger().unwrap();
        assert!(matches!(increment(&mut store, house(1), 1), Err(Error::LedgerBusy(_))));
        assert_eq!(store.ledger_text(), None);
    }

    #[test]
    fn test_render_roundtrip() {
        let mut table = Standings::new();
        table.insert("House 2".into(), 4);
        table.insert("House 1".into(), 9);
        assert_eq!(render_ledger(&table), "House 1 - 9\nHouse 2 - 4\n");
        assert_eq!(parse_ledger(&render_ledger(&table)).unwrap(), table);
    }
}
