//! Group scheduling - draws, battles and scoring
//!
//! Level 1 - Orchestration and Level 2 - Phases

use housewar_core::normalize::normalize_trackers;
use housewar_core::{
    all_houses_ready, draw_next, ledger, remaining, Error, House, NormalizeSummary, Store,
    Submission, SubmissionResolver, HOUSE_COUNT,
};
use rand::Rng;

use crate::match_play::{play_match, round_robin_pairings, MatchResult};
use crate::round_log;
use crate::simulator::BattleSimulator;

/// Why scheduling stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltReason {
    /// A tracker was absent or empty before normalization
    MissingData(House),
    /// A house's queue was empty before the next group
    NoFullGroup,
    /// A draw came back empty while forming a group
    QueueExhausted(House),
}

/// One completed group
#[derive(Clone, Debug)]
pub struct GroupResult {
    /// Sequence number
    pub number: u64,
    /// One submission per house, in draw order
    pub members: Vec<Submission>,
    /// Six pairings in fixed order
    pub matches: Vec<MatchResult>,
    /// Points awarded per house in this group
    pub tally: [u64; HOUSE_COUNT],
}

impl GroupResult {
    /// Points awarded to one house in this group
    pub fn points_for(&self, house: House) -> u64 {
        self.tally[house.index()]
    }
}

/// Scheduling events passed to the run callback
#[derive(Clone, Copy, Debug)]
pub enum Progress<'a> {
    /// Scheduling is about to start; at most `groups` groups can form
    Started { groups: usize },
    GroupComplete(&'a GroupResult),
}

/// Summary of one scheduling invocation
#[derive(Clone, Debug)]
pub struct ScheduleSummary {
    /// Normalization result, when normalization ran and succeeded
    pub normalized: Option<NormalizeSummary>,
    /// Completed groups in order
    pub groups: Vec<GroupResult>,
    /// Group number the next invocation will use
    pub next_group: u64,
    /// Points awarded per house during this invocation
    pub points: [u64; HOUSE_COUNT],
    pub halt: HaltReason,
}

impl ScheduleSummary {
    pub fn groups_played(&self) -> usize {
        self.groups.len()
    }
}

/// Tournament scheduler
///
/// Owns the storage backend, simulator, submission resolver and random
/// source for one run. Everything is sequential; each group completes before
/// the next group's draws begin.
pub struct Scheduler<S, B, V, R> {
    store: S,
    simulator: B,
    resolver: V,
    rng: R,
    rounds: u32,
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

impl<S, B, V, R> Scheduler<S, B, V, R>
where
    S: Store,
    B: BattleSimulator,
    V: SubmissionResolver,
    R: Rng,
{
    /// Create a scheduler running `rounds` simulator iterations per battle
    pub fn new(store: S, simulator: B, resolver: V, rng: R, rounds: u32) -> Self {
        Self {
            store,
            simulator,
            resolver,
            rng,
            rounds,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn simulator(&self) -> &B {
        &self.simulator
    }

    /// Run a tournament invocation (Level 1 orchestration)
    ///
    /// This function reads like a table of contents:
    /// 1. Normalize trackers (unless resuming)
    /// 2. Form and play groups until a queue runs dry
    pub fn run(&mut self, normalize: bool) -> Result<ScheduleSummary, Error> {
        self.run_with_callback(normalize, |_| {})
    }

    /// Run, reporting scheduling progress to `on_progress`
    pub fn run_with_callback<F>(&mut self, normalize: bool, on_progress: F) -> Result<ScheduleSummary, Error>
    where
        F: FnMut(Progress<'_>),
    {
        let normalized = if normalize {
            match self.normalize()? {
                Ok(summary) => Some(summary),
                Err(house) => {
                    let next_group = self.store.read_next_group()?.unwrap_or(1);
                    return Ok(ScheduleSummary {
                        normalized: None,
                        groups: Vec::new(),
                        next_group,
                        points: [0; HOUSE_COUNT],
                        halt: HaltReason::MissingData(house),
                    });
                }
            }
        } else {
            None
        };

        let mut summary = self.schedule(on_progress)?;
        summary.normalized = normalized;
        Ok(summary)
    }

    // ========================================================================
    // Level 2 - Phases
    // ========================================================================

    /// Normalize every tracker; the inner error names a house with no data
    pub fn normalize(&mut self) -> Result<Result<NormalizeSummary, House>, Error> {
        match normalize_trackers(&mut self.store) {
            Ok(summary) => Ok(Ok(summary)),
            Err(Error::MissingData(house)) => {
                tracing::warn!("Cannot normalize: missing data for {}", house);
                Ok(Err(house))
            }
            Err(e) => Err(e),
        }
    }

    /// Play groups until any house runs out of submissions
    pub fn schedule<F>(&mut self, mut on_progress: F) -> Result<ScheduleSummary, Error>
    where
        F: FnMut(Progress<'_>),
    {
        on_progress(Progress::Started {
            groups: self.expected_groups()?,
        });

        let mut next_group = self.store.read_next_group()?.unwrap_or(1);
        let mut groups = Vec::new();
        let mut points = [0; HOUSE_COUNT];

        let halt = loop {
            if !all_houses_ready(&self.store)? {
                tracing::info!("No more full groups");
                break HaltReason::NoFullGroup;
            }

            let members = match self.form_group(next_group)? {
                Ok(members) => members,
                Err(house) => break HaltReason::QueueExhausted(house),
            };

            let group = self.play_group(next_group, members)?;
            for house in House::ALL {
                points[house.index()] += group.points_for(house);
            }

            next_group += 1;
            self.store.write_next_group(next_group)?;

            tracing::info!("Group {} complete (tally {:?})", group.number, group.tally);
            on_progress(Progress::GroupComplete(&group));
            groups.push(group);
        };

        Ok(ScheduleSummary {
            normalized: None,
            groups,
            next_group,
            points,
            halt,
        })
    }

    /// Draw one submission per house in order 1..4
    ///
    /// An empty draw discards the group; the inner error names that house.
    pub fn form_group(&mut self, number: u64) -> Result<Result<Vec<Submission>, House>, Error> {
        let mut members = Vec::with_capacity(HOUSE_COUNT);
        for house in House::ALL {
            match draw_next(&mut self.store, house, &mut self.rng)? {
                Some(id) => members.push(self.resolver.resolve(house, &id)),
                None => {
                    tracing::warn!("{} out of submissions; group {} discarded", house, number);
                    return Ok(Err(house));
                }
            }
        }
        Ok(Ok(members))
    }

    /// Resolve all six pairings of a formed group (Level 2 phase)
    pub fn play_group(&mut self, number: u64, members: Vec<Submission>) -> Result<GroupResult, Error> {
        self.store.begin_round_log(number)?;
        self.store.append_round_log(number, &round_log::header(&members))?;

        let mut tally = [0; HOUSE_COUNT];
        let mut matches = Vec::with_capacity(6);

        for (i, j) in round_robin_pairings(members.len()) {
            let result = play_match((i, j), &members[i], &members[j], &mut self.simulator, self.rounds);

            self.store
                .append_round_log(number, &round_log::match_lines(&result, &members))?;
            if let Some(house) = result.winning_house(&members) {
                self.award(house, &mut tally)?;
            }
            matches.push(result);
        }

        self.store.append_round_log(number, &round_log::footer(&tally))?;

        Ok(GroupResult {
            number,
            members,
            matches,
            tally,
        })
    }

    // ========================================================================
    // Level 3 - Steps
    // ========================================================================

    /// Groups that can still be formed: the shortest queue
    fn expected_groups(&self) -> Result<usize, Error> {
        let mut shortest = usize::MAX;
        for house in House::ALL {
            shortest = shortest.min(remaining(&self.store, house)?);
        }
        Ok(shortest)
    }

    /// One point to a house: ledger first, then the group tally
    fn award(&mut self, house: House, tally: &mut [u64; HOUSE_COUNT]) -> Result<(), Error> {
        ledger::increment(&mut self.store, house, 1)?;
        tally[house.index()] += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::SimulatorError;
    use housewar_core::{MemoryStore, StaticResolver, Validity};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::path::Path;

    /// Reports a fixed line for every battle
    struct FixedSimulator(String);

    impl BattleSimulator for FixedSimulator {
        fn battle(&mut self, _a: &Path, _b: &Path, _rounds: u32) -> Result<String, SimulatorError> {
            Ok(self.0.clone())
        }
    }

    fn house(n: u8) -> House {
        House::new(n).unwrap()
    }

    fn scheduler(
        store: MemoryStore,
        line: &str,
        resolver: StaticResolver,
    ) -> Scheduler<MemoryStore, FixedSimulator, StaticResolver, ChaCha8Rng> {
        Scheduler::new(
            store,
            FixedSimulator(line.to_string()),
            resolver,
            ChaCha8Rng::seed_from_u64(42),
            1000,
        )
    }

    #[test]
    fn test_terminates_after_lcm_groups() {
        let store = MemoryStore::with_trackers([
            vec!["a1", "a2"],
            vec!["b1", "b2", "b3"],
            vec!["c1", "c2", "c3", "c4"],
            vec!["d1", "d2", "d3", "d4", "d5", "d6"],
        ]);
        let mut sched = scheduler(store, "Results: 1 1 998", StaticResolver::new());
        let summary = sched.run(true).unwrap();

        assert_eq!(summary.normalized.as_ref().map(|n| n.length), Some(12));
        assert_eq!(summary.groups_played(), 12);
        assert_eq!(summary.halt, HaltReason::NoFullGroup);
        assert_eq!(summary.next_group, 13);
        for h in House::ALL {
            assert_eq!(sched.store().tracker(h).unwrap().len(), 0);
        }
        assert_eq!(sched.store().round_log_count(), 12);
    }

    #[test]
    fn test_each_original_entry_plays_its_multiplicity() {
        let store = MemoryStore::with_trackers([
            vec!["a1", "a2"],
            vec!["b1"],
            vec!["c1", "c2", "c3"],
            vec!["d1"],
        ]);
        let mut sched = scheduler(store, "Results: 1 1 998", StaticResolver::new());
        let summary = sched.run(true).unwrap();

        assert_eq!(summary.groups_played(), 6);
        let count = |id: &str| {
            summary
                .groups
                .iter()
                .filter(|g| g.members.iter().any(|m| m.id == id))
                .count()
        };
        assert_eq!(count("a1"), 3);
        assert_eq!(count("b1"), 6);
        assert_eq!(count("c2"), 2);
    }

    #[test]
    fn test_empty_house_forms_no_groups() {
        let store = MemoryStore::with_trackers([vec!["a1"], vec!["b1"], vec![], vec!["d1"]]);
        let mut sched = scheduler(store, "Results: 5 0 0", StaticResolver::new());
        let summary = sched.run(true).unwrap();

        assert_eq!(summary.groups_played(), 0);
        assert_eq!(summary.halt, HaltReason::MissingData(house(3)));
        assert_eq!(sched.store().round_log_count(), 0);
        assert_eq!(sched.store().ledger_text(), None);
        // Trackers are left untouched
        assert_eq!(sched.store().tracker(house(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_group_scoring_and_ledger() {
        let store = MemoryStore::with_trackers([vec!["a"], vec!["b"], vec!["c"], vec!["d"]]);
        // First artifact always wins: position 0 wins 3, 1 wins 2, 2 wins 1
        let mut sched = scheduler(store, "results: 15 3 2", StaticResolver::new());
        let summary = sched.run(true).unwrap();

        assert_eq!(summary.groups_played(), 1);
        assert_eq!(summary.points, [3, 2, 1, 0]);
        assert_eq!(
            sched.store().ledger_text(),
            Some("House 1 - 3\nHouse 2 - 2\nHouse 3 - 1\nHouse 4 - 0\n")
        );

        let log = sched.store().round_log(1).unwrap();
        assert!(log.starts_with("Group Members:\na_1\nb_2\nc_3\nd_4\n"));
        assert!(log.contains("a_1 vs b_2: results: 15 3 2\na_1 wins\n"));
        assert!(log.ends_with("Group Scores:\nHouse 1: 3\nHouse 2: 2\nHouse 3: 1\nHouse 4: 0\n"));
    }

    #[test]
    fn test_forfeits_in_group() {
        let store = MemoryStore::with_trackers([vec!["a"], vec!["b"], vec!["c"], vec!["d"]]);
        let resolver = StaticResolver::new()
            .with(house(2), "b", Validity::Invalid)
            .with(house(4), "d", Validity::Missing);
        let mut sched = scheduler(store, "Results: 0 0 1000", resolver);
        let summary = sched.run(true).unwrap();

        // a-b: b invalid, a+1; a-c: tie; a-d: d missing, a+1;
        // b-c: b invalid, c+1; b-d: b invalid, d+1; c-d: d missing, c+1
        assert_eq!(summary.points, [2, 0, 2, 1]);
        let log = sched.store().round_log(1).unwrap();
        assert!(log.contains("b_2 is invalid. Point → a_1\n"));
        assert!(log.contains("d_4 missing, point → a_1\n"));
        assert!(log.contains("a_1 vs c_3: Results: 0 0 1000\nTie\n"));
    }

    #[test]
    fn test_unparsable_output_awards_nothing() {
        let store = MemoryStore::with_trackers([vec!["a"], vec!["b"], vec!["c"], vec!["d"]]);
        let mut sched = scheduler(store, "pmars: cannot open file", StaticResolver::new());
        let summary = sched.run(true).unwrap();

        assert_eq!(summary.groups_played(), 1);
        assert_eq!(summary.points, [0; HOUSE_COUNT]);
        let log = sched.store().round_log(1).unwrap();
        assert_eq!(log.matches("Could not parse\n").count(), 6);
    }

    #[test]
    fn test_group_counter_continues_across_runs() {
        let mut store = MemoryStore::with_trackers([vec!["a"], vec!["b"], vec!["c"], vec!["d"]]);
        store.write_next_group(5).unwrap();
        let mut sched = scheduler(store, "Results: 2 1 0", StaticResolver::new());
        let summary = sched.run(false).unwrap();

        assert_eq!(summary.groups[0].number, 5);
        assert_eq!(summary.next_group, 6);
        assert!(summary.normalized.is_none());
        assert!(sched.store().round_log(5).is_some());
        assert_eq!(sched.store().read_next_group().unwrap(), Some(6));
    }

    #[test]
    fn test_form_group_discards_on_empty_draw() {
        let store = MemoryStore::with_trackers([vec!["a"], vec!["b"], vec![], vec!["d"]]);
        let mut sched = scheduler(store, "Results: 2 1 0", StaticResolver::new());
        let formed = sched.form_group(1).unwrap();
        assert_eq!(formed, Err(house(3)));
        assert_eq!(sched.store().round_log_count(), 0);
    }

    #[test]
    fn test_corrupt_ledger_is_fatal() {
        let mut store = MemoryStore::with_trackers([vec!["a"], vec!["b"], vec!["c"], vec!["d"]]);
        store.set_ledger("House 1 : 4\n");
        let mut sched = scheduler(store, "Results: 2 1 0", StaticResolver::new());
        let err = sched.run(true).unwrap_err();
        assert!(matches!(err, Error::LedgerCorrupt { line_no: 1, .. }));
    }

    #[test]
    fn test_callback_sees_every_group() {
        let store = MemoryStore::with_trackers([vec!["a", "b"], vec!["c"], vec!["d"], vec!["e"]]);
        let mut sched = scheduler(store, "Results: 2 1 0", StaticResolver::new());
        let mut seen = Vec::new();
        sched
            .run_with_callback(true, |event| {
                if let Progress::GroupComplete(g) = event {
                    seen.push(g.number);
                }
            })
            .unwrap();
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn test_started_reports_groups_after_normalizing() {
        let store = MemoryStore::with_trackers([
            vec!["a1", "a2"],
            vec!["b1", "b2", "b3"],
            vec!["c1"],
            vec!["d1"],
        ]);
        let mut sched = scheduler(store, "Results: 2 1 0", StaticResolver::new());
        let mut started = Vec::new();
        let mut completed = 0;
        let summary = sched
            .run_with_callback(true, |event| match event {
                Progress::Started { groups } => started.push(groups),
                Progress::GroupComplete(_) => completed += 1,
            })
            .unwrap();

        assert_eq!(started, vec![6]);
        assert_eq!(completed, summary.groups_played());
        assert_eq!(completed, 6);
    }

    #[test]
    fn test_missing_data_reports_no_progress() {
        let store = MemoryStore::with_trackers([vec!["a"], vec![], vec!["c"], vec!["d"]]);
        let mut sched = scheduler(store, "Results: 2 1 0", StaticResolver::new());
        let mut events = 0;
        let summary = sched.run_with_callback(true, |_| events += 1).unwrap();
        assert_eq!(events, 0);
        assert_eq!(summary.halt, HaltReason::MissingData(house(2)));
    }
}
