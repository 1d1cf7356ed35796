//! Property-based invariant tests for filtering and keyed reconciliation.
//!
//! 1. Filter preserves source order and keeps exactly the matching subset.
//! 2. Filter without a query copies the source.
//! 3. Reconcile leaves the bound view equal (by reference) to the target.
//! 4. A second reconcile against the same target is a no-op.
//! 5. Splice totals account for every length change.
//! 6. Splice and rewrite strategies agree.
//! 7. Kept slots never exceed the number of shared keys.
//! 8. Every slot of an order-preserving subsequence is kept.
//! 9. Derived flags depend only on the view length.

use std::collections::HashMap;
use std::rc::Rc;

use destlist_core::filter::{self, Matches};
use destlist_core::flags::{DerivedFlags, TOTAL_THRESHOLD};
use destlist_core::reconcile::{ApplyStrategy, Reconciler, reconcile};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Row {
    key: u8,
    serial: usize,
}

impl Matches<u8> for Row {
    fn matches(&self, query: &u8) -> bool {
        self.key % 4 == *query % 4
    }
}

fn key_of(row: &Row) -> u8 {
    row.key
}

fn rows(keys: &[u8], serial_base: usize) -> Vec<Rc<Row>> {
    keys.iter()
        .enumerate()
        .map(|(i, &key)| {
            Rc::new(Row {
                key,
                serial: serial_base + i,
            })
        })
        .collect()
}

/// Small key alphabet so duplicates and shared keys are common.
fn keys_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..12, 0..40)
}

/// Distinct keys below 100, in arbitrary order.
fn distinct_keys_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::btree_set(0u8..100, 0..40)
        .prop_map(|keys| keys.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

/// Target built from a mix of reused previous rows and fresh rows.
fn target(previous: &[Rc<Row>], picks: &[(bool, u8)]) -> Vec<Rc<Row>> {
    picks
        .iter()
        .enumerate()
        .map(|(i, &(reuse, key))| {
            if reuse && !previous.is_empty() {
                Rc::clone(&previous[usize::from(key) % previous.len()])
            } else {
                Rc::new(Row {
                    key,
                    serial: 10_000 + i,
                })
            }
        })
        .collect()
}

fn assert_same_refs(bound: &[Rc<Row>], next: &[Rc<Row>]) -> Result<(), TestCaseError> {
    prop_assert_eq!(bound.len(), next.len());
    for (slot, (a, b)) in bound.iter().zip(next).enumerate() {
        prop_assert!(
            Rc::ptr_eq(a, b),
            "slot {} holds serial {} instead of {}",
            slot,
            a.serial,
            b.serial
        );
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Filter
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn filter_keeps_matching_subset_in_order(keys in keys_strategy(), query in 0u8..4) {
        let source = rows(&keys, 0);
        let view = filter::apply(&source, Some(&query));

        let expected: Vec<usize> = source
            .iter()
            .filter(|r| r.matches(&query))
            .map(|r| r.serial)
            .collect();
        let actual: Vec<usize> = view.iter().map(|r| r.serial).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn filter_without_query_copies_source(keys in keys_strategy()) {
        let source = rows(&keys, 0);
        let view = filter::apply::<Row, u8>(&source, None);
        assert_same_refs(&view, &source)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3-4. Reconcile result and fixed point
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reconcile_matches_target(
        keys in keys_strategy(),
        picks in prop::collection::vec((any::<bool>(), 0u8..12), 0..40),
    ) {
        let previous = rows(&keys, 0);
        let next = target(&previous, &picks);

        let mut bound = previous.clone();
        reconcile(&mut bound, &next, key_of);
        assert_same_refs(&bound, &next)?;
    }

    #[test]
    fn second_reconcile_is_noop(
        keys in keys_strategy(),
        picks in prop::collection::vec((any::<bool>(), 0u8..12), 0..40),
    ) {
        let previous = rows(&keys, 0);
        let next = target(&previous, &picks);

        let mut bound = previous;
        reconcile(&mut bound, &next, key_of);
        let second = reconcile(&mut bound, &next, key_of);
        prop_assert!(second.is_noop(), "second pass mutated: {:?}", second);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5-8. Splice accounting
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn splice_totals_account_for_length(
        keys in keys_strategy(),
        picks in prop::collection::vec((any::<bool>(), 0u8..12), 0..40),
    ) {
        let previous = rows(&keys, 0);
        let next = target(&previous, &picks);

        let mut bound = previous.clone();
        let report = reconcile(&mut bound, &next, key_of);
        prop_assert_eq!(
            previous.len() + report.inserted() - report.removed(),
            next.len()
        );
        for pair in report.splices.windows(2) {
            prop_assert!(pair[0].index < pair[1].index || pair[0].added.end <= pair[1].index);
        }
    }

    #[test]
    fn strategies_agree(
        keys in keys_strategy(),
        picks in prop::collection::vec((any::<bool>(), 0u8..12), 0..40),
    ) {
        let previous = rows(&keys, 0);
        let next = target(&previous, &picks);

        let mut spliced = previous.clone();
        let a = Reconciler::new()
            .with_max_shifting_splices(usize::MAX)
            .reconcile(&mut spliced, &next, key_of);
        let mut rewritten = previous.clone();
        let b = Reconciler::new()
            .with_max_shifting_splices(0)
            .reconcile(&mut rewritten, &next, key_of);

        prop_assert_eq!(a.strategy, ApplyStrategy::Splice);
        prop_assert_eq!(&a.splices, &b.splices);
        prop_assert_eq!(&a.refreshed, &b.refreshed);
        assert_same_refs(&spliced, &next)?;
        assert_same_refs(&rewritten, &next)?;
    }

    #[test]
    fn kept_slots_bounded_by_shared_keys(
        keys in keys_strategy(),
        picks in prop::collection::vec((any::<bool>(), 0u8..12), 0..40),
    ) {
        let previous = rows(&keys, 0);
        let next = target(&previous, &picks);

        let mut prev_counts: HashMap<u8, usize> = HashMap::new();
        for row in &previous {
            *prev_counts.entry(row.key).or_default() += 1;
        }
        let mut next_counts: HashMap<u8, usize> = HashMap::new();
        for row in &next {
            *next_counts.entry(row.key).or_default() += 1;
        }
        let shared: usize = prev_counts
            .iter()
            .map(|(k, n)| (*n).min(next_counts.get(k).copied().unwrap_or(0)))
            .sum();

        let mut bound = previous.clone();
        let report = reconcile(&mut bound, &next, key_of);
        let kept = previous.len() - report.removed();
        prop_assert!(kept <= shared, "kept {} > shared {}", kept, shared);
    }

    #[test]
    fn order_preserving_merge_keeps_every_shared_slot(
        keys in distinct_keys_strategy(),
        keep in prop::collection::vec((any::<bool>(), any::<bool>()), 40),
        fresh in prop::collection::vec((0usize..=40, 100u8..=255), 0..20),
    ) {
        let previous = rows(&keys, 0);

        // Walk `previous`, keeping a subsequence (some kept rows are new
        // objects with the same key) and interleaving rows with unseen keys.
        let mut next = Vec::new();
        let (mut kept, mut replaced) = (0, 0);
        for position in 0..=previous.len() {
            for (i, &(at, key)) in fresh.iter().enumerate() {
                if at.min(previous.len()) == position {
                    next.push(Rc::new(Row {
                        key,
                        serial: 20_000 + i,
                    }));
                }
            }
            let Some(row) = previous.get(position) else {
                break;
            };
            let (retain, replace) = keep[position];
            if !retain {
                continue;
            }
            kept += 1;
            if replace {
                replaced += 1;
                next.push(Rc::new(Row {
                    key: row.key,
                    serial: 30_000 + position,
                }));
            } else {
                next.push(Rc::clone(row));
            }
        }

        let mut bound = previous.clone();
        let report = reconcile(&mut bound, &next, key_of);
        prop_assert_eq!(report.removed(), previous.len() - kept);
        prop_assert_eq!(report.inserted(), fresh.len());
        prop_assert_eq!(report.refreshed.len(), replaced);
        assert_same_refs(&bound, &next)?;
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9. Derived flags
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn flags_depend_only_on_length(len in 0usize..200) {
        let flags = DerivedFlags::for_len(len);
        prop_assert_eq!(flags.non_empty, len > 0);
        prop_assert_eq!(flags.exceeds_threshold, len > TOTAL_THRESHOLD);
    }
}
