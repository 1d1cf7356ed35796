#![forbid(unsafe_code)]

//! Minimal-edit keyed reconciliation of a bound view.
//!
//! A virtualized renderer keys its row reuse off slot positions in the array
//! it is bound to. Replacing that array wholesale on every upstream change
//! throws away scroll position, selection and per-row state. This module
//! instead mutates the bound `Vec` in place so that it ends up equal to the
//! newly computed sequence while leaving every slot whose key survived
//! untouched.
//!
//! # Algorithm
//!
//! 1. Index the bound sequence by key. Duplicate keys are legal; their slots
//!    are kept in ascending order.
//! 2. Walk the target sequence left to right and consume, for each item, the
//!    first unused bound slot with the same key.
//! 3. Matched slots that are still in relative order become *anchors* (the
//!    longest increasing run of matched slot indices). Matched slots that
//!    would have to move are treated as a removal plus an insertion.
//! 4. Every gap between two anchors becomes one [`Splice`]. Empty gaps emit
//!    nothing, so reconciling against an unchanged target is a no-op.
//! 5. Splices are applied left to right. Anchored slots then take the target's
//!    reference if it is a different object with the same key.
//!
//! Key equality is the only criterion for reuse; object identity and the
//! remaining fields are never compared.
//!
//! # Complexity
//!
//! Indexing and matching are O(n) expected with hashed keys; the anchor run is
//! O(n log n). Applying splices one by one shifts the tail of the buffer for
//! every size-changing splice, so past a configurable number of those the
//! buffer is rewritten in a single linear pass instead. Both paths produce the
//! same contents and report the same splices.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use destlist_core::reconcile::reconcile;
//!
//! let a: Rc<str> = Rc::from("a");
//! let b: Rc<str> = Rc::from("b");
//! let c: Rc<str> = Rc::from("c");
//!
//! let mut bound = vec![a.clone(), b.clone()];
//! let report = reconcile(&mut bound, &[b.clone(), c.clone()], |s: &str| s.to_owned());
//!
//! assert!(Rc::ptr_eq(&bound[0], &b));
//! assert!(Rc::ptr_eq(&bound[1], &c));
//! assert_eq!(report.removed(), 1);
//! assert_eq!(report.inserted(), 1);
//! ```

use std::ops::Range;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::key::KeyFn;

/// Default number of size-changing splices applied in place before the
/// reconciler switches to a linear rewrite.
pub const DEFAULT_MAX_SHIFTING_SPLICES: usize = 8;

/// One in-place edit of the bound sequence.
///
/// Splices are ordered and must be applied left to right: `index` is a
/// position in the sequence as it looks after all earlier splices ran, which
/// is also the position of the first inserted item in the final sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    /// Position where the edit starts.
    pub index: usize,
    /// Number of bound elements removed at `index`.
    pub removed: usize,
    /// Range of the target sequence inserted at `index`.
    pub added: Range<usize>,
}

impl Splice {
    /// Number of inserted elements.
    #[must_use]
    pub fn added_count(&self) -> usize {
        self.added.len()
    }

    /// Whether applying this splice moves the tail of the buffer.
    #[must_use]
    pub fn shifts_tail(&self) -> bool {
        self.removed != self.added.len()
    }
}

/// How the splices of a pass were written into the bound buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyStrategy {
    /// Each splice was applied with `Vec::splice`.
    #[default]
    Splice,
    /// The buffer was rewritten slot by slot in one pass.
    Rewrite,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Positional edits, in application order.
    pub splices: Vec<Splice>,
    /// Result positions of kept slots that now hold a different object with
    /// the same key.
    pub refreshed: Vec<usize>,
    /// How the edits were written.
    pub strategy: ApplyStrategy,
}

impl Reconciliation {
    /// True if the bound sequence was not touched at all.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.splices.is_empty() && self.refreshed.is_empty()
    }

    /// Total number of inserted elements.
    #[must_use]
    pub fn inserted(&self) -> usize {
        self.splices.iter().map(Splice::added_count).sum()
    }

    /// Total number of removed elements.
    #[must_use]
    pub fn removed(&self) -> usize {
        self.splices.iter().map(|s| s.removed).sum()
    }
}

/// Keyed reconciler with a tunable in-place/rewrite threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciler {
    max_shifting_splices: usize,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self {
            max_shifting_splices: DEFAULT_MAX_SHIFTING_SPLICES,
        }
    }
}

impl Reconciler {
    /// Create a reconciler with the default threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many size-changing splices are applied in place before the
    /// pass falls back to a linear rewrite.
    #[must_use]
    pub fn with_max_shifting_splices(mut self, max: usize) -> Self {
        self.max_shifting_splices = max;
        self
    }

    /// Current in-place threshold.
    #[must_use]
    pub fn max_shifting_splices(&self) -> usize {
        self.max_shifting_splices
    }

    /// Mutate `previous` in place until it equals `next` element by element.
    ///
    /// After the call every slot holds the same `Rc` as the corresponding
    /// position of `next`. Never fails; empty inputs on either side are valid.
    pub fn reconcile<E, F>(
        &self,
        previous: &mut Vec<Rc<E>>,
        next: &[Rc<E>],
        key_fn: F,
    ) -> Reconciliation
    where
        E: ?Sized,
        F: KeyFn<E>,
    {
        self.reconcile_with(previous, next, &key_fn)
    }

    /// [`reconcile`](Self::reconcile) with a borrowed key function.
    pub fn reconcile_with<E, F>(
        &self,
        previous: &mut Vec<Rc<E>>,
        next: &[Rc<E>],
        key_fn: &F,
    ) -> Reconciliation
    where
        E: ?Sized,
        F: KeyFn<E> + ?Sized,
    {
        let plan = plan(previous, next, key_fn);

        let shifting = plan.splices.iter().filter(|s| s.shifts_tail()).count();
        let strategy = if shifting > self.max_shifting_splices {
            ApplyStrategy::Rewrite
        } else {
            ApplyStrategy::Splice
        };

        match strategy {
            ApplyStrategy::Splice => {
                for splice in &plan.splices {
                    let range = splice.index..splice.index + splice.removed;
                    drop(previous.splice(range, next[splice.added.clone()].iter().cloned()));
                }
                for &slot in &plan.refreshed {
                    previous[slot] = Rc::clone(&next[slot]);
                }
            }
            ApplyStrategy::Rewrite => rewrite(previous, next),
        }

        crate::trace!(
            next = next.len(),
            splices = plan.splices.len(),
            refreshed = plan.refreshed.len(),
            rewrite = strategy == ApplyStrategy::Rewrite,
            "reconciled bound view"
        );

        Reconciliation {
            splices: plan.splices,
            refreshed: plan.refreshed,
            strategy,
        }
    }

    /// Compute the splices that would turn `previous` into `next` without
    /// touching either sequence.
    #[must_use]
    pub fn plan<E, F>(&self, previous: &[Rc<E>], next: &[Rc<E>], key_fn: F) -> Vec<Splice>
    where
        E: ?Sized,
        F: KeyFn<E>,
    {
        plan(previous, next, &key_fn).splices
    }
}

/// Reconcile with the default [`Reconciler`].
pub fn reconcile<E, F>(previous: &mut Vec<Rc<E>>, next: &[Rc<E>], key_fn: F) -> Reconciliation
where
    E: ?Sized,
    F: KeyFn<E>,
{
    Reconciler::default().reconcile(previous, next, key_fn)
}

struct Plan {
    splices: Vec<Splice>,
    refreshed: Vec<usize>,
}

/// Bound slots sharing one key, consumed front to back.
struct Slots {
    indices: SmallVec<[usize; 2]>,
    consumed: usize,
}

impl Slots {
    fn take(&mut self) -> Option<usize> {
        let slot = self.indices.get(self.consumed).copied()?;
        self.consumed += 1;
        Some(slot)
    }
}

fn plan<E, F>(previous: &[Rc<E>], next: &[Rc<E>], key_fn: &F) -> Plan
where
    E: ?Sized,
    F: KeyFn<E> + ?Sized,
{
    let mut by_key: FxHashMap<F::Key, Slots> = FxHashMap::default();
    by_key.reserve(previous.len());
    for (i, element) in previous.iter().enumerate() {
        by_key
            .entry(key_fn.key(element))
            .or_insert_with(|| Slots {
                indices: SmallVec::new(),
                consumed: 0,
            })
            .indices
            .push(i);
    }

    // (previous slot, next position) for every matched target item.
    let mut matched: Vec<(usize, usize)> = Vec::with_capacity(next.len().min(previous.len()));
    if !by_key.is_empty() {
        for (j, element) in next.iter().enumerate() {
            if let Some(i) = by_key.get_mut(&key_fn.key(element)).and_then(Slots::take) {
                matched.push((i, j));
            }
        }
    }

    let anchors = if matched.windows(2).all(|w| w[0].0 < w[1].0) {
        matched
    } else {
        let slots: Vec<usize> = matched.iter().map(|&(i, _)| i).collect();
        longest_increasing_run(&slots)
            .into_iter()
            .map(|k| matched[k])
            .collect()
    };

    let mut splices = Vec::new();
    let mut refreshed = Vec::new();
    let (mut prev_cursor, mut next_cursor) = (0, 0);
    let sentinel = (previous.len(), next.len());
    for &(i, j) in anchors.iter().chain(std::iter::once(&sentinel)) {
        let removed = i - prev_cursor;
        if removed > 0 || j > next_cursor {
            splices.push(Splice {
                index: next_cursor,
                removed,
                added: next_cursor..j,
            });
        }
        if (i, j) != sentinel && !Rc::ptr_eq(&previous[i], &next[j]) {
            refreshed.push(j);
        }
        prev_cursor = i + 1;
        next_cursor = j + 1;
    }

    Plan { splices, refreshed }
}

/// Overwrite `previous` with `next`, touching only slots that differ.
fn rewrite<E: ?Sized>(previous: &mut Vec<Rc<E>>, next: &[Rc<E>]) {
    for (slot, element) in previous.iter_mut().zip(next) {
        if !Rc::ptr_eq(slot, element) {
            *slot = Rc::clone(element);
        }
    }
    if previous.len() > next.len() {
        previous.truncate(next.len());
    } else {
        let kept = previous.len();
        previous.extend(next[kept..].iter().cloned());
    }
}

/// Positions (into `values`) of one longest strictly increasing subsequence.
///
/// Patience sorting with predecessor links; ties resolve towards the earliest
/// positions so the result is deterministic.
fn longest_increasing_run(values: &[usize]) -> Vec<usize> {
    let mut tails: Vec<usize> = Vec::new();
    let mut parent: Vec<Option<usize>> = vec![None; values.len()];

    for (k, &value) in values.iter().enumerate() {
        let pos = tails.partition_point(|&t| values[t] < value);
        if pos > 0 {
            parent[k] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(k);
        } else {
            tails[pos] = k;
        }
    }

    let mut run = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(k) = cursor {
        run.push(k);
        cursor = parent[k];
    }
    run.reverse();
    run
}
