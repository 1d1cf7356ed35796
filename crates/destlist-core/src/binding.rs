#![forbid(unsafe_code)]

//! Reactive binding of a source list and a query to a reconciled view.
//!
//! The binding owns both inputs and the bound view. Each input carries a
//! version counter; every mutation advances it and is recorded in a
//! [`ChangeCoalescer`]. A recompute runs the whole pipeline once:
//!
//! ```text
//! source + query ──filter──▶ candidates ──reconcile──▶ view ──▶ DerivedFlags
//! ```
//!
//! In [`RecomputeMode::Deferred`] the first change after a flush returns
//! [`ChangeOutcome::FlushRequested`] and the host is expected to call
//! [`ReactiveBinding::flush`] on its next turn; further changes are absorbed.
//! Whatever the number of changes, the recompute reads the inputs as they are
//! when it runs. Recomputes take `&mut self`, so they are serialized and the
//! view has exactly one writer.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use destlist_core::binding::{ChangeOutcome, ReactiveBinding};
//! use destlist_core::filter::Matches;
//!
//! struct Name(&'static str);
//!
//! impl Matches<String> for Name {
//!     fn matches(&self, query: &String) -> bool {
//!         self.0.contains(query.as_str())
//!     }
//! }
//!
//! let mut binding = ReactiveBinding::new(|n: &Name| n.0);
//! let outcome = binding.set_source(vec![Rc::new(Name("alpha")), Rc::new(Name("beta"))]);
//! assert_eq!(outcome, ChangeOutcome::FlushRequested);
//! binding.set_query(Some("al".to_string()));
//!
//! let recompute = binding.flush().expect("inputs changed");
//! assert_eq!(binding.view().len(), 1);
//! assert!(recompute.flags.non_empty);
//! ```

use std::rc::Rc;

use crate::change_coalescer::{ChangeCoalescer, ChangeSet, Schedule};
use crate::config::{BindingConfig, RecomputeMode};
use crate::filter::{self, Matches};
use crate::flags::{DerivedFlags, DerivedStateTracker, FlagChanges};
use crate::key::KeyFn;
use crate::reconcile::{Reconciler, Reconciliation};

/// A value with a monotonically increasing version.
#[derive(Debug, Clone, Default)]
pub struct Tracked<T> {
    value: T,
    version: u64,
}

impl<T> Tracked<T> {
    /// Wrap `value` at version 0.
    pub fn new(value: T) -> Self {
        Self { value, version: 0 }
    }

    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the value and advance the version.
    pub fn set(&mut self, value: T) -> T {
        self.touch();
        std::mem::replace(&mut self.value, value)
    }

    /// Mutate the value in place and advance the version.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        self.touch();
        f(&mut self.value)
    }

    /// Advance the version without changing the value.
    ///
    /// Used when something reachable from the value changed behind a shared
    /// reference (an element's own fields, for instance).
    pub fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

/// What the caller should do after changing an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Nothing was pending: schedule a call to [`ReactiveBinding::flush`].
    FlushRequested,
    /// A flush is already pending and will observe this change.
    Coalesced,
    /// The view was recomputed synchronously; the report is available from
    /// [`ReactiveBinding::last_recompute`].
    Recomputed,
}

/// Report of one recompute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recompute {
    /// Inputs that changed since the previous recompute.
    pub changes: ChangeSet,
    /// Edits applied to the bound view.
    pub reconciliation: Reconciliation,
    /// Flags derived from the new view.
    pub flags: DerivedFlags,
    /// Flags that flipped.
    pub flag_changes: FlagChanges,
}

/// Source + query to reconciled view pipeline.
pub struct ReactiveBinding<E: ?Sized, Q, K> {
    source: Tracked<Vec<Rc<E>>>,
    query: Tracked<Option<Q>>,
    view: Vec<Rc<E>>,
    key_fn: K,
    reconciler: Reconciler,
    tracker: DerivedStateTracker,
    coalescer: ChangeCoalescer,
    config: BindingConfig,
    /// Input versions seen by the last recompute.
    observed: (u64, u64),
    recomputes: u64,
    last: Option<Recompute>,
}

impl<E, Q, K> ReactiveBinding<E, Q, K>
where
    E: Matches<Q> + ?Sized,
    K: KeyFn<E>,
{
    /// Create a binding with an empty source, no query and default config.
    pub fn new(key_fn: K) -> Self {
        Self::with_config(key_fn, BindingConfig::default())
    }

    /// Create a binding with an explicit configuration.
    pub fn with_config(key_fn: K, config: BindingConfig) -> Self {
        Self {
            source: Tracked::new(Vec::new()),
            query: Tracked::new(None),
            view: Vec::new(),
            key_fn,
            reconciler: Reconciler::new().with_max_shifting_splices(config.max_shifting_splices),
            tracker: DerivedStateTracker::new(),
            coalescer: ChangeCoalescer::new(),
            config,
            observed: (0, 0),
            recomputes: 0,
            last: None,
        }
    }

    /// Replace the source sequence.
    pub fn set_source(&mut self, source: Vec<Rc<E>>) -> ChangeOutcome {
        self.source.set(source);
        self.changed(ChangeSet::SOURCE)
    }

    /// Mutate the source sequence in place.
    pub fn update_source(&mut self, f: impl FnOnce(&mut Vec<Rc<E>>)) -> ChangeOutcome {
        self.source.update(f);
        self.changed(ChangeSet::SOURCE)
    }

    /// Report that an element of the source changed behind a shared reference.
    pub fn touch_source(&mut self) -> ChangeOutcome {
        self.source.touch();
        self.changed(ChangeSet::SOURCE)
    }

    /// Replace the query. `None` disables filtering.
    pub fn set_query(&mut self, query: Option<Q>) -> ChangeOutcome {
        self.query.set(query);
        self.changed(ChangeSet::QUERY)
    }

    fn changed(&mut self, change: ChangeSet) -> ChangeOutcome {
        let schedule = self.coalescer.push(change);
        match (self.config.recompute, schedule) {
            (RecomputeMode::Immediate, _) => {
                let _ = self.flush();
                ChangeOutcome::Recomputed
            }
            (RecomputeMode::Deferred, Schedule::Requested) => ChangeOutcome::FlushRequested,
            (RecomputeMode::Deferred, Schedule::Coalesced) => ChangeOutcome::Coalesced,
        }
    }

    /// Run the pending recompute, if any input advanced since the last one.
    ///
    /// Returns `None` when nothing changed.
    pub fn flush(&mut self) -> Option<Recompute> {
        let changes = self.coalescer.flush();
        if self.versions() == self.observed {
            return None;
        }
        Some(self.recompute(changes))
    }

    /// Recompute unconditionally, even if no input changed.
    pub fn refresh(&mut self) -> Recompute {
        let changes = self.coalescer.flush();
        self.recompute(changes)
    }

    fn recompute(&mut self, changes: ChangeSet) -> Recompute {
        let span = crate::debug_span!(
            "list_recompute",
            source_len = self.source.get().len(),
            filtered = self.query.get().is_some(),
            changes = ?changes
        );
        let _guard = span.enter();

        let next = filter::apply(self.source.get(), self.query.get().as_ref());
        let reconciliation = self
            .reconciler
            .reconcile_with(&mut self.view, &next, &self.key_fn);
        let flags = self.tracker.update(&self.view);

        self.observed = self.versions();
        self.recomputes += 1;

        crate::debug!(
            view_len = self.view.len(),
            inserted = reconciliation.inserted(),
            removed = reconciliation.removed(),
            refreshed = reconciliation.refreshed.len(),
            non_empty = flags.non_empty,
            exceeds_threshold = flags.exceeds_threshold,
            "view recomputed"
        );

        let report = Recompute {
            changes,
            reconciliation,
            flags,
            flag_changes: self.tracker.changes(),
        };
        self.last = Some(report.clone());
        report
    }

    fn versions(&self) -> (u64, u64) {
        (self.source.version(), self.query.version())
    }

    /// The reconciled view bound to the renderer.
    #[must_use]
    pub fn view(&self) -> &[Rc<E>] {
        &self.view
    }

    /// Current source sequence.
    #[must_use]
    pub fn source(&self) -> &[Rc<E>] {
        self.source.get()
    }

    /// Current query.
    #[must_use]
    pub fn query(&self) -> Option<&Q> {
        self.query.get().as_ref()
    }

    /// Flags derived from the current view.
    #[must_use]
    pub fn flags(&self) -> DerivedFlags {
        self.tracker.flags()
    }

    /// Whether a change is waiting for [`flush`](Self::flush).
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.coalescer.has_pending()
    }

    /// Report of the most recent recompute, whichever path ran it.
    #[must_use]
    pub fn last_recompute(&self) -> Option<&Recompute> {
        self.last.as_ref()
    }

    /// Number of recomputes run so far.
    #[must_use]
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    /// Number of changes absorbed into an already pending recompute.
    #[must_use]
    pub fn coalesced_changes(&self) -> u64 {
        self.coalescer.coalesced_total()
    }

    #[must_use]
    pub fn config(&self) -> &BindingConfig {
        &self.config
    }
}

impl<E, Q, K> std::fmt::Debug for ReactiveBinding<E, Q, K>
where
    E: ?Sized,
    Q: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveBinding")
            .field("source_len", &self.source.get().len())
            .field("query", self.query.get())
            .field("view_len", &self.view.len())
            .field("flags", &self.tracker.flags())
            .field("pending", &self.coalescer.pending())
            .field("recomputes", &self.recomputes)
            .finish()
    }
}
