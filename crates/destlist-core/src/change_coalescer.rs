#![forbid(unsafe_code)]

//! Coalescing of input changes into a single pending recompute.
//!
//! A list view typically receives bursts of upstream notifications, for
//! example many printers updating their status one after another. Running a
//! full filter + reconcile pass for each one is wasted work when the host can
//! defer the pass to the next turn of its event loop.
//!
//! [`ChangeCoalescer`] records which inputs changed and tells the caller
//! whether a recompute needs to be scheduled:
//! - The first change after a flush returns [`Schedule::Requested`]
//! - Every further change returns [`Schedule::Coalesced`]
//!
//! The recompute itself always reads the inputs' current values, so "latest
//! wins" falls out naturally: nothing but the set of changed inputs is kept.
//!
//! # Usage
//!
//! ```
//! use destlist_core::change_coalescer::{ChangeCoalescer, ChangeSet, Schedule};
//!
//! let mut coalescer = ChangeCoalescer::new();
//!
//! assert_eq!(coalescer.push(ChangeSet::SOURCE), Schedule::Requested);
//! assert_eq!(coalescer.push(ChangeSet::SOURCE), Schedule::Coalesced);
//! assert_eq!(coalescer.push(ChangeSet::QUERY), Schedule::Coalesced);
//!
//! let pending = coalescer.flush();
//! assert_eq!(pending, ChangeSet::SOURCE | ChangeSet::QUERY);
//! assert!(!coalescer.has_pending());
//! ```

use bitflags::bitflags;

bitflags! {
    /// Inputs of a list view that can change independently.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChangeSet: u8 {
        /// The source sequence or one of its elements changed.
        const SOURCE = 0b01;
        /// The search query changed.
        const QUERY = 0b10;
    }
}

/// What the caller should do after pushing a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// No recompute was pending; the caller must schedule one.
    Requested,
    /// A recompute is already pending and will observe this change.
    Coalesced,
}

/// Accumulates changes until the next flush.
///
/// # Thread Safety
///
/// Not thread-safe. Use from the single thread that owns the view.
///
/// # Performance
///
/// All operations are O(1).
#[derive(Debug, Clone, Default)]
pub struct ChangeCoalescer {
    pending: ChangeSet,
    /// Pushes absorbed into an already pending recompute, over the lifetime
    /// of the coalescer.
    coalesced_total: u64,
}

impl ChangeCoalescer {
    /// Create an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change.
    ///
    /// An empty `ChangeSet` is ignored and reports [`Schedule::Coalesced`]
    /// so it never triggers a recompute on its own.
    pub fn push(&mut self, change: ChangeSet) -> Schedule {
        if change.is_empty() {
            return Schedule::Coalesced;
        }
        let was_pending = self.has_pending();
        self.pending |= change;
        if was_pending {
            self.coalesced_total = self.coalesced_total.saturating_add(1);
            Schedule::Coalesced
        } else {
            Schedule::Requested
        }
    }

    /// Take the pending change set, leaving the coalescer empty.
    #[must_use]
    pub fn flush(&mut self) -> ChangeSet {
        std::mem::take(&mut self.pending)
    }

    /// Check if a recompute is pending.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Changes recorded since the last flush.
    #[must_use]
    pub fn pending(&self) -> ChangeSet {
        self.pending
    }

    /// Number of pushes that did not need their own recompute.
    #[must_use]
    pub fn coalesced_total(&self) -> u64 {
        self.coalesced_total
    }
}
