#![forbid(unsafe_code)]

//! Classification flags derived from the size of the reconciled view.

/// View length above which a running total is worth showing.
pub const TOTAL_THRESHOLD: usize = 4;

/// Flags consumed by conditional display logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedFlags {
    /// The view has at least one element.
    pub non_empty: bool,
    /// The view has more than [`TOTAL_THRESHOLD`] elements.
    pub exceeds_threshold: bool,
}

impl DerivedFlags {
    /// Flags for a view of `len` elements.
    #[must_use]
    pub const fn for_len(len: usize) -> Self {
        Self {
            non_empty: len > 0,
            exceeds_threshold: len > TOTAL_THRESHOLD,
        }
    }
}

impl Default for DerivedFlags {
    /// Flags of an empty view.
    fn default() -> Self {
        Self::for_len(0)
    }
}

/// Which flags flipped during the last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagChanges {
    pub non_empty: bool,
    pub exceeds_threshold: bool,
}

impl FlagChanges {
    #[must_use]
    pub fn any(&self) -> bool {
        self.non_empty || self.exceeds_threshold
    }
}

/// Recomputes [`DerivedFlags`] after every view change.
#[derive(Debug, Clone, Default)]
pub struct DerivedStateTracker {
    flags: DerivedFlags,
    changes: FlagChanges,
}

impl DerivedStateTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute flags from `view`. O(1).
    pub fn update<T>(&mut self, view: &[T]) -> DerivedFlags {
        let flags = DerivedFlags::for_len(view.len());
        self.changes = FlagChanges {
            non_empty: flags.non_empty != self.flags.non_empty,
            exceeds_threshold: flags.exceeds_threshold != self.flags.exceeds_threshold,
        };
        self.flags = flags;
        flags
    }

    /// Flags from the last update.
    #[must_use]
    pub fn flags(&self) -> DerivedFlags {
        self.flags
    }

    /// Flags that flipped in the last update.
    #[must_use]
    pub fn changes(&self) -> FlagChanges {
        self.changes
    }
}
