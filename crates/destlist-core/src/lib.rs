#![forbid(unsafe_code)]

//! Core: keyed reconciliation, filtering, change coalescing and derived
//! flags for reactive list views.

pub mod binding;
pub mod change_coalescer;
pub mod config;
pub mod filter;
pub mod flags;
pub mod key;
pub mod logging;
pub mod reconcile;
pub mod render_sync;

pub use binding::{ChangeOutcome, ReactiveBinding, Recompute, Tracked};
pub use config::{BindingConfig, RecomputeMode};
pub use filter::Matches;
pub use flags::{DerivedFlags, DerivedStateTracker, TOTAL_THRESHOLD};
pub use key::{KeyFn, compose_key};
pub use reconcile::{Reconciler, Reconciliation, Splice, reconcile};
pub use render_sync::{RenderHost, RenderSyncSignal};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
