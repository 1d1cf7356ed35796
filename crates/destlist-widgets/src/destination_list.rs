#![forbid(unsafe_code)]

//! Searchable list of print destinations.
//!
//! [`DestinationList`] keeps the filtered view of a live destination source
//! bound to a virtualized renderer. Upstream changes (printers appearing,
//! disappearing, or changing status) and search query edits are coalesced
//! and reconciled into the bound view so that rows whose key did not change
//! keep their slot.
//!
//! # Usage
//!
//! ```
//! use std::rc::Rc;
//! use destlist_core::binding::ChangeOutcome;
//! use destlist_widgets::destination::{Destination, DestinationOrigin};
//! use destlist_widgets::destination_list::DestinationList;
//! use destlist_widgets::search_query::SearchQuery;
//!
//! let mut list = DestinationList::new().with_title("Recent destinations");
//! let outcome = list.set_destinations(vec![
//!     Rc::new(Destination::new(DestinationOrigin::Local, "hp", "HP LaserJet")),
//!     Rc::new(Destination::new(DestinationOrigin::Cookies, "cl", "Cloud Canon")),
//! ]);
//! assert_eq!(outcome, ChangeOutcome::FlushRequested);
//! list.set_search_query(SearchQuery::from_text("canon"));
//!
//! // On the host's next turn:
//! list.flush();
//! assert_eq!(list.matching_destinations().len(), 1);
//! assert!(list.has_destinations());
//! ```
//!
//! # Renderer re-measure
//!
//! Recomputing never notifies the renderer. When the list becomes visible
//! after changing while hidden, the host must call
//! [`DestinationList::force_resize`].

use std::rc::Rc;

use destlist_core::binding::{ChangeOutcome, ReactiveBinding, Recompute};
use destlist_core::config::BindingConfig;
use destlist_core::flags::DerivedFlags;
use destlist_core::render_sync::{RenderHost, RenderSyncSignal};

use crate::destination::Destination;
use crate::native_layer::NativeLayer;
use crate::search_query::SearchQuery;

type DestinationKeyFn = fn(&Destination) -> String;

/// Event emitted by the list for its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationListEvent {
    /// The user picked a destination.
    DestinationSelected(Rc<Destination>),
}

/// What conditional UI around the list should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayState {
    /// Destinations are still being discovered.
    pub show_throbber: bool,
    /// The "no destinations" message.
    pub show_no_destinations: bool,
    /// Number of matches to show as a running total, when large enough.
    pub total: Option<usize>,
    /// The "manage printers" link.
    pub show_action_link: bool,
}

/// Filtered, reconciled list of print destinations.
#[derive(Debug)]
pub struct DestinationList {
    binding: ReactiveBinding<Destination, SearchQuery, DestinationKeyFn>,
    title: String,
    has_action_link: bool,
    loading_destinations: bool,
    render_sync: RenderSyncSignal,
}

impl Default for DestinationList {
    fn default() -> Self {
        Self::new()
    }
}

impl DestinationList {
    /// Create an empty list with the default binding configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BindingConfig::default())
    }

    /// Create an empty list with an explicit binding configuration.
    #[must_use]
    pub fn with_config(config: BindingConfig) -> Self {
        Self {
            binding: ReactiveBinding::with_config(Destination::key as DestinationKeyFn, config),
            title: String::new(),
            has_action_link: false,
            loading_destinations: false,
            render_sync: RenderSyncSignal::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Show the "manage printers" link.
    #[must_use]
    pub fn with_action_link(mut self, has_action_link: bool) -> Self {
        self.has_action_link = has_action_link;
        self
    }

    // --- Inputs ---

    /// Replace the destination source.
    pub fn set_destinations(&mut self, destinations: Vec<Rc<Destination>>) -> ChangeOutcome {
        self.binding.set_source(destinations)
    }

    /// Mutate the destination source in place.
    pub fn update_destinations(
        &mut self,
        f: impl FnOnce(&mut Vec<Rc<Destination>>),
    ) -> ChangeOutcome {
        self.binding.update_source(f)
    }

    /// Report that a destination changed without the source being replaced.
    pub fn touch_destinations(&mut self) -> ChangeOutcome {
        self.binding.touch_source()
    }

    /// Replace the search query. `None` shows every destination.
    pub fn set_search_query(&mut self, query: Option<SearchQuery>) -> ChangeOutcome {
        self.binding.set_query(query)
    }

    pub fn set_loading_destinations(&mut self, loading: bool) {
        self.loading_destinations = loading;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_has_action_link(&mut self, has_action_link: bool) {
        self.has_action_link = has_action_link;
    }

    /// Run the pending recompute, if any.
    pub fn flush(&mut self) -> Option<Recompute> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "destination_list_flush",
            title = %self.title,
            pending = self.binding.has_pending()
        )
        .entered();

        self.binding.flush()
    }

    // --- Outputs ---

    /// The reconciled view bound to the renderer.
    #[must_use]
    pub fn matching_destinations(&self) -> &[Rc<Destination>] {
        self.binding.view()
    }

    /// Current destination source.
    #[must_use]
    pub fn destinations(&self) -> &[Rc<Destination>] {
        self.binding.source()
    }

    #[must_use]
    pub fn search_query(&self) -> Option<&SearchQuery> {
        self.binding.query()
    }

    /// Report of the most recent recompute, including ones run synchronously
    /// by an input change in immediate mode.
    #[must_use]
    pub fn last_recompute(&self) -> Option<&Recompute> {
        self.binding.last_recompute()
    }

    #[must_use]
    pub fn flags(&self) -> DerivedFlags {
        self.binding.flags()
    }

    /// At least one destination matches.
    #[must_use]
    pub fn has_destinations(&self) -> bool {
        self.binding.flags().non_empty
    }

    /// Enough destinations match to show a running total.
    #[must_use]
    pub fn show_destinations_total(&self) -> bool {
        self.binding.flags().exceeds_threshold
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn has_action_link(&self) -> bool {
        self.has_action_link
    }

    #[must_use]
    pub fn loading_destinations(&self) -> bool {
        self.loading_destinations
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.binding.has_pending()
    }

    /// Conditional display decisions for the surrounding UI.
    ///
    /// The "no destinations" message waits for the first recompute so an
    /// unpopulated list does not flash it.
    #[must_use]
    pub fn display_state(&self) -> DisplayState {
        let flags = self.binding.flags();
        let recomputed = self.binding.recomputes() > 0;
        DisplayState {
            show_throbber: self.loading_destinations,
            show_no_destinations: recomputed && !flags.non_empty && !self.loading_destinations,
            total: flags
                .exceeds_threshold
                .then(|| self.binding.view().len()),
            show_action_link: self.has_action_link,
        }
    }

    // --- Renderer and user actions ---

    /// Ask the renderer to re-measure if it is visible.
    ///
    /// Call after the list becomes visible; returns `true` if the hint was
    /// sent.
    pub fn force_resize<H>(&mut self, host: &mut H) -> bool
    where
        H: RenderHost + ?Sized,
    {
        self.render_sync.notify_if_visible(host)
    }

    /// Re-measure hints sent so far.
    #[must_use]
    pub fn resize_hints(&self) -> u64 {
        self.render_sync.emitted()
    }

    /// Translate a row activation into a selection event.
    ///
    /// `index` is a position in [`matching_destinations`](Self::matching_destinations);
    /// out-of-range positions yield `None`.
    #[must_use]
    pub fn on_destination_selected(&self, index: usize) -> Option<DestinationListEvent> {
        let destination = self.binding.view().get(index)?;
        Some(DestinationListEvent::DestinationSelected(Rc::clone(
            destination,
        )))
    }

    /// Forward a click on the "manage printers" link.
    ///
    /// Ignored when the link is hidden; returns whether it was forwarded.
    pub fn on_action_link_click(&self, native: &dyn NativeLayer) -> bool {
        if !self.has_action_link {
            return false;
        }
        native.manage_printers();
        true
    }
}
