#![forbid(unsafe_code)]

//! Print destination list built on the `destlist-core` binding.

pub mod destination;
pub mod destination_list;
pub mod native_layer;
pub mod search_query;

pub use destination::{Destination, DestinationOrigin};
pub use destination_list::{DestinationList, DestinationListEvent, DisplayState};
pub use native_layer::NativeLayer;
pub use search_query::{SearchQuery, SearchQueryError};
