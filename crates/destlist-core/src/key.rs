#![forbid(unsafe_code)]

//! Stable identity keys for list elements.
//!
//! A key identifies "the same logical item" across reconciliation passes.
//! Keys are derived from identity fields only; two elements with equal keys
//! are interchangeable for slot reuse even when they are distinct objects.
//!
//! # Example
//!
//! ```
//! use destlist_core::key::{KeyFn, compose_key};
//!
//! struct Printer {
//!     origin: &'static str,
//!     id: String,
//!     status: Option<String>,
//! }
//!
//! let key_fn = |p: &Printer| compose_key([Some(p.origin), Some(p.id.as_str()), p.status.as_deref()]);
//! let printer = Printer { origin: "local", id: "HP".into(), status: None };
//! assert_eq!(key_fn.key(&printer), "local/HP/");
//! ```

use std::hash::Hash;

/// Separator placed between key segments.
pub const KEY_SEPARATOR: char = '/';

/// Derives a stable identity key for an element.
///
/// Implementations must be pure, total and deterministic: the same element
/// always yields the same key and no call can fail.
pub trait KeyFn<E: ?Sized> {
    /// Key type used for hashed lookup during reconciliation.
    type Key: Hash + Eq;

    /// Compute the key of `element`.
    fn key(&self, element: &E) -> Self::Key;
}

impl<E: ?Sized, K, F> KeyFn<E> for F
where
    F: Fn(&E) -> K,
    K: Hash + Eq,
{
    type Key = K;

    #[inline]
    fn key(&self, element: &E) -> K {
        self(element)
    }
}

/// Join key segments with [`KEY_SEPARATOR`].
///
/// A `None` segment composes as the empty string, so an element with a
/// missing field still gets a well-formed key instead of an error.
#[must_use]
pub fn compose_key<'a, I>(segments: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
    I::IntoIter: Clone,
{
    let segments = segments.into_iter();
    let (count, bytes) = segments
        .clone()
        .fold((0usize, 0usize), |(n, len), s| (n + 1, len + s.map_or(0, str::len)));

    let mut key = String::with_capacity(bytes + count.saturating_sub(1));
    for (i, segment) in segments.enumerate() {
        if i > 0 {
            key.push(KEY_SEPARATOR);
        }
        key.push_str(segment.unwrap_or_default());
    }
    key
}
