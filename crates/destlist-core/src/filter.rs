#![forbid(unsafe_code)]

//! Query-driven view selection.

use std::rc::Rc;

/// An element that can be tested against a search query of type `Q`.
///
/// The matching semantics (substring, regex, fuzzy) belong entirely to the
/// element; the filter only preserves order.
pub trait Matches<Q: ?Sized> {
    /// Whether this element passes `query`.
    fn matches(&self, query: &Q) -> bool;
}

/// Select the elements of `source` that pass `query`.
///
/// With no query the result is a shallow copy of `source`; it never aliases
/// the source buffer. Relative order is preserved and nothing is
/// deduplicated.
#[must_use]
pub fn apply<E, Q>(source: &[Rc<E>], query: Option<&Q>) -> Vec<Rc<E>>
where
    E: Matches<Q> + ?Sized,
    Q: ?Sized,
{
    match query {
        None => source.to_vec(),
        Some(query) => source
            .iter()
            .filter(|element| element.matches(query))
            .cloned()
            .collect(),
    }
}
