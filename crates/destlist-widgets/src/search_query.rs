#![forbid(unsafe_code)]

//! Search queries for the destination list.
//!
//! Text typed into the search box is matched literally and case
//! insensitively. Raw patterns are accepted too, for callers that build
//! their own expressions.
//!
//! Typed text too large to compile becomes a query that matches nothing,
//! never an absent query.

use std::fmt;

use regex::{Regex, RegexBuilder};

/// Error building a [`SearchQuery`] from a raw pattern.
#[derive(Debug, Clone)]
pub enum SearchQueryError {
    /// The pattern is empty or whitespace only.
    Empty,
    /// The pattern failed to compile.
    InvalidPattern(regex::Error),
}

impl fmt::Display for SearchQueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "search pattern is empty"),
            Self::InvalidPattern(err) => write!(f, "invalid search pattern: {err}"),
        }
    }
}

impl std::error::Error for SearchQueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Empty => None,
            Self::InvalidPattern(err) => Some(err),
        }
    }
}

impl From<regex::Error> for SearchQueryError {
    fn from(err: regex::Error) -> Self {
        Self::InvalidPattern(err)
    }
}

/// Compiled program size limit, same as the regex crate's default.
const SIZE_LIMIT: usize = 10 * (1 << 20);

/// A compiled, case-insensitive search query.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pattern: String,
    /// `None` when the pattern could not be compiled; matches nothing.
    regex: Option<Regex>,
}

impl SearchQuery {
    /// Build a query matching `text` literally.
    ///
    /// Returns `None` for blank input, which means "no filtering".
    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        Self::literal(text, SIZE_LIMIT)
    }

    fn literal(text: &str, size_limit: usize) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let pattern = regex::escape(text);
        let regex = match compile(&pattern, size_limit) {
            Ok(regex) => Some(regex),
            Err(_err) => {
                destlist_core::warn!(
                    len = text.len(),
                    error = %_err,
                    "search text too large to compile, matching nothing"
                );
                None
            }
        };
        Some(Self { pattern, regex })
    }

    /// Build a query from a raw regular expression.
    pub fn from_pattern(pattern: &str) -> Result<Self, SearchQueryError> {
        if pattern.trim().is_empty() {
            return Err(SearchQueryError::Empty);
        }
        let regex = compile(pattern, SIZE_LIMIT)?;
        Ok(Self {
            pattern: pattern.to_owned(),
            regex: Some(regex),
        })
    }

    /// Whether `haystack` contains a match.
    #[must_use]
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.as_ref().is_some_and(|regex| regex.is_match(haystack))
    }

    /// Whether the query was too large to compile and matches nothing.
    #[must_use]
    pub fn is_unmatchable(&self) -> bool {
        self.regex.is_none()
    }

    /// The pattern, escaped for typed text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

fn compile(pattern: &str, size_limit: usize) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(size_limit)
        .build()
}

impl PartialEq for SearchQuery {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for SearchQuery {}
