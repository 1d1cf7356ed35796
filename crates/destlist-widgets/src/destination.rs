#![forbid(unsafe_code)]

//! Print destinations as listed in the destination picker.

use destlist_core::filter::Matches;
use destlist_core::key::compose_key;

use crate::search_query::SearchQuery;

/// Where a destination comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestinationOrigin {
    /// A printer installed on this machine.
    Local,
    /// A cloud printer shared with the signed-in user.
    Cookies,
    /// A cloud printer registered to this device.
    Device,
    /// A printer discovered on the local network.
    Privet,
    /// A printer provided by an extension.
    Extension,
    /// A printer configured in the OS printer settings.
    CrosLocal,
}

impl DestinationOrigin {
    /// Stable name used in keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Cookies => "cookies",
            Self::Device => "device",
            Self::Privet => "privet",
            Self::Extension => "extension",
            Self::CrosLocal => "chrome_os",
        }
    }
}

/// A print destination.
///
/// Identity is `(origin, id)`; the connection status is a display field but
/// still takes part in the list key, so a status change replaces the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    origin: DestinationOrigin,
    id: String,
    display_name: String,
    connection_status_text: Option<String>,
    location: Option<String>,
    description: Option<String>,
    extension_name: Option<String>,
    extra_keywords: Vec<String>,
}

impl Destination {
    /// Create a destination with only its identity and name.
    pub fn new(
        origin: DestinationOrigin,
        id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            origin,
            id: id.into(),
            display_name: display_name.into(),
            connection_status_text: None,
            location: None,
            description: None,
            extension_name: None,
            extra_keywords: Vec::new(),
        }
    }

    /// Set the connection status shown next to the name.
    #[must_use]
    pub fn with_connection_status(mut self, text: impl Into<String>) -> Self {
        self.connection_status_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_extension_name(mut self, name: impl Into<String>) -> Self {
        self.extension_name = Some(name.into());
        self
    }

    /// Add a searchable keyword that is never displayed.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.extra_keywords.push(keyword.into());
        self
    }

    #[must_use]
    pub fn origin(&self) -> DestinationOrigin {
        self.origin
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn connection_status_text(&self) -> Option<&str> {
        self.connection_status_text.as_deref()
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// List key: `origin/id/connection status`.
    #[must_use]
    pub fn key(&self) -> String {
        compose_key([
            Some(self.origin.as_str()),
            Some(self.id.as_str()),
            self.connection_status_text.as_deref(),
        ])
    }

    /// Whether `query` matches the name, extension name, location,
    /// description or one of the extra keywords.
    #[must_use]
    pub fn matches_query(&self, query: &SearchQuery) -> bool {
        query.is_match(&self.display_name)
            || self
                .extension_name
                .as_deref()
                .is_some_and(|name| query.is_match(name))
            || [self.location.as_deref(), self.description.as_deref()]
                .into_iter()
                .flatten()
                .any(|field| query.is_match(field))
            || self.extra_keywords.iter().any(|k| query.is_match(k))
    }
}

impl Matches<SearchQuery> for Destination {
    fn matches(&self, query: &SearchQuery) -> bool {
        self.matches_query(query)
    }
}
