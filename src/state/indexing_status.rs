/// Indexing status definitions for cached inspection results
///
/// This module defines the coverage states a page can be in, as reported by
/// the URL inspection API, and how each one is classified.
use std::fmt;

/// Coverage state of a single page
///
/// Serialized as the exact string the inspection API uses, so cache files
/// stay readable by anything else that speaks Search Console. Strings the
/// crate does not know are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexingStatus {
    // ===== Indexed =====
    /// Page is in the index and listed in a sitemap
    SubmittedAndIndexed,

    /// Page is in the index but no sitemap lists it
    IndexedNotSubmitted,

    // ===== Not indexed, worth another look =====
    /// Google crawled the page and chose not to index it (yet)
    CrawledNotIndexed,

    /// Google knows the URL but has not crawled it
    DiscoveredNotIndexed,

    /// Google has never seen the URL
    UnknownToGoogle,

    // ===== Not indexed, by the site's own doing =====
    DuplicateWithoutCanonical,
    DuplicateGoogleChoseCanonical,
    AlternateWithCanonical,
    PageWithRedirect,
    ExcludedByNoindex,
    BlockedByRobots,
    NotFound,
    Soft404,
    ServerError,
    RedirectError,
    BlockedUnauthorized,
    BlockedForbidden,

    // ===== Local failure states =====
    /// The service account has no access to the property
    Forbidden,

    /// The inspection request failed for any other reason
    Error,

    /// A coverage state this crate does not recognise
    Other(String),
}

impl IndexingStatus {
    /// Returns true if the page should be rechecked every run and is a
    /// candidate for an indexing request
    ///
    /// These are the states Google may have resolved since the last check,
    /// plus the two local failure states.
    pub fn is_indexable(&self) -> bool {
        matches!(
            self,
            Self::DiscoveredNotIndexed
                | Self::CrawledNotIndexed
                | Self::UnknownToGoogle
                | Self::Forbidden
                | Self::Error
        )
    }

    /// Returns true if the page is in Google's index
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::SubmittedAndIndexed | Self::IndexedNotSubmitted)
    }

    /// Returns the exact string the inspection API uses for this state
    pub fn as_str(&self) -> &str {
        match self {
            Self::SubmittedAndIndexed => "Submitted and indexed",
            Self::IndexedNotSubmitted => "Indexed, not submitted in sitemap",
            Self::CrawledNotIndexed => "Crawled - currently not indexed",
            Self::DiscoveredNotIndexed => "Discovered - currently not indexed",
            Self::UnknownToGoogle => "URL is unknown to Google",
            Self::DuplicateWithoutCanonical => "Duplicate without user-selected canonical",
            Self::DuplicateGoogleChoseCanonical => {
                "Duplicate, Google chose different canonical than user"
            }
            Self::AlternateWithCanonical => "Alternate page with proper canonical tag",
            Self::PageWithRedirect => "Page with redirect",
            Self::ExcludedByNoindex => "Excluded by ‘noindex’ tag",
            Self::BlockedByRobots => "Blocked by robots.txt",
            Self::NotFound => "Not found (404)",
            Self::Soft404 => "Soft 404",
            Self::ServerError => "Server error (5xx)",
            Self::RedirectError => "Redirect error",
            Self::BlockedUnauthorized => "Blocked due to unauthorized request (401)",
            Self::BlockedForbidden => "Blocked due to access forbidden (403)",
            Self::Forbidden => "Forbidden",
            Self::Error => "Error",
            Self::Other(raw) => raw,
        }
    }

    /// Parses a coverage state string, keeping unknown ones as `Other`
    pub fn from_api_string(s: &str) -> Self {
        Self::known_states()
            .into_iter()
            .find(|status| status.as_str() == s)
            .unwrap_or_else(|| Self::Other(s.to_string()))
    }

    /// Console glyph shown next to the state in summaries
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::SubmittedAndIndexed => "✅",
            Self::DuplicateWithoutCanonical => "😵",
            Self::CrawledNotIndexed | Self::DiscoveredNotIndexed => "👀",
            Self::PageWithRedirect => "🔀",
            Self::UnknownToGoogle => "❓",
            _ => "❌",
        }
    }

    /// Returns all known (non-`Other`) states
    pub fn known_states() -> Vec<Self> {
        vec![
            Self::SubmittedAndIndexed,
            Self::IndexedNotSubmitted,
            Self::CrawledNotIndexed,
            Self::DiscoveredNotIndexed,
            Self::UnknownToGoogle,
            Self::DuplicateWithoutCanonical,
            Self::DuplicateGoogleChoseCanonical,
            Self::AlternateWithCanonical,
            Self::PageWithRedirect,
            Self::ExcludedByNoindex,
            Self::BlockedByRobots,
            Self::NotFound,
            Self::Soft404,
            Self::ServerError,
            Self::RedirectError,
            Self::BlockedUnauthorized,
            Self::BlockedForbidden,
            Self::Forbidden,
            Self::Error,
        ]
    }
}

impl fmt::Display for IndexingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for IndexingStatus {
    fn from(s: String) -> Self {
        Self::from_api_string(&s)
    }
}

impl From<IndexingStatus> for String {
    fn from(status: IndexingStatus) -> Self {
        status.as_str().to_string()
    }
}

impl serde::Serialize for IndexingStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for IndexingStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw))
    }
}
