use std::fmt;
use std::path::{Path, PathBuf};

const DOMAIN_PREFIX: &str = "sc-domain:";

/// A Search Console property identifier
///
/// Either a domain property (`sc-domain:example.com`) or a URL-prefix
/// property (`https://example.com/`, always ending in `/`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteUrl(String);

impl SiteUrl {
    /// Derives the property identifier from raw CLI input
    ///
    /// Returns `None` for empty input.
    ///
    /// # Example
    ///
    /// ```
    /// use search_indexer::site::SiteUrl;
    ///
    /// let site = SiteUrl::from_input("example.com").unwrap();
    /// assert_eq!(site.as_str(), "sc-domain:example.com");
    ///
    /// let site = SiteUrl::from_input("https://example.com").unwrap();
    /// assert_eq!(site.as_str(), "https://example.com/");
    /// ```
    pub fn from_input(input: &str) -> Option<Self> {
        if input.is_empty() {
            return None;
        }

        if input.starts_with("http://") || input.starts_with("https://") {
            if input.ends_with('/') {
                Some(Self(input.to_string()))
            } else {
                Some(Self(format!("{}/", input)))
            }
        } else {
            Some(Self(format!("{}{}", DOMAIN_PREFIX, input)))
        }
    }

    /// Returns true for `sc-domain:` properties
    pub fn is_domain_property(&self) -> bool {
        self.0.starts_with(DOMAIN_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of this site's status cache inside `cache_dir`
    pub fn cache_path(&self, cache_dir: &Path) -> PathBuf {
        cache_dir.join(format!("{}.json", cache_file_name(&self.0)))
    }
}

impl fmt::Display for SiteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the cache file stem for a site identifier
///
/// Replaces the first `http://` with `http_`, the first `https://` with
/// `https_`, then the first remaining `/` with `_`. Only the first occurrence
/// of each is replaced, so a URL-prefix property with a path keeps its later
/// slashes and maps to a nested file.
pub fn cache_file_name(site: &str) -> String {
    site.replacen("http://", "http_", 1)
        .replacen("https://", "https_", 1)
        .replacen('/', "_", 1)
}
