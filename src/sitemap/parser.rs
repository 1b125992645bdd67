//! Sitemap XML parser
//!
//! Extracts `<loc>` entries from `<urlset>` and `<sitemapindex>` documents.
//! Extension elements such as `<image:loc>` are ignored.

use scraper::{Html, Selector};

/// Which of the two sitemap document types was parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapKind {
    /// A `<urlset>` listing pages
    UrlSet,
    /// A `<sitemapindex>` listing other sitemaps
    Index,
}

/// Locations extracted from one sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapDocument {
    pub kind: SitemapKind,
    pub locations: Vec<String>,
}

/// Parses a sitemap document and extracts its locations
///
/// # Arguments
///
/// * `xml` - The sitemap body
///
/// # Returns
///
/// The document kind and its `<loc>` values, trimmed, in document order.
/// A body that is not a sitemap yields an empty `UrlSet`.
///
/// # Example
///
/// ```
/// use search_indexer::sitemap::{parse_sitemap, SitemapKind};
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://example.com/</loc></url>
/// </urlset>"#;
/// let doc = parse_sitemap(xml);
/// assert_eq!(doc.kind, SitemapKind::UrlSet);
/// assert_eq!(doc.locations, vec!["https://example.com/".to_string()]);
/// ```
pub fn parse_sitemap(xml: &str) -> SitemapDocument {
    // The HTML tokenizer drops CDATA sections, so unwrap them first
    let xml = xml.replace("<![CDATA[", "").replace("]]>", "");
    let document = Html::parse_document(&xml);

    let kind = if has_element(&document, "sitemapindex") {
        SitemapKind::Index
    } else {
        SitemapKind::UrlSet
    };

    let selector = match kind {
        SitemapKind::Index => "sitemap > loc",
        SitemapKind::UrlSet => "url > loc",
    };

    SitemapDocument {
        kind,
        locations: extract_locations(&document, selector),
    }
}

fn has_element(document: &Html, name: &str) -> bool {
    Selector::parse(name)
        .map(|selector| document.select(&selector).next().is_some())
        .unwrap_or(false)
}

fn extract_locations(document: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect()
}
