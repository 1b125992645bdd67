use crate::api::GoogleApiClient;
use crate::http::RetryingClient;
use crate::site::SiteUrl;
use crate::sitemap::parser::{parse_sitemap, SitemapKind};
use crate::sitemap::SitemapError;
use flate2::read::GzDecoder;
use std::collections::HashSet;
use std::io::Read;

/// How many levels of nested sitemap indexes are followed
pub const MAX_INDEX_DEPTH: usize = 3;

/// Sitemaps registered for a site and the pages they list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitePages {
    /// Sitemap URLs as registered in Search Console
    pub sitemaps: Vec<String>,

    /// Page URLs from all sitemaps, each appearing once
    pub pages: Vec<String>,
}

/// Discovers every page listed in a site's registered sitemaps
///
/// Sitemaps are fetched one at a time. Pages are deduplicated by exact
/// string equality, first occurrence wins. A sitemap that cannot be fetched
/// is logged and contributes no pages, but stays in the registered list.
///
/// Never fails: if the sitemap listing itself errors, the result is empty,
/// which the caller treats as "no sitemaps".
pub async fn discover_pages(api: &GoogleApiClient, site: &SiteUrl) -> SitePages {
    match try_discover_pages(api, site).await {
        Ok(found) => found,
        Err(e) => {
            tracing::error!("Failed to get sitemap pages: {}", e);
            SitePages::default()
        }
    }
}

async fn try_discover_pages(
    api: &GoogleApiClient,
    site: &SiteUrl,
) -> Result<SitePages, SitemapError> {
    let sitemaps = api.list_sitemaps(site).await?;

    let mut seen = HashSet::new();
    let mut pages = Vec::new();

    for sitemap_url in &sitemaps {
        let found = match fetch_sitemap_pages(api.http(), sitemap_url).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Skipping sitemap {}: {}", sitemap_url, e);
                continue;
            }
        };
        tracing::debug!("{} lists {} pages", sitemap_url, found.len());

        for page in found {
            if seen.insert(page.clone()) {
                pages.push(page);
            }
        }
    }

    Ok(SitePages { sitemaps, pages })
}

/// Fetches one sitemap and returns the page URLs it lists
///
/// Sitemap indexes are followed up to [`MAX_INDEX_DEPTH`] levels deep, each
/// child fetched at most once. A failing child is logged and skipped; a
/// failing top-level sitemap is an error.
pub async fn fetch_sitemap_pages(
    http: &RetryingClient,
    sitemap_url: &str,
) -> Result<Vec<String>, SitemapError> {
    let mut pages = Vec::new();
    let mut visited = HashSet::from([sitemap_url.to_string()]);
    let mut pending = vec![(sitemap_url.to_string(), 0usize)];

    while let Some((url, depth)) = pending.pop() {
        let body = match fetch_document(http, &url).await {
            Ok(body) => body,
            Err(e) if depth > 0 => {
                tracing::warn!("Skipping nested sitemap {}: {}", url, e);
                continue;
            }
            Err(e) => return Err(e),
        };

        let document = parse_sitemap(&body);
        match document.kind {
            SitemapKind::UrlSet => pages.extend(document.locations),
            SitemapKind::Index if depth >= MAX_INDEX_DEPTH => {
                tracing::warn!("Sitemap index {} nested too deeply, ignoring", url);
            }
            SitemapKind::Index => {
                // Reverse so children are visited in document order
                for child in document.locations.into_iter().rev() {
                    if visited.insert(child.clone()) {
                        pending.push((child, depth + 1));
                    }
                }
            }
        }
    }

    Ok(pages)
}

async fn fetch_document(http: &RetryingClient, url: &str) -> Result<String, SitemapError> {
    let response = http.send(http.client().get(url)).await?;

    let status = response.status().as_u16();
    if status >= 300 {
        return Err(SitemapError::Status {
            url: url.to_string(),
            status,
        });
    }

    let bytes = response.bytes().await.map_err(crate::ApiError::from)?;
    decode_body(url, &bytes)
}

/// Turns a sitemap body into text, gunzipping `.xml.gz` payloads
///
/// Servers usually hand out `.gz` sitemaps as `application/x-gzip` with no
/// `Content-Encoding`, so the client does not decompress them.
fn decode_body(url: &str, bytes: &[u8]) -> Result<String, SitemapError> {
    let is_gzipped = bytes.starts_with(&[0x1f, 0x8b]);
    if !is_gzipped {
        return Ok(String::from_utf8_lossy(bytes).into_owned());
    }

    let mut xml = String::new();
    GzDecoder::new(bytes)
        .read_to_string(&mut xml)
        .map_err(|source| SitemapError::Decompress {
            url: url.to_string(),
            source,
        })?;
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointsConfig;
    use crate::http::build_http_client;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_client(server: &MockServer) -> GoogleApiClient {
        GoogleApiClient::new(
            RetryingClient::new(build_http_client().unwrap(), 0),
            "test-token".to_string(),
            EndpointsConfig::all_at(&server.uri()),
        )
    }

    fn urlset(urls: &[String]) -> String {
        let entries: String = urls
            .iter()
            .map(|u| format!("<url><loc>{}</loc></url>", u))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
            entries
        )
    }

    async fn mount_sitemap_list(server: &MockServer, sitemaps: &[String]) {
        let entries: Vec<_> = sitemaps
            .iter()
            .map(|p| serde_json::json!({ "path": p }))
            .collect();
        Mock::given(method("GET"))
            .and(path("/webmasters/v3/sites/sc-domain%3Aexample.com/sitemaps"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "sitemap": entries })),
            )
            .mount(server)
            .await;
    }

    async fn mount_xml(server: &MockServer, at: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_duplicates_across_sitemaps_collapse() {
        let server = MockServer::start().await;
        let base = server.uri();
        let a = format!("{}/sitemap-a.xml", base);
        let b = format!("{}/sitemap-b.xml", base);

        mount_sitemap_list(&server, &[a.clone(), b.clone()]).await;
        mount_xml(
            &server,
            "/sitemap-a.xml",
            urlset(&[format!("{}/one", base), format!("{}/two", base)]),
        )
        .await;
        mount_xml(
            &server,
            "/sitemap-b.xml",
            urlset(&[format!("{}/two", base), format!("{}/three", base)]),
        )
        .await;

        let site = SiteUrl::from_input("example.com").unwrap();
        let found = discover_pages(&api_client(&server), &site).await;

        assert_eq!(found.sitemaps, vec![a, b]);
        assert_eq!(
            found.pages,
            vec![
                format!("{}/one", base),
                format!("{}/two", base),
                format!("{}/three", base)
            ]
        );
    }

    #[tokio::test]
    async fn test_sitemap_index_is_followed() {
        let server = MockServer::start().await;
        let base = server.uri();

        mount_xml(
            &server,
            "/index.xml",
            format!(
                "<sitemapindex><sitemap><loc>{0}/posts.xml</loc></sitemap><sitemap><loc>{0}/missing.xml</loc></sitemap></sitemapindex>",
                base
            ),
        )
        .await;
        mount_xml(&server, "/posts.xml", urlset(&[format!("{}/post-1", base)])).await;
        Mock::given(method("GET"))
            .and(path("/missing.xml"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let http = RetryingClient::new(build_http_client().unwrap(), 0);
        let pages = fetch_sitemap_pages(&http, &format!("{}/index.xml", base))
            .await
            .unwrap();

        assert_eq!(pages, vec![format!("{}/post-1", base)]);
    }

    #[tokio::test]
    async fn test_self_referencing_index_terminates() {
        let server = MockServer::start().await;
        let base = server.uri();

        mount_xml(
            &server,
            "/loop.xml",
            format!("<sitemapindex><sitemap><loc>{}/loop.xml</loc></sitemap></sitemapindex>", base),
        )
        .await;

        let http = RetryingClient::new(build_http_client().unwrap(), 0);
        let pages = fetch_sitemap_pages(&http, &format!("{}/loop.xml", base))
            .await
            .unwrap();

        assert!(pages.is_empty());
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_sitemap_is_skipped() {
        let server = MockServer::start().await;
        let base = server.uri();
        let good = format!("{}/good.xml", base);
        let gone = format!("{}/gone.xml", base);

        mount_sitemap_list(&server, &[good.clone(), gone.clone()]).await;
        mount_xml(&server, "/good.xml", urlset(&[format!("{}/kept", base)])).await;
        Mock::given(method("GET"))
            .and(path("/gone.xml"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let site = SiteUrl::from_input("example.com").unwrap();
        let found = discover_pages(&api_client(&server), &site).await;

        assert_eq!(found.sitemaps, vec![good, gone]);
        assert_eq!(found.pages, vec![format!("{}/kept", base)]);
    }

    #[tokio::test]
    async fn test_listing_failure_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/webmasters/v3/sites/sc-domain%3Aexample.com/sitemaps"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let site = SiteUrl::from_input("example.com").unwrap();
        let found = discover_pages(&api_client(&server), &site).await;

        assert_eq!(found, SitePages::default());
    }

    #[tokio::test]
    async fn test_gzipped_sitemap_is_decompressed() {
        let server = MockServer::start().await;
        let base = server.uri();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(urlset(&[format!("{}/zipped", base)]).as_bytes())
            .unwrap();
        let compressed = encoder.finish().unwrap();

        Mock::given(method("GET"))
            .and(path("/sitemap.xml.gz"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "application/x-gzip")
                    .set_body_bytes(compressed),
            )
            .mount(&server)
            .await;

        let http = RetryingClient::new(build_http_client().unwrap(), 0);
        let pages = fetch_sitemap_pages(&http, &format!("{}/sitemap.xml.gz", base))
            .await
            .unwrap();

        assert_eq!(pages, vec![format!("{}/zipped", base)]);
    }

    #[test]
    fn test_corrupt_gzip_is_an_error() {
        let result = decode_body("https://example.com/s.xml.gz", b"\x1f\x8bnot really gzip");
        assert!(matches!(result, Err(SitemapError::Decompress { .. })));
    }

    #[tokio::test]
    async fn test_no_registered_sitemaps() {
        let server = MockServer::start().await;
        mount_sitemap_list(&server, &[]).await;

        let site = SiteUrl::from_input("example.com").unwrap();
        let found = discover_pages(&api_client(&server), &site).await;

        assert!(found.sitemaps.is_empty());
        assert!(found.pages.is_empty());
    }
}
