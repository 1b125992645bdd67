use chrono::{Duration, SecondsFormat, Utc};
use search_indexer::api::GoogleApiClient;
use search_indexer::config::{EndpointsConfig, RunConfig};
use search_indexer::http::{build_http_client, RetryingClient};
use search_indexer::{
    Coordinator, IndexerError, IndexingOutcome, IndexingStatus, SiteUrl, StatusCache,
};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITEMAPS_PATH: &str = "/webmasters/v3/sites/sc-domain%3Aexample.com/sitemaps";
const INSPECT_PATH: &str = "/v1/urlInspection/index:inspect";
const METADATA_PATH: &str = "/v3/urlNotifications/metadata";
const PUBLISH_PATH: &str = "/v3/urlNotifications:publish";

/// Mock server plus a coordinator pointed at it
struct Harness {
    server: MockServer,
    cache_dir: TempDir,
    site: SiteUrl,
}

impl Harness {
    async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            cache_dir: TempDir::new().expect("Failed to create cache dir"),
            site: SiteUrl::from_input("example.com").expect("Valid site"),
        }
    }

    fn coordinator(&self, batch_size: usize) -> Coordinator {
        let http = RetryingClient::new(build_http_client().expect("HTTP client"), 5);
        let api = GoogleApiClient::new(
            http,
            "test-token".to_string(),
            EndpointsConfig::all_at(&self.server.uri()),
        );
        let run = RunConfig {
            batch_size,
            cache_dir: self.cache_dir.path().to_path_buf(),
            ..RunConfig::default()
        };
        Coordinator::new(api, run)
    }

    fn cache_path(&self) -> PathBuf {
        self.site.cache_path(self.cache_dir.path())
    }

    /// Registers one sitemap listing `pages`
    async fn mount_sitemap(&self, pages: &[&str]) {
        let sitemap_url = format!("{}/sitemap.xml", self.server.uri());
        Mock::given(method("GET"))
            .and(path(SITEMAPS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sitemap": [{ "path": sitemap_url }]
            })))
            .mount(&self.server)
            .await;

        let entries: String = pages
            .iter()
            .map(|p| format!("<url><loc>{}</loc></url>", p))
            .collect();
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
                entries
            )))
            .mount(&self.server)
            .await;
    }

    /// Answers inspections of `page` with `coverage_state`, expecting `times` calls
    async fn mount_inspection(&self, page: &str, coverage_state: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path(INSPECT_PATH))
            .and(body_partial_json(serde_json::json!({
                "inspectionUrl": page,
                "siteUrl": "sc-domain:example.com"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "inspectionResult": {
                    "indexStatusResult": { "coverageState": coverage_state }
                }
            })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    async fn mount_metadata(&self, page: &str, status: u16, times: u64) {
        Mock::given(method("GET"))
            .and(path(METADATA_PATH))
            .and(query_param("url", page))
            .respond_with(ResponseTemplate::new(status))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    async fn mount_publish(&self, page: &str, status: u16, times: u64) {
        Mock::given(method("POST"))
            .and(path(PUBLISH_PATH))
            .and(body_partial_json(serde_json::json!({
                "url": page,
                "type": "URL_UPDATED"
            })))
            .respond_with(ResponseTemplate::new(status))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Writes a cache file with `(url, status, age)` entries
    fn seed_cache(&self, entries: &[(&str, &str, Duration)]) {
        let mut map = serde_json::Map::new();
        for (url, status, age) in entries {
            map.insert(
                url.to_string(),
                serde_json::json!({ "status": status, "lastCheckedAt": iso(*age) }),
            );
        }
        std::fs::write(self.cache_path(), serde_json::Value::Object(map).to_string())
            .expect("Failed to seed cache");
    }
}

fn iso(age: Duration) -> String {
    (Utc::now() - age).to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[tokio::test]
async fn test_indexed_page_gets_no_indexing_request() {
    let h = Harness::start().await;
    let page = "https://example.com/";

    h.mount_sitemap(&[page]).await;
    h.mount_inspection(page, "Submitted and indexed", 1).await;
    h.mount_metadata(page, 404, 0).await;
    h.mount_publish(page, 200, 0).await;

    let summary = h.coordinator(50).run(&h.site).await.expect("Run failed");

    assert_eq!(summary.site.as_str(), "sc-domain:example.com");
    assert_eq!(summary.sitemap_count, 1);
    assert_eq!(summary.page_count, 1);
    assert_eq!(summary.inspected_count, 1);
    assert_eq!(
        summary.pages_with(&IndexingStatus::SubmittedAndIndexed),
        &[page.to_string()]
    );
    assert!(summary.indexable.is_empty());
    assert!(summary.outcomes.is_empty());

    let cache = StatusCache::load(h.cache_path()).expect("Cache not written");
    assert_eq!(
        cache.get(page).map(|r| r.status.clone()),
        Some(IndexingStatus::SubmittedAndIndexed)
    );
}

#[tokio::test]
async fn test_unknown_page_is_submitted_for_indexing() {
    let h = Harness::start().await;
    let page = "https://example.com/new-post";

    h.mount_sitemap(&[page]).await;
    h.mount_inspection(page, "URL is unknown to Google", 1).await;
    h.mount_metadata(page, 404, 1).await;
    h.mount_publish(page, 200, 1).await;

    let summary = h.coordinator(50).run(&h.site).await.expect("Run failed");

    assert_eq!(summary.indexable, vec![page.to_string()]);
    assert_eq!(
        summary.outcomes,
        vec![(page.to_string(), IndexingOutcome::Requested)]
    );
    assert_eq!(summary.requested_count(), 1);
}

#[tokio::test]
async fn test_previously_submitted_page_is_not_resubmitted() {
    let h = Harness::start().await;
    let page = "https://example.com/queued";

    h.mount_sitemap(&[page]).await;
    h.mount_inspection(page, "Discovered - currently not indexed", 1)
        .await;
    h.mount_metadata(page, 200, 1).await;
    h.mount_publish(page, 200, 0).await;

    let summary = h.coordinator(50).run(&h.site).await.expect("Run failed");

    assert_eq!(
        summary.outcomes,
        vec![(page.to_string(), IndexingOutcome::AlreadyRequested)]
    );
}

#[tokio::test]
async fn test_indexing_failures_do_not_stop_the_loop() {
    let h = Harness::start().await;
    let denied = "https://example.com/denied";
    let rejected = "https://example.com/rejected";
    let fine = "https://example.com/fine";

    h.mount_sitemap(&[denied, rejected, fine]).await;
    h.mount_inspection(denied, "Crawled - currently not indexed", 1)
        .await;
    h.mount_inspection(rejected, "Crawled - currently not indexed", 1)
        .await;
    h.mount_inspection(fine, "Crawled - currently not indexed", 1)
        .await;
    h.mount_metadata(denied, 403, 1).await;
    h.mount_metadata(rejected, 404, 1).await;
    h.mount_metadata(fine, 404, 1).await;
    h.mount_publish(denied, 200, 0).await;
    h.mount_publish(rejected, 429, 1).await;
    h.mount_publish(fine, 200, 1).await;

    let summary = h.coordinator(50).run(&h.site).await.expect("Run failed");

    assert_eq!(
        summary.outcomes,
        vec![
            (denied.to_string(), IndexingOutcome::Skipped { status: 403 }),
            (
                rejected.to_string(),
                IndexingOutcome::RequestFailed { status: Some(429) }
            ),
            (fine.to_string(), IndexingOutcome::Requested),
        ]
    );
}

#[tokio::test]
async fn test_cache_decides_which_pages_are_inspected() {
    let h = Harness::start().await;
    let fresh_indexed = "https://example.com/fresh";
    let old_indexed = "https://example.com/old";
    let fresh_crawled = "https://example.com/crawled";
    let uncached = "https://example.com/uncached";

    h.seed_cache(&[
        (fresh_indexed, "Submitted and indexed", Duration::days(1)),
        (old_indexed, "Submitted and indexed", Duration::days(15)),
        (fresh_crawled, "Crawled - currently not indexed", Duration::hours(2)),
        ("https://example.com/removed", "Page with redirect", Duration::days(3)),
    ]);

    h.mount_sitemap(&[fresh_indexed, old_indexed, fresh_crawled, uncached])
        .await;
    h.mount_inspection(fresh_indexed, "Submitted and indexed", 0)
        .await;
    h.mount_inspection(old_indexed, "Submitted and indexed", 1)
        .await;
    h.mount_inspection(fresh_crawled, "Submitted and indexed", 1)
        .await;
    h.mount_inspection(uncached, "Page with redirect", 1).await;

    let summary = h.coordinator(2).run(&h.site).await.expect("Run failed");

    assert_eq!(summary.page_count, 4);
    assert_eq!(summary.inspected_count, 3);
    assert_eq!(
        summary
            .pages_with(&IndexingStatus::SubmittedAndIndexed)
            .len(),
        3
    );
    assert!(summary.indexable.is_empty());

    // Entries for pages no longer in any sitemap are kept
    let cache = StatusCache::load(h.cache_path()).expect("Cache not written");
    assert_eq!(cache.len(), 5);
    assert!(cache.get("https://example.com/removed").is_some());
    assert_eq!(
        cache.get(fresh_crawled).map(|r| r.status.clone()),
        Some(IndexingStatus::SubmittedAndIndexed)
    );
}

#[tokio::test]
async fn test_no_sitemaps_is_fatal() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
        .and(path(SITEMAPS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&h.server)
        .await;

    let result = h.coordinator(50).run(&h.site).await;

    assert!(matches!(result, Err(IndexerError::NoSitemaps { .. })));
    assert!(!h.cache_path().exists());
}

#[tokio::test]
async fn test_forbidden_site_is_fatal() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
        .and(path(SITEMAPS_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&h.server)
        .await;

    let result = h.coordinator(50).run(&h.site).await;
    assert!(matches!(result, Err(IndexerError::NoSitemaps { .. })));
}

#[tokio::test]
async fn test_dead_sitemap_does_not_end_the_run() {
    let h = Harness::start().await;
    let page = "https://example.com/live";
    let live = format!("{}/live.xml", h.server.uri());
    let dead = format!("{}/dead.xml", h.server.uri());

    Mock::given(method("GET"))
        .and(path(SITEMAPS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "sitemap": [{ "path": dead }, { "path": live }]
        })))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dead.xml"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/live.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<urlset><url><loc>{}</loc></url></urlset>",
            page
        )))
        .mount(&h.server)
        .await;
    h.mount_inspection(page, "Submitted and indexed", 1).await;

    let summary = h.coordinator(50).run(&h.site).await.expect("Run failed");

    assert_eq!(summary.sitemap_count, 2);
    assert_eq!(summary.page_count, 1);
    assert_eq!(
        summary.pages_with(&IndexingStatus::SubmittedAndIndexed),
        &[page.to_string()]
    );
}

#[tokio::test]
async fn test_inspection_failure_aborts_without_writing_cache() {
    let h = Harness::start().await;
    let page = "https://example.com/";

    h.mount_sitemap(&[page]).await;
    Mock::given(method("POST"))
        .and(path(INSPECT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .expect(6)
        .mount(&h.server)
        .await;

    let result = h.coordinator(50).run(&h.site).await;

    assert!(matches!(result, Err(IndexerError::Api(_))));
    assert!(!h.cache_path().exists());
}

#[tokio::test]
async fn test_inspection_errors_are_cached_and_retried_next_run() {
    let h = Harness::start().await;
    let page = "https://example.com/";

    h.mount_sitemap(&[page]).await;
    Mock::given(method("POST"))
        .and(path(INSPECT_PATH))
        .respond_with(ResponseTemplate::new(400))
        .expect(2)
        .mount(&h.server)
        .await;
    h.mount_metadata(page, 200, 2).await;

    let first = h.coordinator(50).run(&h.site).await.expect("First run failed");
    assert_eq!(first.pages_with(&IndexingStatus::Error), &[page.to_string()]);

    // "Error" is always stale, so the second run inspects again
    let second = h.coordinator(50).run(&h.site).await.expect("Second run failed");
    assert_eq!(second.inspected_count, 1);
}
