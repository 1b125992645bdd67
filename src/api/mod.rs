//! Remote API clients
//!
//! Request/response mappings for the Google endpoints this crate talks to:
//! - Sitemap listing (Webmasters API)
//! - URL inspection (Search Console API)
//! - Publish metadata and URL notifications (Indexing API)
//!
//! Every request goes through the shared [`RetryingClient`] with the bearer
//! token attached.

mod indexing;
mod inspection;
mod sitemaps;

pub use indexing::{NOTIFICATION_TYPE_UPDATED, STATUS_NEVER_SUBMITTED};

use crate::config::EndpointsConfig;
use crate::http::RetryingClient;
use crate::{ApiError, ApiResult};
use reqwest::RequestBuilder;
use url::Url;

/// Authenticated client for the Search Console, Webmasters and Indexing APIs
#[derive(Debug, Clone)]
pub struct GoogleApiClient {
    http: RetryingClient,
    access_token: String,
    endpoints: EndpointsConfig,
}

impl GoogleApiClient {
    /// Creates a client that authenticates every call with `access_token`
    pub fn new(http: RetryingClient, access_token: String, endpoints: EndpointsConfig) -> Self {
        Self {
            http,
            access_token,
            endpoints,
        }
    }

    /// Returns the underlying retrying client (also used for sitemap files)
    pub fn http(&self) -> &RetryingClient {
        &self.http
    }

    /// Joins a base URL and a path that is already percent-encoded
    fn endpoint(base: &str, path: &str) -> ApiResult<Url> {
        let url = format!("{}{}", base.trim_end_matches('/'), path);
        Ok(Url::parse(&url)?)
    }

    /// Attaches the JSON content type and bearer token
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.access_token)
    }

    /// Reads a JSON body, reporting parse failures with the request URL
    async fn read_json<T: serde::de::DeserializeOwned>(
        url: &Url,
        response: reqwest::Response,
    ) -> ApiResult<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Percent-encodes a value for use as a single path segment
///
/// Everything except ASCII letters, digits and `-_.~` is escaped, so `/`,
/// `:` and spaces never leak into the path structure.
fn encode_component(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
