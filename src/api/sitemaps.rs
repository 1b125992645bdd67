use super::{encode_component, GoogleApiClient};
use crate::site::SiteUrl;
use crate::ApiResult;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SitemapsResponse {
    #[serde(default)]
    sitemap: Vec<SitemapEntry>,
}

#[derive(Debug, Deserialize)]
struct SitemapEntry {
    path: String,
}

impl GoogleApiClient {
    /// Lists the sitemaps registered for a property
    ///
    /// A 403 or any other status >= 300 is logged and yields an empty list;
    /// the caller decides whether "no sitemaps" is fatal.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - Sitemap URLs, possibly empty
    /// * `Err(ApiError)` - Transport failure after retries, or unparsable body
    pub async fn list_sitemaps(&self, site: &SiteUrl) -> ApiResult<Vec<String>> {
        let url = Self::endpoint(
            &self.endpoints.webmasters,
            &format!(
                "/webmasters/v3/sites/{}/sitemaps",
                encode_component(site.as_str())
            ),
        )?;

        let response = self
            .http
            .send(self.authorized(self.http.client().get(url.clone())))
            .await?;

        let status = response.status().as_u16();
        if status == 403 {
            tracing::error!("This service account doesn't have access to {}", site);
            return Ok(Vec::new());
        }
        if status >= 300 {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "Failed to get list of sitemaps (status {}): {}",
                status,
                body
            );
            return Ok(Vec::new());
        }

        let body: SitemapsResponse = Self::read_json(&url, response).await?;
        Ok(body.sitemap.into_iter().map(|entry| entry.path).collect())
    }
}
