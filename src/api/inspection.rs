use super::GoogleApiClient;
use crate::site::SiteUrl;
use crate::state::IndexingStatus;
use crate::ApiResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectRequest<'a> {
    inspection_url: &'a str,
    site_url: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InspectResponse {
    inspection_result: InspectionResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InspectionResult {
    index_status_result: IndexStatusResult,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexStatusResult {
    coverage_state: String,
}

impl GoogleApiClient {
    /// Asks the URL inspection API for a page's coverage state
    ///
    /// # Status Mapping
    ///
    /// | Response | Result |
    /// |----------|--------|
    /// | HTTP 403 | `Forbidden` |
    /// | HTTP >= 300 | `Error` |
    /// | Otherwise | coverage state from the body |
    ///
    /// # Returns
    ///
    /// * `Ok(IndexingStatus)` - The mapped status
    /// * `Err(ApiError)` - Transport failure after retries, or unparsable
    ///   body; not swallowed, so a batch run aborts on it
    pub async fn inspect_url(&self, site: &SiteUrl, page_url: &str) -> ApiResult<IndexingStatus> {
        let url = Self::endpoint(
            &self.endpoints.search_console,
            "/v1/urlInspection/index:inspect",
        )?;
        let request = InspectRequest {
            inspection_url: page_url,
            site_url: site.as_str(),
        };

        let response = self
            .http
            .send(self.authorized(self.http.client().post(url.clone()).json(&request)))
            .await
            .map_err(|e| {
                tracing::error!("Failed to get indexing status of {}: {}", page_url, e);
                e
            })?;

        let status = response.status().as_u16();
        if status == 403 {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "This service account doesn't have access to {}: {}",
                site,
                body
            );
            return Ok(IndexingStatus::Forbidden);
        }
        if status >= 300 {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "Failed to get indexing status of {} (status {}): {}",
                page_url,
                status,
                body
            );
            return Ok(IndexingStatus::Error);
        }

        let body: InspectResponse = Self::read_json(&url, response).await?;
        Ok(IndexingStatus::from_api_string(
            &body.inspection_result.index_status_result.coverage_state,
        ))
    }
}
