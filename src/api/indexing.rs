use super::GoogleApiClient;
use crate::ApiResult;
use serde::Serialize;

/// Notification type declaring that a URL's content changed
pub const NOTIFICATION_TYPE_UPDATED: &str = "URL_UPDATED";

/// Publish metadata status for a URL that was never submitted
pub const STATUS_NEVER_SUBMITTED: u16 = 404;

#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    url: &'a str,
    #[serde(rename = "type")]
    notification_type: &'a str,
}

impl GoogleApiClient {
    /// Probes the notification metadata of a URL
    ///
    /// Returns the raw HTTP status: 404 means the URL was never submitted,
    /// anything below 400 means it was. 403 and 5xx are logged.
    pub async fn get_publish_metadata(&self, page_url: &str) -> ApiResult<u16> {
        let url = Self::endpoint(&self.endpoints.indexing, "/v3/urlNotifications/metadata")?;

        let response = self
            .http
            .send(self.authorized(self.http.client().get(url).query(&[("url", page_url)])))
            .await?;

        let status = response.status().as_u16();
        if status == 403 {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "This service account doesn't have access to {}: {}",
                page_url,
                body
            );
        } else if status >= 500 {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "Failed to get publish metadata of {} (status {}): {}",
                page_url,
                status,
                body
            );
        }

        Ok(status)
    }

    /// Declares a `URL_UPDATED` notification for a URL
    ///
    /// Failures are logged and reported through the returned status, never
    /// raised; only a transport failure after retries is an `Err`.
    pub async fn request_indexing(&self, page_url: &str) -> ApiResult<u16> {
        let url = Self::endpoint(&self.endpoints.indexing, "/v3/urlNotifications:publish")?;
        let request = PublishRequest {
            url: page_url,
            notification_type: NOTIFICATION_TYPE_UPDATED,
        };

        let response = self
            .http
            .send(self.authorized(self.http.client().post(url).json(&request)))
            .await?;

        let status = response.status().as_u16();
        if status == 403 {
            tracing::error!("This service account doesn't have access to {}", page_url);
        }
        if status >= 300 {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                "Failed to request indexing of {} (status {}): {}",
                page_url,
                status,
                body
            );
        }

        Ok(status)
    }
}
