//! Retrying request executor
//!
//! Every call to a remote API goes through [`RetryingClient::execute`].
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | Network error | Retry immediately |
//! | HTTP 5xx | Retry immediately |
//! | HTTP < 500 (incl. 4xx) | Return response to caller |
//! | Budget exhausted | Return last failure |

use crate::{ApiError, ApiResult};
use reqwest::{Client, Request, RequestBuilder, Response};

/// Retry budget used when the configuration does not override it
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Builds the HTTP client shared by all API clients
///
/// No request timeout is set; the transport defaults apply.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .gzip(true)
        .brotli(true)
        .build()
}

/// HTTP client wrapper that reissues transient failures
///
/// A request is attempted at most `max_retries + 1` times.
#[derive(Debug, Clone)]
pub struct RetryingClient {
    client: Client,
    max_retries: u32,
}

impl RetryingClient {
    pub fn new(client: Client, max_retries: u32) -> Self {
        Self {
            client,
            max_retries,
        }
    }

    /// Returns the underlying client for building requests
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Builds the request and executes it with retries
    pub async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let request = builder.build()?;
        self.execute(request).await
    }

    /// Executes a fully-formed request, retrying network errors and 5xx
    ///
    /// # Arguments
    ///
    /// * `request` - The request to send; it must have a replayable body
    ///
    /// # Returns
    ///
    /// * `Ok(Response)` - The first response with a status below 500
    /// * `Err(ApiError::Transport)` - The last attempt failed at the network level
    /// * `Err(ApiError::Server)` - The last attempt returned a 5xx, with its body
    pub async fn execute(&self, request: Request) -> ApiResult<Response> {
        let mut attempt: u32 = 0;

        loop {
            let replay = request.try_clone().ok_or_else(|| ApiError::Unreplayable {
                url: request.url().to_string(),
            })?;

            let failure = match self.client.execute(replay).await {
                Ok(response) if response.status().as_u16() >= 500 => {
                    let status = response.status().as_u16();
                    let body = response.text().await.unwrap_or_default();
                    ApiError::Server { status, body }
                }
                Ok(response) => return Ok(response),
                Err(e) => ApiError::Transport(e),
            };

            if attempt >= self.max_retries {
                tracing::debug!(
                    "Giving up on {} {} after {} attempts",
                    request.method(),
                    request.url(),
                    attempt + 1
                );
                return Err(failure);
            }

            attempt += 1;
            tracing::debug!(
                "Retrying {} {} ({}/{}): {}",
                request.method(),
                request.url(),
                attempt,
                self.max_retries,
                failure
            );
        }
    }
}
