//! HTTP plumbing shared by every remote API
//!
//! This module contains:
//! - Building the shared HTTP client
//! - The retrying request executor (network errors and 5xx responses)
//! - The batched task runner that bounds concurrent requests

mod batch;
mod retry;

pub use batch::run_batched;
pub use retry::{build_http_client, RetryingClient, DEFAULT_MAX_RETRIES};
