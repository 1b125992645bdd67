//! Service account authentication
//!
//! Loads a service account key and exchanges a signed JWT assertion for an
//! OAuth access token with the Search Console and Indexing API scopes.

mod service_account;

pub use service_account::{ServiceAccount, ServiceAccountKey, SCOPES};
