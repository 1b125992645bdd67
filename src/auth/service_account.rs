use crate::http::RetryingClient;
use crate::AuthError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// OAuth scopes requested for the access token
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/webmasters.readonly",
    "https://www.googleapis.com/auth/indexing",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// The fields of a service account key file this crate needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
}

/// A loaded service account, able to mint access tokens
#[derive(Debug, Clone)]
pub struct ServiceAccount {
    key: ServiceAccountKey,
}

impl ServiceAccount {
    /// Reads a service account key file
    ///
    /// # Returns
    ///
    /// * `Ok(ServiceAccount)` - Key file parsed
    /// * `Err(AuthError::MissingKeyFile)` - No file at `path`
    /// * `Err(AuthError)` - File unreadable or not a service account key
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        if !path.exists() {
            return Err(AuthError::MissingKeyFile(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a service account key from its JSON text
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let key: ServiceAccountKey = serde_json::from_str(json)?;
        Ok(Self { key })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Token endpoint from the key file, or `fallback` when it has none
    pub fn token_uri<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.key.token_uri.as_deref().unwrap_or(fallback)
    }

    /// Signs the RS256 JWT assertion sent to the token endpoint
    ///
    /// The assertion is valid for one hour from `now`.
    pub fn assertion(&self, audience: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SCOPES.join(" "),
            aud: audience,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };

        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &signing_key)?)
    }

    /// Exchanges a fresh assertion for an access token
    ///
    /// # Arguments
    ///
    /// * `http` - Retrying client used for the token request
    /// * `fallback_token_uri` - Token endpoint used when the key has no `token_uri`
    pub async fn fetch_access_token(
        &self,
        http: &RetryingClient,
        fallback_token_uri: &str,
    ) -> Result<String, AuthError> {
        let token_uri = self.token_uri(fallback_token_uri);
        let assertion = self.assertion(token_uri, Utc::now())?;

        tracing::debug!(
            "Requesting access token for {} from {}",
            self.key.client_email,
            token_uri
        );

        let response = http
            .send(
                http.client()
                    .post(token_uri)
                    .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())]),
            )
            .await?;

        let status = response.status().as_u16();
        if status >= 300 {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected { status, body });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Api(e.into()))?;

        if token.access_token.is_empty() {
            return Err(AuthError::EmptyToken);
        }

        Ok(token.access_token)
    }
}
