//! Authenticated request to the protected backend.
//!
//! Client-side (csr): real HTTP call via `gloo-net`.
//! Off-browser: `send` fails with [`SecretError::Unavailable`].
//!
//! The bearer credential is read synchronously from browser storage at the
//! moment the request is built, not from the in-memory session. When no
//! token is stored the request is still sent, just without the header.
//!
//! ERROR HANDLING
//! ==============
//! No retry. The response status is not inspected: whatever JSON the backend
//! answers with (including its `{"error": ...}` body) is the result. Only
//! transport failures and non-JSON bodies are errors.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::StoredToken;
use crate::config::AppConfig;
use crate::util::storage;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("secret request failed: {0}")]
    Transport(String),
    #[error("secret response was not JSON: {0}")]
    Decode(String),
    #[error("secret endpoint is only reachable from the browser")]
    Unavailable,
}

/// Extract the bearer token from a raw stored-session string.
/// Absent or malformed content yields no token.
pub(crate) fn access_token_from_raw(raw: Option<&str>) -> Option<String> {
    let stored: StoredToken = serde_json::from_str(raw?).ok()?;
    stored.access_token
}

/// Read the bearer token the identity provider persisted under `storage_key`.
pub fn read_access_token(storage_key: &str) -> Option<String> {
    access_token_from_raw(storage::load_raw(storage_key).as_deref())
}

/// A `POST` to the secret endpoint with an optional raw `Authorization` value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretRequest {
    pub url: String,
    pub authorization: Option<String>,
}

impl SecretRequest {
    #[must_use]
    pub fn new(url: impl Into<String>, token: Option<String>) -> Self {
        Self { url: url.into(), authorization: token }
    }

    /// Build the request with whatever token is currently in storage.
    #[must_use]
    pub fn from_storage(config: &AppConfig) -> Self {
        Self::new(config.secret_endpoint.clone(), read_access_token(&config.provider.storage_key()))
    }

    /// Issue the request and decode the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the body is not JSON.
    pub async fn send(&self) -> Result<serde_json::Value, SecretError> {
        #[cfg(feature = "csr")]
        {
            let mut builder = gloo_net::http::Request::post(&self.url);
            if let Some(token) = &self.authorization {
                builder = builder.header("Authorization", token);
            }
            let resp = builder.send().await.map_err(|e| SecretError::Transport(e.to_string()))?;
            resp.json::<serde_json::Value>().await.map_err(|e| SecretError::Decode(e.to_string()))
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(SecretError::Unavailable)
        }
    }
}

/// Text shown for the backend response: its JSON serialization, or nothing
/// while pending or after a failure.
#[must_use]
pub fn render_secret(data: Option<&serde_json::Value>) -> String {
    data.and_then(|value| serde_json::to_string(value).ok()).unwrap_or_default()
}
