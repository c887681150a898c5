//! Shared application state.
//!
//! `AppState` is injected into Axum handlers and extractors via `FromRef`.
//! It only carries the immutable key used to verify access tokens.

use std::sync::Arc;

use jsonwebtoken::DecodingKey;

#[derive(Clone)]
pub struct AppState {
    pub decoding_key: Arc<DecodingKey>,
}

impl AppState {
    #[must_use]
    pub fn new(jwt_secret: &str) -> Self {
        Self { decoding_key: Arc::new(DecodingKey::from_secret(jwt_secret.as_bytes())) }
    }
}
