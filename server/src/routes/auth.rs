//! Auth extractor for routes that require a provider-issued access token.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use axum::extract::FromRef;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};

use crate::services::token::{self, Claims};
use crate::state::AppState;

/// Token from the `Authorization` header. The client sends the raw token;
/// a `Bearer ` prefix is tolerated.
pub(crate) fn request_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = raw.trim_start().strip_prefix("Bearer ").unwrap_or(raw).trim();
    (!token.is_empty()).then_some(token)
}

/// Rejection for missing or invalid credentials: `401 {"error":"Unauthorized"}`.
#[derive(Debug)]
pub struct Unauthorized;

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(serde_json::json!({ "error": "Unauthorized" }))).into_response()
    }
}

/// Authenticated caller extracted from the access token.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub claims: Claims,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Unauthorized;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = request_token(&parts.headers).ok_or(Unauthorized)?;

        let app_state = AppState::from_ref(state);
        match token::parse_token(token, &app_state.decoding_key) {
            Ok(claims) => {
                tracing::info!(email = %claims.email, sub = ?claims.sub, role = ?claims.role, "received request");
                Ok(Self { claims })
            }
            Err(e) => {
                tracing::warn!(error = %e, "rejected access token");
                Err(Unauthorized)
            }
        }
    }
}
