//! `POST /secret`: the one protected route.

use axum::response::Json;
use serde::{Deserialize, Serialize};

use super::auth::AuthUser;

#[derive(Debug, Serialize, Deserialize)]
pub struct SecretResponse {
    pub message: String,
}

pub(crate) fn secret_message(email: &str) -> String {
    format!("our hidden value for the user {email}")
}

/// Return the per-user secret for an authenticated caller.
pub async fn secret(AuthUser { claims }: AuthUser) -> Json<SecretResponse> {
    Json(SecretResponse { message: secret_message(&claims.email) })
}
