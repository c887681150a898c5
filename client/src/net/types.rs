//! Identity-provider DTOs shared by the identity client and UI state.
//!
//! DESIGN
//! ======
//! Field names mirror the provider's JSON so a session persisted to browser
//! storage by this client has the same shape the provider's own libraries
//! write (`{ access_token, token_type, ..., user }`).

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Authenticated user as returned by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Provider user identifier (UUID string).
    pub id: String,
    pub email: Option<String>,
    /// Audience the user's tokens are issued for (usually `"authenticated"`).
    #[serde(default)]
    pub aud: String,
    pub role: Option<String>,
}

/// Provider-issued session: the user plus their bearer credential.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime of `access_token` in seconds.
    pub expires_in: Option<u64>,
    /// Expiry as seconds since the Unix epoch.
    pub expires_at: Option<i64>,
    pub refresh_token: Option<String>,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

/// Minimal projection of the stored session: only the bearer credential.
///
/// Anything else in the stored payload is ignored, so partially written or
/// foreign-shaped sessions still yield a token when one is present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StoredToken {
    pub access_token: Option<String>,
}

/// Auth-state-change notification kinds emitted by the identity client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthChangeEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
}

impl AuthChangeEvent {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InitialSession => "INITIAL_SESSION",
            Self::SignedIn => "SIGNED_IN",
            Self::SignedOut => "SIGNED_OUT",
            Self::TokenRefreshed => "TOKEN_REFRESHED",
            Self::UserUpdated => "USER_UPDATED",
            Self::PasswordRecovery => "PASSWORD_RECOVERY",
        }
    }
}

impl fmt::Display for AuthChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
