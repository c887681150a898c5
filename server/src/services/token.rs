//! Access-token verification for identity-provider JWTs.
//!
//! DESIGN
//! ======
//! Tokens are HMAC-signed by the identity provider with the project's JWT
//! secret. Only the HS* family is accepted; the algorithm is checked against
//! the header before the signature is verified so a token cannot pick a
//! different key family. `exp` is enforced when present. Audience is not
//! checked.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims read from a provider access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Empty when the token carries no email claim.
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("unexpected signing method: {0:?}")]
    UnexpectedAlgorithm(Algorithm),
    #[error("error validating token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Verify `token` against `key` and return its claims.
///
/// # Errors
///
/// Returns an error for malformed tokens, non-HMAC algorithms, bad
/// signatures and expired tokens.
pub fn parse_token(token: &str, key: &DecodingKey) -> Result<Claims, TokenError> {
    let header = jsonwebtoken::decode_header(token)?;
    if !matches!(header.alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
        return Err(TokenError::UnexpectedAlgorithm(header.alg));
    }

    let mut validation = Validation::new(header.alg);
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Claims>(token, key, &validation)?;
    Ok(data.claims)
}
