use super::test_helpers::{SECRET, now_secs, sign_json, token_for, valid_token};
use super::*;

fn key() -> DecodingKey {
    DecodingKey::from_secret(SECRET.as_bytes())
}

#[test]
fn valid_token_yields_claims() {
    let claims = parse_token(&valid_token("alice@example.com"), &key()).unwrap();
    assert_eq!(claims.email, "alice@example.com");
    assert_eq!(claims.sub.as_deref(), Some("6f1c2a8e-0000-4000-8000-000000000001"));
    assert_eq!(claims.role.as_deref(), Some("authenticated"));
}

#[test]
fn token_without_exp_is_accepted() {
    let token = sign_json(&serde_json::json!({ "email": "a@b.com" }), SECRET);
    assert_eq!(parse_token(&token, &key()).unwrap().email, "a@b.com");
}

#[test]
fn hs512_tokens_are_accepted() {
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(Algorithm::HS512),
        &serde_json::json!({ "email": "a@b.com", "exp": now_secs() + 60 }),
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    assert!(parse_token(&token, &key()).is_ok());
}

#[test]
fn missing_email_claim_defaults_to_empty() {
    let token = sign_json(&serde_json::json!({ "sub": "u1", "exp": now_secs() + 60 }), SECRET);
    let claims = parse_token(&token, &key()).unwrap();
    assert_eq!(claims.email, "");
    assert_eq!(claims.sub.as_deref(), Some("u1"));
}

#[test]
fn wrong_secret_is_rejected() {
    let token = token_for("a@b.com", now_secs() + 3600, "some-other-secret-value");
    assert!(matches!(parse_token(&token, &key()), Err(TokenError::Invalid(_))));
}

#[test]
fn expired_token_is_rejected() {
    let token = token_for("a@b.com", now_secs() - 3600, SECRET);
    assert!(matches!(parse_token(&token, &key()), Err(TokenError::Invalid(_))));
}

#[test]
fn non_hmac_algorithm_is_rejected() {
    // {"alg":"RS256","typ":"JWT"} . {} . arbitrary signature
    let token = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.e30.c2lnbmF0dXJl";
    assert!(matches!(parse_token(token, &key()), Err(TokenError::UnexpectedAlgorithm(Algorithm::RS256))));
}

#[test]
fn garbage_is_rejected() {
    assert!(matches!(parse_token("not-a-jwt", &key()), Err(TokenError::Invalid(_))));
    assert!(matches!(parse_token("", &key()), Err(TokenError::Invalid(_))));
}
