use futures::executor::block_on;

use super::*;

#[test]
fn access_token_read_from_stored_session() {
    let raw = r#"{"access_token":"eyJ.abc","refresh_token":"r","user":{"id":"u1"}}"#;
    assert_eq!(access_token_from_raw(Some(raw)), Some("eyJ.abc".to_owned()));
}

#[test]
fn absent_storage_yields_no_token() {
    assert_eq!(access_token_from_raw(None), None);
    assert_eq!(access_token_from_raw(Some("null")), None);
}

#[test]
fn malformed_storage_yields_no_token() {
    assert_eq!(access_token_from_raw(Some("{not json")), None);
    assert_eq!(access_token_from_raw(Some(r#"{"access_token":17}"#)), None);
    assert_eq!(access_token_from_raw(Some(r#"{"user":{}}"#)), None);
}

#[test]
fn read_access_token_off_browser_is_absent() {
    assert_eq!(read_access_token("sb-proj-auth-token"), None);
}

#[test]
fn request_is_still_built_without_token() {
    let config = AppConfig::from_values(Some("proj"), Some("anon"), None);
    let request = SecretRequest::from_storage(&config);
    assert_eq!(request.url, "http://localhost:3000/secret");
    assert!(request.authorization.is_none());
}

#[test]
fn request_carries_raw_token_without_bearer_prefix() {
    let request = SecretRequest::new("http://localhost:3000/secret", Some("eyJ.abc".to_owned()));
    assert_eq!(request.authorization.as_deref(), Some("eyJ.abc"));
}

#[test]
fn send_off_browser_is_unavailable() {
    let request = SecretRequest::new("http://localhost:3000/secret", None);
    assert_eq!(block_on(request.send()), Err(SecretError::Unavailable));
}

#[test]
fn render_secret_serializes_response_verbatim() {
    let data = serde_json::json!({ "secret": "x" });
    assert_eq!(render_secret(Some(&data)), r#"{"secret":"x"}"#);
}

#[test]
fn render_secret_keeps_backend_field_order() {
    let data: serde_json::Value = serde_json::from_str(r#"{"zeta":1,"alpha":[true,null]}"#).unwrap();
    assert_eq!(render_secret(Some(&data)), r#"{"zeta":1,"alpha":[true,null]}"#);
}

#[test]
fn render_secret_pending_is_empty() {
    assert_eq!(render_secret(None), "");
}
