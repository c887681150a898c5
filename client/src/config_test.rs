use super::*;

#[test]
fn provider_url_uses_project_subdomain() {
    let config = ProviderConfig::new("abcd1234", "anon");
    assert_eq!(config.url(), "https://abcd1234.supabase.co");
}

#[test]
fn storage_key_embeds_project_id() {
    let config = ProviderConfig::new("abcd1234", "anon");
    assert_eq!(config.storage_key(), "sb-abcd1234-auth-token");
}

#[test]
fn missing_project_id_yields_malformed_url() {
    let config = AppConfig::from_values(None, None, None);
    assert_eq!(config.provider.url(), "https://.supabase.co");
    assert_eq!(config.provider.storage_key(), "sb--auth-token");
}

#[test]
fn from_values_defaults_secret_endpoint() {
    let config = AppConfig::from_values(Some("p"), Some("k"), None);
    assert_eq!(config.secret_endpoint, DEFAULT_SECRET_ENDPOINT);
    assert_eq!(config.secret_endpoint, "http://localhost:3000/secret");
}

#[test]
fn from_values_blank_endpoint_falls_back_to_default() {
    let config = AppConfig::from_values(Some("p"), Some("k"), Some("   "));
    assert_eq!(config.secret_endpoint, DEFAULT_SECRET_ENDPOINT);
}

#[test]
fn from_values_keeps_endpoint_override() {
    let config = AppConfig::from_values(Some("p"), Some("k"), Some(" https://api.example.test/secret "));
    assert_eq!(config.secret_endpoint, "https://api.example.test/secret");
}

#[test]
fn missing_values_lists_absent_provider_settings() {
    assert_eq!(
        AppConfig::from_values(None, None, None).missing_values(),
        vec!["SUPABASE_PROJECT_ID", "SUPABASE_ANON_KEY"]
    );
    assert_eq!(AppConfig::from_values(Some("p"), None, None).missing_values(), vec!["SUPABASE_ANON_KEY"]);
    assert!(AppConfig::from_values(Some("p"), Some("k"), None).missing_values().is_empty());
}
