use super::*;

#[test]
fn from_values_defaults_port() {
    let cfg = ServerConfig::from_values(Some("s3cret"), None).unwrap();
    assert_eq!(cfg.jwt_secret, "s3cret");
    assert_eq!(cfg.port, DEFAULT_PORT);
}

#[test]
fn from_values_parses_port_override() {
    let cfg = ServerConfig::from_values(Some("s3cret"), Some(" 8080 ")).unwrap();
    assert_eq!(cfg.port, 8080);
}

#[test]
fn from_values_blank_port_uses_default() {
    let cfg = ServerConfig::from_values(Some("s3cret"), Some("")).unwrap();
    assert_eq!(cfg.port, 3000);
}

#[test]
fn from_values_rejects_invalid_port() {
    assert_eq!(
        ServerConfig::from_values(Some("s3cret"), Some("http")),
        Err(ConfigError::InvalidPort("http".to_owned()))
    );
    assert_eq!(
        ServerConfig::from_values(Some("s3cret"), Some("70000")),
        Err(ConfigError::InvalidPort("70000".to_owned()))
    );
}

#[test]
fn from_values_requires_secret() {
    assert_eq!(ServerConfig::from_values(None, None), Err(ConfigError::MissingJwtSecret));
    assert_eq!(ServerConfig::from_values(Some(""), Some("3000")), Err(ConfigError::MissingJwtSecret));
}

#[test]
fn bind_addr_listens_on_all_interfaces() {
    let cfg = ServerConfig::from_values(Some("s"), Some("4100")).unwrap();
    assert_eq!(cfg.bind_addr().to_string(), "0.0.0.0:4100");
}

#[test]
fn debug_output_redacts_secret() {
    let cfg = ServerConfig::from_values(Some("super-secret-value"), None).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret-value"));
    assert!(rendered.contains("<redacted>"));
}

// Only this test touches SUPABASE_JWT_SECRET and PORT.
#[test]
fn from_env_reads_process_environment() {
    unsafe {
        std::env::set_var("SUPABASE_JWT_SECRET", "env-secret");
        std::env::set_var("PORT", "3901");
    }
    let cfg = ServerConfig::from_env().unwrap();
    assert_eq!(cfg.jwt_secret, "env-secret");
    assert_eq!(cfg.port, 3901);

    unsafe {
        std::env::remove_var("SUPABASE_JWT_SECRET");
        std::env::remove_var("PORT");
    }
    assert_eq!(ServerConfig::from_env(), Err(ConfigError::MissingJwtSecret));
}
