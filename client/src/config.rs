//! Build-time configuration for the identity provider and backend endpoint.
//!
//! SYSTEM CONTEXT
//! ==============
//! The project identifier and public anon key are baked into the WASM bundle
//! at build time (`SUPABASE_PROJECT_ID`, `SUPABASE_ANON_KEY`). Missing values
//! are not rejected: the provider URL simply comes out malformed and every
//! provider call fails. Start-up logs a warning so the cause is visible.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Backend endpoint used when `SECRET_ENDPOINT` is not set at build time.
pub const DEFAULT_SECRET_ENDPOINT: &str = "http://localhost:3000/secret";

/// Identity provider project settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Provider project identifier (the subdomain of the hosted project).
    pub project_id: String,
    /// Public API key sent as the `apikey` header on every provider call.
    pub anon_key: String,
}

impl ProviderConfig {
    #[must_use]
    pub fn new(project_id: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self { project_id: project_id.into(), anon_key: anon_key.into() }
    }

    /// Base URL of the hosted project, e.g. `https://abc.supabase.co`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("https://{}.supabase.co", self.project_id)
    }

    /// Browser storage key under which the provider persists its session.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("sb-{}-auth-token", self.project_id)
    }
}

/// Full client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    /// Protected backend route called once the user is logged in.
    pub secret_endpoint: String,
}

impl AppConfig {
    /// Read configuration captured from the build environment.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("SUPABASE_PROJECT_ID"),
            option_env!("SUPABASE_ANON_KEY"),
            option_env!("SECRET_ENDPOINT"),
        )
    }

    /// Build configuration from optional raw values. Absent provider values
    /// become empty strings; an absent or blank endpoint falls back to
    /// [`DEFAULT_SECRET_ENDPOINT`].
    #[must_use]
    pub fn from_values(project_id: Option<&str>, anon_key: Option<&str>, secret_endpoint: Option<&str>) -> Self {
        let secret_endpoint = secret_endpoint
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SECRET_ENDPOINT)
            .to_owned();
        Self {
            provider: ProviderConfig::new(project_id.unwrap_or_default(), anon_key.unwrap_or_default()),
            secret_endpoint,
        }
    }

    /// Names of the build variables that were missing or empty.
    #[must_use]
    pub fn missing_values(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.provider.project_id.is_empty() {
            missing.push("SUPABASE_PROJECT_ID");
        }
        if self.provider.anon_key.is_empty() {
            missing.push("SUPABASE_ANON_KEY");
        }
        missing
    }

    /// Log a warning for each missing provider value.
    pub fn warn_if_incomplete(&self) {
        for name in self.missing_values() {
            log::warn!("{name} was not set at build time; identity provider calls will fail");
        }
    }
}
