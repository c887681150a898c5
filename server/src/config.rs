//! Server configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("please set the SUPABASE_JWT_SECRET environment variable")]
    MissingJwtSecret,
    #[error("invalid PORT value: {0:?}")]
    InvalidPort(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// HMAC secret the identity provider signs access tokens with.
    pub jwt_secret: String,
    pub port: u16,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig").field("jwt_secret", &"<redacted>").field("port", &self.port).finish()
    }
}

impl ServerConfig {
    /// Build config from the process environment.
    ///
    /// Required:
    /// - `SUPABASE_JWT_SECRET`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is unset or empty, or `PORT` is not a port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var("SUPABASE_JWT_SECRET").ok().as_deref(),
            std::env::var("PORT").ok().as_deref(),
        )
    }

    /// Build config from raw values. An empty secret counts as missing.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ServerConfig::from_env`].
    pub fn from_values(jwt_secret: Option<&str>, port: Option<&str>) -> Result<Self, ConfigError> {
        let jwt_secret = jwt_secret.filter(|s| !s.is_empty()).ok_or(ConfigError::MissingJwtSecret)?;
        let port = match port.map(str::trim).filter(|p| !p.is_empty()) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw.to_owned()))?,
            None => DEFAULT_PORT,
        };
        Ok(Self { jwt_secret: jwt_secret.to_owned(), port })
    }

    /// Listen on every interface at the configured port.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
