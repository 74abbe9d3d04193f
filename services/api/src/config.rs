//! Service configuration loaded from the environment

use anyhow::{Result, bail};
use serde::Deserialize;

/// Where user and task records live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

/// Token signing configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret for signing access tokens
    pub jwt_secret: String,
    /// Secret for signing refresh tokens, distinct from `jwt_secret`
    pub jwt_refresh_secret: String,
    /// Access token expiration time in seconds (default: 15 minutes)
    pub jwt_access_token_expiry: u64,
    /// Refresh token expiration time in seconds (default: 7 days)
    pub jwt_refresh_token_expiry: u64,
}

impl JwtConfig {
    /// Build a config with the default expiries
    pub fn new(jwt_secret: impl Into<String>, jwt_refresh_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            jwt_refresh_secret: jwt_refresh_secret.into(),
            jwt_access_token_expiry: default_access_token_expiry(),
            jwt_refresh_token_expiry: default_refresh_token_expiry(),
        }
    }

    /// Reject secrets that would let one token kind stand in for the other
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() || self.jwt_refresh_secret.is_empty() {
            bail!("JWT_SECRET and JWT_REFRESH_SECRET must not be empty");
        }
        if self.jwt_secret == self.jwt_refresh_secret {
            bail!("JWT_SECRET and JWT_REFRESH_SECRET must differ");
        }
        if self.jwt_access_token_expiry == 0 || self.jwt_refresh_token_expiry == 0 {
            bail!("token expiries must be positive");
        }
        Ok(())
    }
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub storage: StorageBackend,
    pub jwt_secret: String,
    pub jwt_refresh_secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub jwt_access_token_expiry: u64,
    #[serde(default = "default_refresh_token_expiry")]
    pub jwt_refresh_token_expiry: u64,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Secret for access tokens (required)
    /// - `JWT_REFRESH_SECRET`: Secret for refresh tokens (required)
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 900)
    /// - `JWT_REFRESH_TOKEN_EXPIRY`: Refresh token expiry in seconds (default: 604800)
    /// - `LISTEN_ADDR`: Bind address (default: 0.0.0.0:3000)
    /// - `STORAGE`: `postgres` or `memory` (default: postgres)
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.jwt().validate()?;

        Ok(config)
    }

    /// Token signing settings
    pub fn jwt(&self) -> JwtConfig {
        JwtConfig {
            jwt_secret: self.jwt_secret.clone(),
            jwt_refresh_secret: self.jwt_refresh_secret.clone(),
            jwt_access_token_expiry: self.jwt_access_token_expiry,
            jwt_refresh_token_expiry: self.jwt_refresh_token_expiry,
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_access_token_expiry() -> u64 {
    900
}

fn default_refresh_token_expiry() -> u64 {
    604800
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "JWT_SECRET",
        "JWT_REFRESH_SECRET",
        "JWT_ACCESS_TOKEN_EXPIRY",
        "JWT_REFRESH_TOKEN_EXPIRY",
        "LISTEN_ADDR",
        "STORAGE",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn test_app_config_from_env_defaults() {
        clear_env();
        unsafe {
            std::env::set_var("JWT_SECRET", "access-secret");
            std::env::set_var("JWT_REFRESH_SECRET", "refresh-secret");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.jwt_secret, "access-secret");
        assert_eq!(config.jwt_refresh_secret, "refresh-secret");
        assert_eq!(config.jwt_access_token_expiry, 900);
        assert_eq!(config.jwt_refresh_token_expiry, 604800);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_app_config_from_env_with_custom_values() {
        clear_env();
        unsafe {
            std::env::set_var("JWT_SECRET", "access-secret");
            std::env::set_var("JWT_REFRESH_SECRET", "refresh-secret");
            std::env::set_var("JWT_ACCESS_TOKEN_EXPIRY", "60");
            std::env::set_var("LISTEN_ADDR", "127.0.0.1:8080");
            std::env::set_var("STORAGE", "memory");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.jwt_access_token_expiry, 60);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_app_config_requires_secrets() {
        clear_env();
        assert!(AppConfig::from_env().is_err());
    }

    #[test]
    fn test_identical_secrets_rejected() {
        let config = JwtConfig::new("same", "same");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let config = JwtConfig::new("", "refresh");
        assert!(config.validate().is_err());
    }
}
