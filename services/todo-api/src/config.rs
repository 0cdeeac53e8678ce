//! Configuration for the Todo API service.

use std::time::Duration;

use axum::http::HeaderValue;
use warden_auth_core::AuthConfig;

/// Where accounts and todos are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// PostgreSQL via `DATABASE_URL`
    Postgres,
    /// Process memory; everything is lost on restart
    Memory,
}

/// Todo API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,
    /// Storage backend
    pub storage: StorageMode,
    /// Database URL (required for Postgres storage)
    pub database_url: Option<String>,
    /// Request timeout
    pub request_timeout: Duration,
    /// Allowed CORS origin; any origin when unset
    pub cors_allowed_origin: Option<HeaderValue>,
    /// Deployment environment name (`WARDEN_ENV`)
    pub environment: String,
    /// Auth core configuration
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Server
        let http_port = lookup("HTTP_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Storage
        let storage = match lookup("WARDEN_STORAGE").as_deref() {
            None | Some("postgres") => StorageMode::Postgres,
            Some("memory") => StorageMode::Memory,
            Some(_) => return Err(ConfigError::Invalid("WARDEN_STORAGE")),
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        if storage == StorageMode::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        // Request timeout
        let request_timeout_secs: u64 = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        // CORS
        let cors_allowed_origin = match lookup("CORS_ALLOWED_ORIGIN").filter(|o| !o.is_empty()) {
            None => None,
            Some(origin) => Some(
                HeaderValue::from_str(&origin)
                    .map_err(|_| ConfigError::Invalid("CORS_ALLOWED_ORIGIN"))?,
            ),
        };

        let environment = lookup("WARDEN_ENV").unwrap_or_else(|| "development".to_string());

        // Auth
        let token_ttl_hours: u64 = lookup("TOKEN_TTL_HOURS")
            .unwrap_or_else(|| "24".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("TOKEN_TTL_HOURS"))?;
        let token_ttl_secs = token_ttl_hours
            .checked_mul(60 * 60)
            .ok_or(ConfigError::Invalid("TOKEN_TTL_HOURS"))?;
        let auth = AuthConfig::from_lookup(&lookup)
            .with_token_ttl(Duration::from_secs(token_ttl_secs));

        let config = Self {
            http_port,
            storage,
            database_url,
            request_timeout: Duration::from_secs(request_timeout_secs),
            cors_allowed_origin,
            environment,
            auth,
        };
        config.validate()?;
        Ok(config)
    }

    /// In-memory configuration around an existing auth config
    pub fn in_memory(auth: AuthConfig) -> Self {
        Self {
            http_port: 0,
            storage: StorageMode::Memory,
            database_url: None,
            request_timeout: Duration::from_secs(30),
            cors_allowed_origin: None,
            environment: "test".to_string(),
            auth,
        }
    }

    /// Whether this is a production deployment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.is_production() && self.auth.uses_development_key() {
            return Err(ConfigError::InsecureSigningKey);
        }
        self.auth
            .validate()
            .map_err(|e| ConfigError::Auth(e.to_string()))
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("JWT_SECRET_KEY must be set in production")]
    InsecureSigningKey,

    #[error("Invalid auth configuration: {0}")]
    Auth(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_memory_defaults() {
        let config = load(&[("WARDEN_STORAGE", "memory")]).unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.storage, StorageMode::Memory);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.auth.token_ttl, Duration::from_secs(86_400));
        assert!(config.cors_allowed_origin.is_none());
        assert!(!config.is_production());
    }

    #[test]
    fn test_postgres_requires_database_url() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing("DATABASE_URL"))));

        let config = load(&[("DATABASE_URL", "postgres://localhost/todo")]).unwrap();
        assert_eq!(config.storage, StorageMode::Postgres);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("WARDEN_STORAGE", "memory"), ("HTTP_PORT", "eighty")]),
            Err(ConfigError::Invalid("HTTP_PORT"))
        ));
        assert!(matches!(
            load(&[("WARDEN_STORAGE", "sqlite")]),
            Err(ConfigError::Invalid("WARDEN_STORAGE"))
        ));
    }

    #[test]
    fn test_production_rejects_development_key() {
        let result = load(&[("WARDEN_STORAGE", "memory"), ("WARDEN_ENV", "production")]);
        assert!(matches!(result, Err(ConfigError::InsecureSigningKey)));

        let key = "p".repeat(48);
        let config = load(&[
            ("WARDEN_STORAGE", "memory"),
            ("WARDEN_ENV", "production"),
            ("JWT_SECRET_KEY", key.as_str()),
        ])
        .unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_short_signing_key_rejected() {
        let result = load(&[("WARDEN_STORAGE", "memory"), ("JWT_SECRET_KEY", "short")]);
        assert!(matches!(result, Err(ConfigError::Auth(_))));
    }

    #[test]
    fn test_token_ttl_hours() {
        let config = load(&[("WARDEN_STORAGE", "memory"), ("TOKEN_TTL_HOURS", "2")]).unwrap();
        assert_eq!(config.auth.token_ttl, Duration::from_secs(7_200));
    }

    #[test]
    fn test_token_ttl_hours_out_of_range() {
        let result = load(&[
            ("WARDEN_STORAGE", "memory"),
            ("TOKEN_TTL_HOURS", "18446744073709551615"),
        ]);
        assert!(matches!(result, Err(ConfigError::Invalid("TOKEN_TTL_HOURS"))));

        // Fits in u64 seconds but not in a token's i64 timestamps
        let result = load(&[
            ("WARDEN_STORAGE", "memory"),
            ("TOKEN_TTL_HOURS", "3000000000000000"),
        ]);
        assert!(matches!(result, Err(ConfigError::Auth(_))));
    }
}
