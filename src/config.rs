//! Authentication Configuration
//!
//! All configuration values are loaded from environment variables.
//! No hardcoded secrets or sensitive data.

use crate::error::AuthError;
use std::env;
use std::str::FromStr;

/// Authentication configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT secret key for signing tokens (from JWT_SECRET env var)
    pub jwt_secret: String,

    /// JWT expiration in seconds (from JWT_EXPIRATION env var)
    pub token_expiration: i64,

    /// JWT issuer (from JWT_ISSUER env var)
    pub jwt_issuer: String,

    /// JWT audience (from JWT_AUDIENCE env var)
    pub jwt_audience: String,

    /// Argon2 memory cost in KiB (from ARGON2_MEMORY_COST env var)
    pub argon2_memory_cost: u32,

    /// Argon2 time cost (iterations) (from ARGON2_TIME_COST env var)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (from ARGON2_PARALLELISM env var)
    pub argon2_parallelism: u32,
}

/// Longest accepted token lifetime in seconds (one year)
pub const MAX_TOKEN_EXPIRATION: i64 = 365 * 24 * 60 * 60;

impl AuthConfig {
    /// Load configuration from environment variables
    ///
    /// Fails with [`AuthError::Config`] if `JWT_SECRET` is not set.
    /// The result is not validated; call [`AuthConfig::validate`].
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuthError> {
        let jwt_secret = lookup("JWT_SECRET").ok_or_else(|| {
            AuthError::Config("JWT_SECRET environment variable must be set".to_string())
        })?;

        Ok(Self {
            jwt_secret,
            token_expiration: parse_or(&lookup, "JWT_EXPIRATION", 3600), // 1 hour
            jwt_issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "student-bank".to_string()),
            jwt_audience: lookup("JWT_AUDIENCE")
                .unwrap_or_else(|| "student-bank-api".to_string()),
            argon2_memory_cost: parse_or(&lookup, "ARGON2_MEMORY_COST", 19456), // 19 MiB
            argon2_time_cost: parse_or(&lookup, "ARGON2_TIME_COST", 2),
            argon2_parallelism: parse_or(&lookup, "ARGON2_PARALLELISM", 1),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.jwt_secret.len() < 32 {
            return Err(AuthError::Config(
                "JWT_SECRET must be at least 32 characters".to_string(),
            ));
        }

        if self.token_expiration <= 0 || self.token_expiration > MAX_TOKEN_EXPIRATION {
            return Err(AuthError::Config(format!(
                "JWT_EXPIRATION must be between 1 and {} seconds",
                MAX_TOKEN_EXPIRATION
            )));
        }

        if self.jwt_issuer.is_empty() || self.jwt_audience.is_empty() {
            return Err(AuthError::Config(
                "JWT_ISSUER and JWT_AUDIENCE must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    pub url: String,

    /// Pool size (from DATABASE_MAX_CONNECTIONS env var)
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Load database settings from environment variables
    ///
    /// `DATABASE_URL` wins when present. Otherwise the URL is assembled from
    /// `DB_HOST`, `DB_PORT`, `DB_USERNAME`, `DB_PASSWORD` and `DB_DATABASE`.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load database settings from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuthError> {
        let url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => {
                let value_or =
                    |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
                let port: u16 = parse_or(&lookup, "DB_PORT", 5432);
                Self::build_url(
                    &value_or("DB_HOST", "localhost"),
                    port,
                    &value_or("DB_USERNAME", "root"),
                    &value_or("DB_PASSWORD", "root"),
                    &value_or("DB_DATABASE", "dev_db"),
                )
            }
        };

        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10);
        if max_connections == 0 {
            return Err(AuthError::Config(
                "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            url,
            max_connections,
        })
    }

    fn build_url(host: &str, port: u16, username: &str, password: &str, database: &str) -> String {
        format!("postgres://{username}:{password}@{host}:{port}/{database}")
    }
}

/// Look up and parse a value, falling back to `default` when unset or invalid
fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
pub(crate) fn test_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "a".repeat(32),
        token_expiration: 3600,
        jwt_issuer: "test".to_string(),
        jwt_audience: "test".to_string(),
        argon2_memory_cost: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_validation() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_short_secret() {
        let config = AuthConfig {
            jwt_secret: "short".to_string(),
            ..test_config()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_non_positive_expiration() {
        let config = AuthConfig {
            token_expiration: 0,
            ..test_config()
        };

        assert!(matches!(config.validate(), Err(AuthError::Config(_))));
    }

    #[test]
    fn test_config_validation_expiration_too_large() {
        let config = AuthConfig {
            token_expiration: 10_000_000_000_000,
            ..test_config()
        };
        assert!(matches!(config.validate(), Err(AuthError::Config(_))));

        let config = AuthConfig {
            token_expiration: MAX_TOKEN_EXPIRATION,
            ..test_config()
        };
        assert!(config.validate().is_ok());
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_auth_config_from_lookup() {
        let config = AuthConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s".repeat(40).as_str()),
            ("JWT_EXPIRATION", "600"),
            ("ARGON2_TIME_COST", "not-a-number"),
        ]))
        .unwrap();

        assert_eq!(config.token_expiration, 600);
        assert_eq!(config.argon2_time_cost, 2);
        assert_eq!(config.jwt_issuer, "student-bank");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_auth_config_requires_secret() {
        assert!(matches!(
            AuthConfig::from_lookup(lookup_from(&[])),
            Err(AuthError::Config(_))
        ));
    }

    #[test]
    fn test_database_url_takes_precedence() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://u:p@primary:5432/bank"),
            ("DB_HOST", "ignored"),
        ]))
        .unwrap();

        assert_eq!(config.url, "postgres://u:p@primary:5432/bank");
        assert_eq!(config.max_connections, 10);
    }

    #[test]
    fn test_database_url_assembled_from_parts() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            ("DB_HOST", "db"),
            ("DB_PORT", "5433"),
        ]))
        .unwrap();

        assert_eq!(config.url, "postgres://root:root@db:5433/dev_db");
    }

    #[test]
    fn test_database_zero_connections_rejected() {
        let result =
            DatabaseConfig::from_lookup(lookup_from(&[("DATABASE_MAX_CONNECTIONS", "0")]));
        assert!(matches!(result, Err(AuthError::Config(_))));
    }

    #[test]
    fn test_database_url_from_parts() {
        let url = DatabaseConfig::build_url("db", 5433, "bank", "s3cret", "students");
        assert_eq!(url, "postgres://bank:s3cret@db:5433/students");
    }
}
