use std::env;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    pub webhook: WebhookConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Shared secret for the identity provider's HS256 session tokens.
    pub jwt_secret: String,
    /// Base URL of the identity provider's management API (role lookups).
    pub api_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Shared secret for webhook signature verification. Absence is not a
    /// startup failure: every webhook call answers 500 until it is set.
    pub secret: Option<String>,
}

impl AppConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = parse_environment(env::var("APP_ENV").ok().as_deref());

        let port = match env::var("PORT") {
            Ok(v) => v
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid("PORT", v))?,
            Err(_) => 3000,
        };

        let database_url = require("DATABASE_URL")?;
        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(v) => v
                .parse::<u32>()
                .map_err(|_| ConfigError::Invalid("DATABASE_MAX_CONNECTIONS", v))?,
            Err(_) => default_max_connections(environment),
        };

        let api_url = require("IDENTITY_API_URL")?;
        Url::parse(&api_url).map_err(|e| ConfigError::Invalid("IDENTITY_API_URL", e.to_string()))?;

        Ok(Self {
            environment,
            server: ServerConfig { port },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                acquire_timeout_secs: 30,
            },
            identity: IdentityConfig {
                jwt_secret: require("AUTH_JWT_SECRET")?,
                api_url,
                api_key: require("IDENTITY_API_KEY")?,
            },
            webhook: WebhookConfig {
                secret: env::var("WEBHOOK_SECRET").ok(),
            },
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parse_environment(value: Option<&str>) -> Environment {
    match value {
        Some("production") | Some("prod") => Environment::Production,
        Some("staging") | Some("stage") => Environment::Staging,
        _ => Environment::Development,
    }
}

fn default_max_connections(environment: Environment) -> u32 {
    match environment {
        Environment::Development => 10,
        Environment::Staging => 20,
        Environment::Production => 50,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_environment_names() {
        assert_eq!(parse_environment(Some("production")), Environment::Production);
        assert_eq!(parse_environment(Some("prod")), Environment::Production);
        assert_eq!(parse_environment(Some("staging")), Environment::Staging);
        assert_eq!(parse_environment(Some("development")), Environment::Development);
        assert_eq!(parse_environment(Some("anything-else")), Environment::Development);
        assert_eq!(parse_environment(None), Environment::Development);
    }

    #[test]
    fn pool_defaults_scale_with_environment() {
        assert_eq!(default_max_connections(Environment::Development), 10);
        assert_eq!(default_max_connections(Environment::Staging), 20);
        assert_eq!(default_max_connections(Environment::Production), 50);
    }
}
