use std::env;

use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Base64-encoded HS256 signing secret
    pub secret: String,
    /// Access token lifetime in milliseconds
    pub expiration_ms: i64,
}

/// Longest accepted access token lifetime (one year)
pub const MAX_TOKEN_TTL_MS: i64 = 365 * 24 * 60 * 60 * 1000;

impl JwtConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::milliseconds(self.expiration_ms)
    }

    /// Reject token lifetimes that are not positive or longer than a year.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.expiration_ms <= 0 || self.expiration_ms > MAX_TOKEN_TTL_MS {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_ms must be between 1 and {} milliseconds, got {}",
                MAX_TOKEN_TTL_MS, self.expiration_ms
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, JWT__EXPIRATION_MS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// `jwt.secret` and `jwt.expiration_ms` have no defaults; loading fails without them.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::default()
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        config.jwt.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_ttl_is_milliseconds() {
        let jwt = JwtConfig {
            secret: "c2VjcmV0".to_string(),
            expiration_ms: 86_400_000,
        };
        assert_eq!(jwt.token_ttl(), Duration::hours(24));
    }

    #[test]
    fn test_token_ttl_bounds() {
        let jwt = |expiration_ms| JwtConfig {
            secret: "c2VjcmV0".to_string(),
            expiration_ms,
        };

        assert!(jwt(1).validate().is_ok());
        assert!(jwt(MAX_TOKEN_TTL_MS).validate().is_ok());
        assert!(jwt(0).validate().is_err());
        assert!(jwt(-1).validate().is_err());
        assert!(jwt(MAX_TOKEN_TTL_MS + 1).validate().is_err());
        assert!(jwt(9_000_000_000_000_000).validate().is_err());
    }

    #[test]
    fn test_default_cors_origins() {
        let cors = CorsConfig::default();
        assert_eq!(cors.allowed_origins.len(), 2);
        assert!(cors
            .allowed_origins
            .contains(&"http://localhost:5173".to_string()));
    }
}
