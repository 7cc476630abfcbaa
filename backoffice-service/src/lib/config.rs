use std::env;
use std::str::FromStr;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use jsonwebtoken::Algorithm;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    pub directory: DirectoryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: String,
    pub expire_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub origins: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuditConfig {
    /// Whether X-Forwarded-For / X-Real-IP are believed for client IP
    /// extraction. Only disable behind no proxy; only enable behind a
    /// trusted one.
    pub trust_proxy_headers: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            trust_proxy_headers: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryConfig {
    /// Bootstrap administrator account seeded into the in-process user
    /// directory at startup.
    pub seed_admin_email: String,
    pub seed_admin_password: String,
}

impl JwtConfig {
    /// Parse the configured algorithm name, restricted to the HMAC family.
    pub fn algorithm(&self) -> Result<Algorithm, ConfigError> {
        match Algorithm::from_str(&self.algorithm) {
            Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
            _ => Err(ConfigError::Message(format!(
                "unsupported jwt algorithm: {}",
                self.algorithm
            ))),
        }
    }
}

impl CorsConfig {
    /// Resolve the comma-separated origins string into a trimmed list.
    pub fn origin_list(&self) -> Vec<String> {
        self.origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject configurations that cannot be served safely.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < 32 {
            return Err(ConfigError::Message(
                "jwt secret must be at least 32 bytes".to_string(),
            ));
        }

        self.jwt.algorithm()?;

        if !(1..=43200).contains(&self.jwt.expire_minutes) {
            return Err(ConfigError::Message(
                "jwt expire_minutes must be within 1..=43200".to_string(),
            ));
        }

        for origin in self.cors.origin_list() {
            if !origin.starts_with("http://") && !origin.starts_with("https://") {
                return Err(ConfigError::Message(format!(
                    "invalid cors origin: {}",
                    origin
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            server: ServerConfig { http_port: 8000 },
            jwt: JwtConfig {
                secret: "test-secret-key-for-jwt-signing-at-least-32-bytes".to_string(),
                algorithm: "HS256".to_string(),
                expire_minutes: 60,
            },
            cors: CorsConfig {
                origins: "http://localhost:3000, http://127.0.0.1:3000".to_string(),
            },
            audit: AuditConfig::default(),
            directory: DirectoryConfig {
                seed_admin_email: "admin@example.com".to_string(),
                seed_admin_password: "admin_password!".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let mut config = valid_config();
        config.jwt.secret = "too-short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_hmac_algorithm_is_rejected() {
        let mut config = valid_config();
        config.jwt.algorithm = "RS256".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_expiry_bounds_are_enforced() {
        let mut config = valid_config();
        config.jwt.expire_minutes = 0;
        assert!(config.validate().is_err());

        config.jwt.expire_minutes = 43201;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_origin_list_splits_and_trims() {
        let config = valid_config();
        assert_eq!(
            config.cors.origin_list(),
            vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string()
            ]
        );
    }

    #[test]
    fn test_non_http_origin_is_rejected() {
        let mut config = valid_config();
        config.cors.origins = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }
}
