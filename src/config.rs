//! Configuration module
//!
//! Loaded once at startup from a TOML file and shared read-only afterwards.
//! Every section and field has a default, so a partial file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::DatabaseConfig;

/// Env var that points at an alternative config file
pub const CONFIG_PATH_ENV: &str = "ACCOUNT_SERVICE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
    pub admin: BootstrapAdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `development` disables the `Secure` cookie attribute
    pub environment: String,
    /// Seconds to wait for cleanup after a shutdown signal
    pub shutdown_timeout: u64,
    /// Origin allowed by CORS (with credentials)
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "development".to_string(),
            shutdown_timeout: 30,
            cors_origin: "http://localhost:5173".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DatabaseConfig::default().url,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub cookie_name: String,
    pub cookie_domain: Option<String>,
    pub cookie_max_age_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: JwtConfig::default().secret,
            jwt_expiration_hours: 24,
            cookie_name: "access_token".to_string(),
            cookie_domain: None,
            cookie_max_age_hours: 72,
        }
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_domain", &self.cookie_domain)
            .field("cookie_max_age_hours", &self.cookie_max_age_hours)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub login_window_secs: u64,
    /// Requests per window before answering 429
    pub login_max_attempts: u32,
    /// Requests per window before delays kick in
    pub login_delay_after: u32,
    /// Added latency per request beyond `login_delay_after`
    pub login_delay_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            login_window_secs: 600,
            login_max_attempts: 10,
            login_delay_after: 10,
            login_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `plain` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "plain".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Admin account created at startup when no active user has its email.
/// Disabled by default; the promotion workflow needs one admin to exist.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapAdminConfig {
    pub enabled: bool,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for BootstrapAdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            username: "admin".to_string(),
            email: "admin@localhost".to_string(),
            password: String::new(),
        }
    }
}

impl std::fmt::Debug for BootstrapAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdminConfig")
            .field("enabled", &self.enabled)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AppConfig {
    /// Parse the file at `path`. Environment overrides are not applied.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// `JWT_SECRET` and `DATABASE_URL` take precedence over the file.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("JWT_SECRET").ok(),
            std::env::var("DATABASE_URL").ok(),
        );
    }

    fn apply_overrides(&mut self, jwt_secret: Option<String>, database_url: Option<String>) {
        if let Some(secret) = jwt_secret.filter(|s| !s.is_empty()) {
            self.security.jwt_secret = secret;
        }
        if let Some(url) = database_url.filter(|s| !s.is_empty()) {
            self.database.url = url;
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            expiration_hours: self.security.jwt_expiration_hours,
            ..JwtConfig::default()
        }
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
        }
    }
}

/// `$ACCOUNT_SERVICE_CONFIG`, else `<config dir>/account-service/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("account-service")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.security.jwt_expiration_hours, 24);
        assert_eq!(cfg.security.cookie_max_age_hours, 72);
        assert_eq!(cfg.security.cookie_name, "access_token");
        assert_eq!(cfg.rate_limit.login_max_attempts, 10);
        assert!(!cfg.admin.enabled);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            port = 8080
            environment = "production"

            [security]
            jwt_secret = "from-file"
            cookie_domain = "example.com"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert!(!cfg.server.is_development());
        assert_eq!(cfg.security.jwt_secret, "from-file");
        assert_eq!(cfg.security.cookie_domain.as_deref(), Some("example.com"));
        assert_eq!(cfg.security.cookie_name, "access_token");
        assert!(cfg.logging.is_json());
        assert_eq!(cfg.jwt_config().secret, "from-file");
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(Some("from-env".into()), Some("sqlite::memory:".into()));
        assert_eq!(cfg.security.jwt_secret, "from-env");
        assert_eq!(cfg.database_config().url, "sqlite::memory:");

        cfg.apply_overrides(Some(String::new()), None);
        assert_eq!(cfg.security.jwt_secret, "from-env");
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let mut cfg = AppConfig::default();
        cfg.security.jwt_secret = "hunter2-hunter2".into();
        cfg.admin.password = "bootstrap-pass".into();
        let rendered = format!("{:?}", cfg);
        assert!(!rendered.contains("hunter2-hunter2"));
        assert!(!rendered.contains("bootstrap-pass"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = AppConfig::load(Path::new("/nonexistent/account-service.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
