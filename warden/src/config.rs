//! Service configuration loaded from a TOML file
//!
//! ```toml
//! env = "prod"
//! storage_path = "./storage/warden.db"
//! token_ttl = 3600
//!
//! [http]
//! addr = "0.0.0.0:8080"
//! timeout = 10
//!
//! [verification]
//! code_length = 6
//! ttl_hours = 3
//!
//! [mailer]
//! from_address = "noreply@example.com"
//! from_name = "Warden"
//! app_name = "Warden"
//! app_url = "https://example.com"
//! transport = { type = "smtp", host = "smtp.gmail.com", port = 587, password = "app-password", tls = "start_tls" }
//! ```
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use warden_core::VerificationPolicy;
use warden_mailer::MailerConfig;

pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No config path given; pass --config or set {CONFIG_PATH_ENV}")]
    MissingPath,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Deployment environment; selects log verbosity and format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Env {
    #[default]
    Local,
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WardenConfig {
    #[serde(default)]
    pub env: Env,
    pub storage_path: PathBuf,
    #[serde(default)]
    pub http: HttpConfig,
    /// Token lifetime in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl: u64,
    #[serde(default)]
    pub verification: VerificationConfig,
    /// Falls back to `MAILER_*` environment variables when absent.
    #[serde(default)]
    pub mailer: Option<MailerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_addr")]
    pub addr: SocketAddr,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u32,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            ttl_hours: default_ttl_hours(),
        }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_timeout() -> u64 {
    10
}

fn default_token_ttl() -> u64 {
    3600
}

fn default_code_length() -> usize {
    6
}

fn default_ttl_hours() -> u32 {
    3
}

impl WardenConfig {
    /// Pick the config path: the explicit flag wins over `CONFIG_PATH`.
    pub fn resolve_path(flag: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        flag.or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .ok_or(ConfigError::MissingPath)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage_path is empty".to_string()));
        }
        if self.http.timeout == 0 {
            return Err(ConfigError::Invalid("http.timeout must be >= 1".to_string()));
        }
        if self.token_ttl == 0 {
            return Err(ConfigError::Invalid("token_ttl must be >= 1".to_string()));
        }
        if self.verification.code_length == 0 {
            return Err(ConfigError::Invalid(
                "verification.code_length must be >= 1".to_string(),
            ));
        }
        if self.verification.ttl_hours == 0 {
            return Err(ConfigError::Invalid(
                "verification.ttl_hours must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.token_ttl).unwrap_or(i64::MAX))
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http.timeout)
    }

    pub fn verification_policy(&self) -> VerificationPolicy {
        VerificationPolicy::new(
            self.verification.code_length,
            chrono::Duration::hours(i64::from(self.verification.ttl_hours)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warden.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: WardenConfig = toml::from_str(r#"storage_path = "./warden.db""#).unwrap();

        assert_eq!(config.env, Env::Local);
        assert_eq!(config.http.addr, default_addr());
        assert_eq!(config.request_timeout(), std::time::Duration::from_secs(10));
        assert_eq!(config.token_ttl(), chrono::Duration::hours(1));
        assert_eq!(config.verification_policy(), VerificationPolicy::default());
        assert!(config.mailer.is_none());
    }

    #[test]
    fn test_full_config() {
        let config: WardenConfig = toml::from_str(
            r#"
            env = "prod"
            storage_path = "/var/lib/warden.db"
            token_ttl = 600

            [http]
            addr = "127.0.0.1:9000"
            timeout = 4

            [verification]
            code_length = 8
            ttl_hours = 1

            [mailer]
            from_address = "noreply@example.com"
            app_name = "Warden"
            app_url = "https://example.com"
            transport = { type = "file", output_dir = "./emails" }
            "#,
        )
        .unwrap();

        assert_eq!(config.env, Env::Prod);
        assert_eq!(config.http.addr.port(), 9000);
        assert_eq!(config.token_ttl(), chrono::Duration::minutes(10));
        assert_eq!(config.verification_policy().code_length, 8);
        assert_eq!(config.verification_policy().ttl_hours(), 1);
        assert_eq!(config.mailer.unwrap().from_address, "noreply@example.com");
    }

    #[test]
    fn test_load_reports_missing_file() {
        let error = WardenConfig::load("/nonexistent/warden.toml").unwrap_err();
        assert!(matches!(error, ConfigError::Read { .. }));
        assert!(error.to_string().contains("/nonexistent/warden.toml"));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let (dir, path) = write_config(
            r#"
            storage_path = "./warden.db"
            [verification]
            code_length = 0
            "#,
        );

        let error = WardenConfig::load(&path).unwrap_err();
        assert!(matches!(error, ConfigError::Invalid(_)));
        drop(dir);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let (dir, path) = write_config("storage_path = ");

        let error = WardenConfig::load(&path).unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
        drop(dir);
    }

    #[test]
    fn test_configs_of_equal_length_load_independently() {
        let (_a, first) = write_config(r#"storage_path = "./a.db""#);
        let (_b, second) = write_config(r#"storage_path = "./b.db""#);

        assert_ne!(first, second);
        assert_eq!(WardenConfig::load(&first).unwrap().storage_path, PathBuf::from("./a.db"));
        assert_eq!(WardenConfig::load(&second).unwrap().storage_path, PathBuf::from("./b.db"));
    }

    #[test]
    fn test_flag_wins_over_env() {
        let flag = PathBuf::from("/etc/warden/flag.toml");
        assert_eq!(
            WardenConfig::resolve_path(Some(flag.clone())).unwrap(),
            flag
        );
    }
}
