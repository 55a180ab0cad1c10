//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | `UTP_API_BASE_URL` | `https://api.utpfund.live/api` | Platform API root |
//! | `UTP_SESSION_FILE` | per-user config dir | Where the session is persisted |
//! | `UTP_PAGE_SIZE` | `10` | Rows per list page |
//! | `UTP_REQUEST_TIMEOUT_SECS` | none | Per-request timeout |
//! | `UTP_LOG_JSON` | `false` | Emit JSON log lines |
//! | `SENTRY_DSN` | none | Enables error reporting |
//! | `SENTRY_ENVIRONMENT` | none | Sentry environment tag |

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use thiserror::Error;
use url::Url;

use crate::list::PAGE_SIZE;

/// Production API root used when `UTP_API_BASE_URL` is unset.
pub const DEFAULT_API_BASE_URL: &str = "https://api.utpfund.live/api";

/// File name of the persisted session inside the config directory.
const SESSION_FILE_NAME: &str = "session.json";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Connection settings for the platform API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Root every request path is appended to.
    pub base_url: Url,
    /// Optional per-request timeout.
    pub request_timeout: Option<Duration>,
}

impl ApiConfig {
    /// Settings for an explicit base URL with no timeout.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: None,
        }
    }
}

/// Everything the console needs to start.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Platform API settings.
    pub api: ApiConfig,
    /// Path of the persisted session file.
    pub session_file: PathBuf,
    /// Rows per list page.
    pub page_size: NonZeroUsize,
    /// Emit logs as JSON lines.
    pub log_json: bool,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production", "staging").
    pub sentry_environment: Option<String>,
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value, or if
    /// no session location can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ConsoleConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let raw_base = get("UTP_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let base_url = Url::parse(raw_base.trim()).map_err(|e| {
            ConfigError::InvalidEnvVar("UTP_API_BASE_URL".to_string(), e.to_string())
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "UTP_API_BASE_URL".to_string(),
                format!("unsupported scheme `{}`", base_url.scheme()),
            ));
        }

        let request_timeout = get("UTP_REQUEST_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| {
                        ConfigError::InvalidEnvVar(
                            "UTP_REQUEST_TIMEOUT_SECS".to_string(),
                            e.to_string(),
                        )
                    })
            })
            .transpose()?;

        let page_size = match get("UTP_PAGE_SIZE") {
            Some(raw) => raw.trim().parse::<NonZeroUsize>().map_err(|e| {
                ConfigError::InvalidEnvVar("UTP_PAGE_SIZE".to_string(), e.to_string())
            })?,
            None => PAGE_SIZE,
        };

        let session_file = match get("UTP_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_session_file()
                .ok_or_else(|| ConfigError::MissingEnvVar("UTP_SESSION_FILE".to_string()))?,
        };

        let log_json = get("UTP_LOG_JSON").is_some_and(|v| is_truthy(&v));

        Ok(Self {
            api: ApiConfig {
                base_url,
                request_timeout,
            },
            session_file,
            page_size,
            log_json,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }
}

/// Platform-specific location of the session file, if the OS exposes a
/// per-user config directory.
#[must_use]
pub fn default_session_file() -> Option<PathBuf> {
    ProjectDirs::from("live", "utpfund", "utp-admin")
        .map(|dirs| dirs.config_dir().join(SESSION_FILE_NAME))
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ConsoleConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ConsoleConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("UTP_SESSION_FILE", "/tmp/session.json")]).unwrap();
        assert_eq!(config.api.base_url.as_str(), "https://api.utpfund.live/api");
        assert_eq!(config.page_size.get(), 10);
        assert!(config.api.request_timeout.is_none());
        assert!(!config.log_json);
        assert!(config.sentry_dsn.is_none());
        assert_eq!(config.session_file, PathBuf::from("/tmp/session.json"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("UTP_API_BASE_URL", "http://127.0.0.1:5000/api/"),
            ("UTP_SESSION_FILE", "/tmp/s.json"),
            ("UTP_PAGE_SIZE", "25"),
            ("UTP_REQUEST_TIMEOUT_SECS", "15"),
            ("UTP_LOG_JSON", "true"),
            ("SENTRY_ENVIRONMENT", "staging"),
        ])
        .unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://127.0.0.1:5000/api/");
        assert_eq!(config.page_size.get(), 25);
        assert_eq!(config.api.request_timeout, Some(Duration::from_secs(15)));
        assert!(config.log_json);
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_blank_values_are_treated_as_unset() {
        let config = config_from(&[("UTP_SESSION_FILE", "/tmp/s.json"), ("UTP_PAGE_SIZE", "  ")])
            .unwrap();
        assert_eq!(config.page_size.get(), 10);
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let err = config_from(&[("UTP_SESSION_FILE", "/tmp/s.json"), ("UTP_PAGE_SIZE", "0")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "UTP_PAGE_SIZE"));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = config_from(&[
            ("UTP_SESSION_FILE", "/tmp/s.json"),
            ("UTP_API_BASE_URL", "ftp://example.com"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "UTP_API_BASE_URL"));
    }

    #[test]
    fn test_rejects_bad_timeout() {
        let err = config_from(&[
            ("UTP_SESSION_FILE", "/tmp/s.json"),
            ("UTP_REQUEST_TIMEOUT_SECS", "soon"),
        ])
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "UTP_REQUEST_TIMEOUT_SECS")
        );
    }
}
