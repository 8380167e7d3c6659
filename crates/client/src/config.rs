//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults point at the production API with
//! the local development server as fallback.
//!
//! - `SANTAFE_API_URLS` - Comma-separated candidate base URLs, in priority order
//!   (default: `https://santafe-dashboard.vercel.app/api,http://192.168.56.1:3000/api`)
//! - `SANTAFE_ENV` - `development`, `staging` or `production` (default: development)
//! - `SANTAFE_PROBE_TIMEOUT_MS` - Liveness probe timeout (default: 3000)
//! - `SANTAFE_API_TIMEOUT_MS` - Per-request timeout, at least 1000 (default: 10000)
//! - `SANTAFE_SESSION_FILE` - Session blob location (default: `.santafe/session.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Candidate API base URLs used when `SANTAFE_API_URLS` is unset.
pub const DEFAULT_API_URLS: &[&str] = &[
    "https://santafe-dashboard.vercel.app/api",
    "http://192.168.56.1:3000/api",
];

const DEFAULT_PROBE_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;
const MIN_API_TIMEOUT_MS: u64 = 1_000;
const DEFAULT_SESSION_FILE: &str = ".santafe/session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("No API base URL configured")]
    NoEndpoints,
    #[error("API URL must use HTTPS in production: {0}")]
    InsecureEndpoint(String),
    #[error("API timeout must be at least {MIN_API_TIMEOUT_MS}ms (got {0}ms)")]
    TimeoutTooShort(u64),
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// Storefront client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Candidate API base URLs, in priority order (never empty)
    pub api_urls: Vec<Url>,
    /// Deployment environment
    pub environment: Environment,
    /// Timeout for liveness probes
    pub probe_timeout: Duration,
    /// Timeout for regular API requests
    pub request_timeout: Duration,
    /// Where the session blob is persisted
    pub session_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<SecretString>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field(
                "api_urls",
                &self.api_urls.iter().map(Url::as_str).collect::<Vec<_>>(),
            )
            .field("environment", &self.environment)
            .field("probe_timeout", &self.probe_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("session_file", &self.session_file)
            .field(
                "sentry_dsn",
                &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sentry_environment", &self.sentry_environment)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_urls: DEFAULT_API_URLS
                .iter()
                .filter_map(|raw| Url::parse(raw).ok())
                .collect(),
            environment: Environment::default(),
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            request_timeout: Duration::from_millis(DEFAULT_API_TIMEOUT_MS),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or the resulting
    /// configuration fails [`ClientConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_urls = match lookup("SANTAFE_API_URLS") {
            Some(raw) => parse_url_list("SANTAFE_API_URLS", &raw)?,
            None => Self::default().api_urls,
        };

        let environment = lookup("SANTAFE_ENV")
            .map(|raw| {
                raw.parse::<Environment>()
                    .map_err(|e| ConfigError::InvalidEnvVar("SANTAFE_ENV".to_string(), e))
            })
            .transpose()?
            .unwrap_or_default();

        let probe_timeout = Duration::from_millis(parse_millis(
            "SANTAFE_PROBE_TIMEOUT_MS",
            lookup("SANTAFE_PROBE_TIMEOUT_MS"),
            DEFAULT_PROBE_TIMEOUT_MS,
        )?);
        let request_timeout = Duration::from_millis(parse_millis(
            "SANTAFE_API_TIMEOUT_MS",
            lookup("SANTAFE_API_TIMEOUT_MS"),
            DEFAULT_API_TIMEOUT_MS,
        )?);

        let session_file = lookup("SANTAFE_SESSION_FILE")
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        let config = Self {
            api_urls,
            environment,
            probe_timeout,
            request_timeout,
            session_file,
            sentry_dsn: lookup("SENTRY_DSN")
                .filter(|dsn| !dsn.is_empty())
                .map(SecretString::from),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for problems that would only surface later.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: an empty URL list, a plain-HTTP URL
    /// in production, or a request timeout below one second.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_urls.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }

        if self.environment.is_production()
            && let Some(url) = self.api_urls.iter().find(|url| url.scheme() != "https")
        {
            return Err(ConfigError::InsecureEndpoint(url.to_string()));
        }

        let timeout_ms = u64::try_from(self.request_timeout.as_millis()).unwrap_or(u64::MAX);
        if timeout_ms < MIN_API_TIMEOUT_MS {
            return Err(ConfigError::TimeoutTooShort(timeout_ms));
        }

        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a comma-separated list of base URLs, skipping blank entries.
fn parse_url_list(key: &str, raw: &str) -> Result<Vec<Url>, ConfigError> {
    let urls = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Url::parse(s).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), format!("{s}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if urls.is_empty() {
        return Err(ConfigError::NoEndpoints);
    }
    Ok(urls)
}

/// Parse a millisecond value, falling back to `default` when unset.
fn parse_millis(key: &str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    raw.map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_urls.len(), 2);
        assert_eq!(
            config.api_urls[0].as_str(),
            "https://santafe-dashboard.vercel.app/api"
        );
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.probe_timeout, Duration::from_secs(3));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.session_file, PathBuf::from(".santafe/session.json"));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_url_list_keeps_order_and_skips_blanks() {
        let config = load(&[(
            "SANTAFE_API_URLS",
            " http://b.local/api , ,https://a.local/api",
        )])
        .unwrap();
        let urls: Vec<&str> = config.api_urls.iter().map(Url::as_str).collect();
        assert_eq!(urls, vec!["http://b.local/api", "https://a.local/api"]);
    }

    #[test]
    fn test_empty_url_list_is_rejected() {
        assert!(matches!(
            load(&[("SANTAFE_API_URLS", " , ")]),
            Err(ConfigError::NoEndpoints)
        ));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(matches!(
            load(&[("SANTAFE_API_URLS", "not a url")]),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_production_requires_https() {
        let err = load(&[("SANTAFE_ENV", "production")]).unwrap_err();
        assert!(matches!(err, ConfigError::InsecureEndpoint(url) if url.starts_with("http://192")));

        let ok = load(&[
            ("SANTAFE_ENV", "production"),
            ("SANTAFE_API_URLS", "https://santafe-dashboard.vercel.app/api"),
        ]);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_timeout_floor() {
        assert!(matches!(
            load(&[("SANTAFE_API_TIMEOUT_MS", "999")]),
            Err(ConfigError::TimeoutTooShort(999))
        ));
        assert!(load(&[("SANTAFE_API_TIMEOUT_MS", "1000")]).is_ok());
    }

    #[test]
    fn test_non_numeric_timeout() {
        assert!(matches!(
            load(&[("SANTAFE_PROBE_TIMEOUT_MS", "soon")]),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "SANTAFE_PROBE_TIMEOUT_MS"
        ));
    }

    #[test]
    fn test_unknown_environment() {
        assert!(load(&[("SANTAFE_ENV", "qa")]).is_err());
        assert_eq!(
            load(&[("SANTAFE_ENV", "Staging")]).unwrap().environment,
            Environment::Staging
        );
    }

    #[test]
    fn test_debug_redacts_sentry_dsn() {
        let config = load(&[("SENTRY_DSN", "https://abc123@o1.ingest.sentry.io/42")]).unwrap();
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("abc123"));
    }
}
