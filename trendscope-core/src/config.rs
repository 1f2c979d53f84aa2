//! Centralized configuration for Trendscope.
//!
//! All settings are read once at startup into an explicit struct that is
//! handed to the adapter and the server. Nothing reads the environment after
//! this point.

use std::path::Path;
use std::time::Duration;

use crate::{ConfigError, Result};

/// Default Trends API host.
pub const DEFAULT_SERVER_URL: &str = "https://trends.googleapis.com";

/// Default Trends API version.
pub const DEFAULT_API_VERSION: &str = "v1beta";

/// Suffix appended to the server URL to reach the discovery document.
pub const DISCOVERY_URL_SUFFIX: &str = "/$discovery/rest?version=";

/// Default listen address for the HTTP server.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Port used when a bind address omits one; matches [`DEFAULT_BIND_ADDR`].
pub const DEFAULT_PORT: u16 = 3000;

/// Default environment file, resolved against the working directory.
pub const DEFAULT_DOTENV_PATH: &str = ".env.local";

/// Central configuration for all Trendscope components.
#[derive(Debug, Clone)]
pub struct TrendscopeConfig {
    pub trends: TrendsApiConfig,
    pub server: ServerConfig,
}

/// Remote Trends API configuration.
///
/// Controls which API host and version the adapter talks to and the key it
/// authenticates with.
#[derive(Clone)]
pub struct TrendsApiConfig {
    /// Static developer key sent with every request
    pub api_key: String,
    /// API host without trailing slash
    pub server_url: String,
    /// API version requested from the discovery endpoint
    pub api_version: String,
    /// Outbound request timeout (None = wait indefinitely)
    pub request_timeout: Option<Duration>,
    /// User agent for outbound HTTP requests
    pub user_agent: &'static str,
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl TrendsApiConfig {
    /// Creates API configuration with default host and version.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout: None,
            user_agent: concat!("trendscope/", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Points the configuration at a different API host.
    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = server_url.into().trim_end_matches('/').to_string();
        self
    }

    /// URL of the discovery document describing the remote API.
    pub fn discovery_url(&self) -> String {
        format!(
            "{}{}{}",
            self.server_url, DISCOVERY_URL_SUFFIX, self.api_version
        )
    }
}

// The key never shows up in logs.
impl std::fmt::Debug for TrendsApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrendsApiConfig")
            .field("api_key", &"<redacted>")
            .field("server_url", &self.server_url)
            .field("api_version", &self.api_version)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl TrendscopeConfig {
    /// Load configuration from process environment variables.
    ///
    /// Required:
    /// - `API_KEY`: Google Trends developer key
    ///
    /// Optional:
    /// - `TRENDS_SERVER_URL`: API host (default: "https://trends.googleapis.com")
    /// - `TRENDS_API_VERSION`: API version (default: "v1beta")
    /// - `TRENDS_REQUEST_TIMEOUT_SECS`: outbound timeout in seconds (default: none)
    /// - `BIND_ADDR`: server bind address (default: "127.0.0.1:3000")
    ///
    /// # Errors
    /// - `ConfigError::MissingApiKey` - `API_KEY` is unset or blank
    /// - `ConfigError::InvalidValue` - An optional variable failed to parse
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// # Errors
    /// - `ConfigError::MissingApiKey` - `API_KEY` is absent or blank
    /// - `ConfigError::InvalidValue` - An optional value failed to parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut trends = TrendsApiConfig::new(api_key);

        if let Some(server_url) = lookup("TRENDS_SERVER_URL").filter(|s| !s.trim().is_empty()) {
            trends = trends.with_server_url(server_url.trim());
        }

        if let Some(version) = lookup("TRENDS_API_VERSION").filter(|s| !s.trim().is_empty()) {
            trends.api_version = version.trim().to_string();
        }

        if let Some(raw) = lookup("TRENDS_REQUEST_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "TRENDS_REQUEST_TIMEOUT_SECS".to_string(),
                    reason: e.to_string(),
                })?;
            trends.request_timeout = Some(Duration::from_secs(secs));
        }

        let server = ServerConfig {
            bind_addr: lookup("BIND_ADDR")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        };

        tracing::info!(
            server_url = %trends.server_url,
            api_version = %trends.api_version,
            request_timeout = ?trends.request_timeout,
            bind_addr = %server.bind_addr,
            "trendscope configuration loaded"
        );

        Ok(Self { trends, server })
    }
}

/// Load an environment file into the process environment if it exists.
///
/// Returns whether a file was loaded. Variables already set in the
/// environment take precedence over the file.
///
/// # Errors
/// - `ConfigError::Dotenv` - The file exists but could not be read or parsed
pub fn load_dotenv(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    dotenvy::from_path(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_fails() {
        let result = TrendscopeConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_blank_api_key_fails() {
        let result = TrendscopeConfig::from_lookup(lookup_from(&[("API_KEY", "   ")]));
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_defaults() {
        let config = TrendscopeConfig::from_lookup(lookup_from(&[("API_KEY", "secret")])).unwrap();

        assert_eq!(config.trends.api_key, "secret");
        assert_eq!(config.trends.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.trends.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.trends.request_timeout, None);
        assert_eq!(config.server.bind_addr, DEFAULT_BIND_ADDR);
        assert!(DEFAULT_BIND_ADDR.ends_with(&format!(":{DEFAULT_PORT}")));
    }

    #[test]
    fn test_discovery_url() {
        let config = TrendsApiConfig::new("secret");
        assert_eq!(
            config.discovery_url(),
            "https://trends.googleapis.com/$discovery/rest?version=v1beta"
        );
    }

    #[test]
    fn test_overrides() {
        let config = TrendscopeConfig::from_lookup(lookup_from(&[
            ("API_KEY", "secret"),
            ("TRENDS_SERVER_URL", "http://127.0.0.1:9000/"),
            ("TRENDS_API_VERSION", "v1"),
            ("TRENDS_REQUEST_TIMEOUT_SECS", "15"),
            ("BIND_ADDR", "0.0.0.0:8080"),
        ]))
        .unwrap();

        assert_eq!(
            config.trends.discovery_url(),
            "http://127.0.0.1:9000/$discovery/rest?version=v1"
        );
        assert_eq!(config.trends.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_invalid_timeout() {
        let result = TrendscopeConfig::from_lookup(lookup_from(&[
            ("API_KEY", "secret"),
            ("TRENDS_REQUEST_TIMEOUT_SECS", "soon"),
        ]));

        match result {
            Err(ConfigError::InvalidValue { key, .. }) => {
                assert_eq!(key, "TRENDS_REQUEST_TIMEOUT_SECS");
            }
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = TrendsApiConfig::new("super-secret-key");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_load_dotenv_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_dotenv(&dir.path().join(".env.local")).unwrap();
        assert!(!loaded);
    }

    #[test]
    fn test_load_dotenv_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env.local");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "TRENDSCOPE_DOTENV_TEST_MARKER=present").unwrap();

        assert!(load_dotenv(&path).unwrap());
        assert_eq!(
            std::env::var("TRENDSCOPE_DOTENV_TEST_MARKER").as_deref(),
            Ok("present")
        );
    }
}
