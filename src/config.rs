//! Application configuration loaded from environment variables.
//!
//! All configuration is loaded from environment variables with defaults
//! suited to running without a proxy. In production, configure via
//! environment variables or a `.env` file.
//!
//! # Proxy Trust Configuration
//!
//! - `USE_PROXY`: Whether a reverse proxy sits in front of this service
//!   (default: `false`). When `false`, any request carrying
//!   `X-Forwarded-For` is rejected.
//! - `TRUSTED_PROXIES`: Comma-separated addresses and CIDR ranges of the
//!   proxies allowed to connect (e.g. `10.0.0.0/8,192.168.1.10,::1`).
//!   Required when `USE_PROXY=true`.
//!
//! # Server
//!
//! - `HOST` / `PORT`: Listen address (default: `0.0.0.0:3000`)
//! - `METRICS_PORT`: Prometheus listener port (default: 0 = disabled)
//! - `LOG_FORMAT`: `text` (default) or `json`

use std::env;
use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::middleware::{ProxyTrustConfig, TrustEntry};

/// Application configuration loaded from environment variables.
///
/// # Example
///
/// ```rust,ignore
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.server_addr());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Server host address (default: "0.0.0.0")
    pub host: String,

    /// Server port (default: 3000)
    pub port: u16,

    // =========================================================================
    // Proxy Trust Configuration
    // =========================================================================
    /// Whether a reverse proxy is expected in front of this service
    pub use_proxy: bool,

    /// Trusted proxy addresses and CIDR ranges.
    ///
    /// Common values:
    /// - Private networks: "10.0.0.0/8,172.16.0.0/12,192.168.0.0/16"
    /// - Docker: "172.17.0.0/16" (default bridge network)
    /// - Localhost: "127.0.0.1,::1"
    pub trusted_proxies: Vec<String>,

    // =========================================================================
    // Observability Configuration
    // =========================================================================
    /// Port for Prometheus metrics endpoint (default: 0 = disabled)
    pub metrics_port: u16,

    /// Log output format (default: text)
    pub log_format: LogFormat,
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event, for log shippers
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected `text` or `json`, got {other:?}")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if a value cannot be parsed or the
    /// combination is unusable (proxy expected with no trusted proxies).
    pub fn from_env() -> AppResult<Self> {
        // Load an .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: Self::parse_env("PORT", 3000)?,

            use_proxy: Self::parse_bool_env("USE_PROXY", false)?,
            trusted_proxies: Self::parse_trusted_proxies(),

            metrics_port: Self::parse_env("METRICS_PORT", 0)?,
            log_format: Self::parse_env("LOG_FORMAT", LogFormat::Text)?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values for consistency.
    ///
    /// Unparseable trust entries are not an error; see
    /// [`Config::warn_invalid_trusted_proxies`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigError` if validation fails.
    fn validate(&self) -> AppResult<()> {
        if self.use_proxy && self.trusted_proxies.is_empty() {
            return Err(AppError::ConfigError(
                "USE_PROXY=true requires at least one TRUSTED_PROXIES entry".to_string(),
            ));
        }

        Ok(())
    }

    /// Log a warning for every trust entry that will never match.
    ///
    /// Called once logging is initialised.
    pub fn warn_invalid_trusted_proxies(&self) {
        for entry in self.invalid_trusted_proxies() {
            warn!(entry = %entry, "TRUSTED_PROXIES entry is neither an address nor a CIDR range; it will never match");
        }
    }

    /// Trust entries that parse as neither an address nor a CIDR range.
    pub fn invalid_trusted_proxies(&self) -> impl Iterator<Item = &str> {
        self.trusted_proxies
            .iter()
            .map(String::as_str)
            .filter(|entry| !TrustEntry::parse(entry).is_valid())
    }

    /// Get the full server address for binding.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Gate configuration derived from this config.
    pub fn proxy_trust(&self) -> ProxyTrustConfig {
        ProxyTrustConfig::new(self.use_proxy, self.trusted_proxies.clone())
    }

    /// Check if Prometheus metrics export is enabled.
    pub fn metrics_enabled(&self) -> bool {
        self.metrics_port > 0
    }

    /// Get the metrics endpoint address.
    ///
    /// Returns `None` if metrics are disabled (port = 0).
    pub fn metrics_addr(&self) -> Option<std::net::SocketAddr> {
        if self.metrics_enabled() {
            Some(std::net::SocketAddr::from((
                [0, 0, 0, 0],
                self.metrics_port,
            )))
        } else {
            None
        }
    }

    /// Parse an environment variable into the specified type with a default value.
    fn parse_env<T>(name: &str, default: T) -> AppResult<T>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(name) {
            Ok(val) => val
                .parse()
                .map_err(|e| AppError::ConfigError(format!("Invalid {name}: {e}"))),
            Err(_) => Ok(default),
        }
    }

    /// Parse a boolean environment variable.
    fn parse_bool_env(name: &str, default: bool) -> AppResult<bool> {
        match env::var(name) {
            Ok(val) => parse_bool(&val)
                .ok_or_else(|| AppError::ConfigError(format!("Invalid {name}: {val:?}"))),
            Err(_) => Ok(default),
        }
    }

    /// Parse trusted proxies from environment variable.
    ///
    /// Format: comma-separated, whitespace around entries is ignored.
    fn parse_trusted_proxies() -> Vec<String> {
        env::var("TRUSTED_PROXIES")
            .map(|s| split_list(&s))
            .unwrap_or_default()
    }
}

/// Accepts `true/false`, `1/0`, `yes/no`, `on/off` (case-insensitive).
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Default configuration for testing and development.
///
/// Production deployments should use `Config::from_env()` instead.
impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            use_proxy: false,
            trusted_proxies: vec![],
            metrics_port: 0,
            log_format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert!(!config.use_proxy);
        assert!(config.trusted_proxies.is_empty());
        assert!(!config.metrics_enabled());
    }

    #[test]
    fn test_server_addr_format() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };

        assert_eq!(config.server_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_metrics_addr() {
        assert!(Config::default().metrics_addr().is_none());

        let config = Config {
            metrics_port: 9090,
            ..Config::default()
        };
        assert_eq!(config.metrics_addr().unwrap().port(), 9090);
    }

    #[test]
    fn test_validate_proxy_without_trusted_list() {
        let config = Config {
            use_proxy: true,
            ..Config::default()
        };

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("TRUSTED_PROXIES"));
    }

    #[test]
    fn test_validate_keeps_invalid_entries() {
        let config = Config {
            use_proxy: true,
            trusted_proxies: vec!["10.0.0.0/8".to_string(), "bogus".to_string()],
            ..Config::default()
        };

        assert!(config.validate().is_ok());
        assert_eq!(config.invalid_trusted_proxies().collect::<Vec<_>>(), vec!["bogus"]);
        assert_eq!(config.proxy_trust().trusted_proxies.len(), 2);
    }

    #[test]
    fn test_proxy_trust_mirrors_config() {
        let config = Config {
            use_proxy: true,
            trusted_proxies: vec!["127.0.0.1".to_string()],
            ..Config::default()
        };

        let trust = config.proxy_trust();
        assert!(trust.use_proxy);
        assert_eq!(trust.trusted_proxies, vec!["127.0.0.1"]);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(" JSON ".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::default(), LogFormat::Text);
        assert_eq!(LogFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" YES "), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" 10.0.0.0/8 , ,::1,"),
            vec!["10.0.0.0/8".to_string(), "::1".to_string()]
        );
        assert!(split_list("").is_empty());
    }
}
