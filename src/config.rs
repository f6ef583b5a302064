//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server
//! starts. Every variable is optional; the defaults reproduce the production
//! policy for `wss13.com.br`.
//!
//! ## Server
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//!
//! ## Security
//!
//! ```bash
//! export ALLOWED_HOSTS="wss13.com.br,*.wss13.com.br,localhost,127.0.0.1"
//! export WWW_REDIRECT="true"
//! export CORS_ALLOWED_ORIGINS="https://wss13.com.br"
//! export CORS_ALLOWED_METHODS="GET,POST,PUT,DELETE"
//! export CORS_MAX_AGE="3600"
//! export COMPRESSION_MIN_SIZE="1000"
//! export RATE_LIMIT_PERIOD_SECONDS="1"
//! export RATE_LIMIT_BURST="60"
//! export BEHIND_PROXY="false"
//! ```

use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_ALLOWED_HOSTS: &[&str] =
    &["wss13.com.br", "*.wss13.com.br", "localhost", "127.0.0.1"];
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["https://wss13.com.br"];
pub const DEFAULT_CORS_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE"];

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub security: SecurityConfig,
}

/// Policy values consumed by [`crate::routes::configure_app`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Host patterns accepted in the `Host` header. See [`crate::policy::host`].
    pub allowed_hosts: Vec<String>,
    /// Redirect `example.com` to `www.example.com` when only the latter is allowed.
    pub www_redirect: bool,
    pub cors_allowed_origins: Vec<String>,
    pub cors_allowed_methods: Vec<String>,
    pub cors_allow_credentials: bool,
    /// How long browsers may cache preflight results (`Access-Control-Max-Age`).
    pub cors_max_age_seconds: u64,
    /// Bodies smaller than this are sent uncompressed.
    pub compression_min_size: u16,
    /// Seconds after which one request slot is replenished.
    pub rate_limit_period_seconds: u64,
    pub rate_limit_burst: u32,
    /// When true, rate limiting reads client IP from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: to_owned_list(DEFAULT_ALLOWED_HOSTS),
            www_redirect: true,
            cors_allowed_origins: to_owned_list(DEFAULT_CORS_ORIGINS),
            cors_allowed_methods: to_owned_list(DEFAULT_CORS_METHODS),
            cors_allow_credentials: true,
            cors_max_age_seconds: 3600,
            compression_min_size: 1000,
            rate_limit_period_seconds: 1,
            rate_limit_burst: 60,
            behind_proxy: false,
        }
    }
}

impl SecurityConfig {
    /// Loads security settings, falling back to [`SecurityConfig::default`]
    /// for anything unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            allowed_hosts: env_list("ALLOWED_HOSTS").unwrap_or(defaults.allowed_hosts),
            www_redirect: env_bool("WWW_REDIRECT").unwrap_or(defaults.www_redirect),
            cors_allowed_origins: env_list("CORS_ALLOWED_ORIGINS")
                .unwrap_or(defaults.cors_allowed_origins),
            cors_allowed_methods: env_list("CORS_ALLOWED_METHODS")
                .unwrap_or(defaults.cors_allowed_methods),
            cors_allow_credentials: env_bool("CORS_ALLOW_CREDENTIALS")
                .unwrap_or(defaults.cors_allow_credentials),
            cors_max_age_seconds: env_parse("CORS_MAX_AGE")?
                .unwrap_or(defaults.cors_max_age_seconds),
            compression_min_size: env_parse("COMPRESSION_MIN_SIZE")?
                .unwrap_or(defaults.compression_min_size),
            rate_limit_period_seconds: env_parse("RATE_LIMIT_PERIOD_SECONDS")?
                .unwrap_or(defaults.rate_limit_period_seconds),
            rate_limit_burst: env_parse("RATE_LIMIT_BURST")?.unwrap_or(defaults.rate_limit_burst),
            behind_proxy: env_bool("BEHIND_PROXY").unwrap_or(defaults.behind_proxy),
        })
    }

    /// Validates the security settings.
    ///
    /// Pattern syntax is checked later by [`crate::routes::configure_app`];
    /// this only rejects values that can never produce a working stack.
    pub fn validate(&self) -> Result<()> {
        if self.allowed_hosts.is_empty() {
            anyhow::bail!("ALLOWED_HOSTS must contain at least one host");
        }

        if self.cors_allowed_origins.is_empty() {
            anyhow::bail!("CORS_ALLOWED_ORIGINS must contain at least one origin");
        }

        if self.cors_allow_credentials && self.cors_allowed_origins.iter().any(|o| o == "*") {
            anyhow::bail!("CORS_ALLOWED_ORIGINS cannot contain '*' when credentials are allowed");
        }

        if self.compression_min_size == 0 {
            anyhow::bail!("COMPRESSION_MIN_SIZE must be greater than 0");
        }

        if self.rate_limit_period_seconds == 0 {
            anyhow::bail!("RATE_LIMIT_PERIOD_SECONDS must be greater than 0");
        }

        if self.rate_limit_burst == 0 {
            anyhow::bail!("RATE_LIMIT_BURST must be greater than 0");
        }

        Ok(())
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let security = SecurityConfig::from_env().context("Failed to load security configuration")?;

        Ok(Self {
            listen_addr,
            log_level,
            log_format,
            security,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - any security setting is out of range
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        self.security.validate()
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Allowed hosts: {}", self.security.allowed_hosts.join(", "));
        tracing::info!(
            "  CORS origins: {}",
            self.security.cors_allowed_origins.join(", ")
        );
        tracing::info!(
            "  Rate limit: 1 request per {}s, burst {}{}",
            self.security.rate_limit_period_seconds,
            self.security.rate_limit_burst,
            if self.security.behind_proxy {
                " (behind proxy)"
            } else {
                ""
            }
        );
        tracing::info!(
            "  Compression threshold: {} bytes",
            self.security.compression_min_size
        );
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Parses a comma-separated variable, ignoring blank entries.
///
/// Returns `None` when the variable is unset or contains no entries.
fn env_list(key: &str) -> Option<Vec<String>> {
    let raw = env::var(key).ok()?;
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() { None } else { Some(items) }
}

fn env_bool(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(None),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
