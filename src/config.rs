//! Environment-driven service configuration.
//!
//! Read once at startup by [`load_from_env`]; the server refuses to start if
//! [`Config::validate`] fails.
//!
//! ## Storage Backends
//!
//! PostgreSQL and Redis are both optional. Without them placements and the
//! click registry live in process memory, which suits local development and
//! single-instance deployments.
//!
//! PostgreSQL is configured either with `DATABASE_URL` or with `DB_HOST`,
//! `DB_PORT`, `DB_USER`, `DB_PASSWORD` and `DB_NAME`. Redis is configured with
//! `REDIS_URL` or with `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD` and `REDIS_DB`.
//!
//! ```bash
//! export DATABASE_URL="postgres://clicks:pass@db:5432/clicks"
//! export REDIS_URL="redis://cache:6379/0"
//! ```
//!
//! ## Click Tracking
//!
//! | Variable               | Default                       | Meaning                                    |
//! |------------------------|-------------------------------|--------------------------------------------|
//! | `HMAC_SECRET`          | development key (warns)       | Tracking link signing key                  |
//! | `BASE_URL`             | `http://localhost:3000`       | Public origin embedded in tracking links   |
//! | `FALLBACK_URL`         | `https://example.com/landing` | Redirect for every non-billable click      |
//! | `API_TOKEN`            | unset (API disabled)          | Bearer token for `/api/*`                  |
//! | `REGISTRY_TTL_SECONDS` | unset (keys never expire)     | Expiry of Redis registry entries           |
//! | `EXTRA_BOT_PATTERNS`   | empty                         | Comma-separated user-agent substrings      |
//! | `BEHIND_PROXY`         | `false`                       | Trust `X-Forwarded-For` / `X-Real-IP`      |
//!
//! ## Server and Pool
//!
//! `LISTEN` (`0.0.0.0:3000`), `RUST_LOG` (`info`), `LOG_FORMAT` (`text` or
//! `json`), `DB_MAX_CONNECTIONS` (10), `DB_CONNECT_TIMEOUT` (30s),
//! `DB_IDLE_TIMEOUT` (600s), `DB_MAX_LIFETIME` (1800s).

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::utils::landing_url::normalize_landing_url;

/// Signing key used when `HMAC_SECRET` is not set.
pub const DEFAULT_HMAC_SECRET: &str = "default-secret-for-development";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

pub const DEFAULT_FALLBACK_URL: &str = "https://example.com/landing";

/// PostgreSQL pool tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// Seconds to wait for a free connection.
    pub acquire_timeout: u64,
    pub idle_timeout: u64,
    pub max_lifetime: u64,
}

impl PoolSettings {
    fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            max_connections: parsed_var("DB_MAX_CONNECTIONS")?
                .unwrap_or(defaults.max_connections),
            acquire_timeout: parsed_var("DB_CONNECT_TIMEOUT")?
                .unwrap_or(defaults.acquire_timeout),
            idle_timeout: parsed_var("DB_IDLE_TIMEOUT")?.unwrap_or(defaults.idle_timeout),
            max_lifetime: parsed_var("DB_MAX_LIFETIME")?.unwrap_or(defaults.max_lifetime),
        })
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime)
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: 30,
            idle_timeout: 600,
            max_lifetime: 1800,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` keeps placements in memory.
    pub database_url: Option<String>,
    /// `None` keeps the click registry in memory.
    pub redis_url: Option<String>,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Read the client IP (for deduplication and rate limiting) from proxy
    /// headers. Only safe behind a trusted reverse proxy.
    pub behind_proxy: bool,
    pub hmac_secret: String,
    pub base_url: String,
    pub fallback_url: String,
    pub api_token: Option<String>,
    /// Expiry for Redis registry keys. `None` keeps them forever.
    pub registry_ttl_seconds: Option<u64>,
    pub extra_bot_patterns: Vec<String>,
    pub pool: PoolSettings,
}

impl Config {
    /// Reads every setting from the process environment.
    ///
    /// # Errors
    ///
    /// Fails if a numeric variable does not parse, or if PostgreSQL is only
    /// partially described by its component variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: database_url_from_env().context("Invalid database configuration")?,
            redis_url: redis_url_from_env(),
            listen_addr: var_or("LISTEN", "0.0.0.0:3000"),
            log_level: var_or("RUST_LOG", "info"),
            log_format: var_or("LOG_FORMAT", "text"),
            behind_proxy: non_empty_var("BEHIND_PROXY")
                .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true")),
            hmac_secret: var_or("HMAC_SECRET", DEFAULT_HMAC_SECRET),
            base_url: var_or("BASE_URL", DEFAULT_BASE_URL),
            fallback_url: var_or("FALLBACK_URL", DEFAULT_FALLBACK_URL),
            api_token: non_empty_var("API_TOKEN"),
            registry_ttl_seconds: parsed_var("REGISTRY_TTL_SECONDS")?,
            extra_bot_patterns: non_empty_var("EXTRA_BOT_PATTERNS")
                .map(|v| split_patterns(&v))
                .unwrap_or_default(),
            pool: PoolSettings::from_env()?,
        })
    }

    /// Checks cross-field constraints that parsing alone cannot catch.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.log_format.as_str(), "text" | "json") {
            anyhow::bail!("LOG_FORMAT must be 'text' or 'json', got '{}'", self.log_format);
        }

        self.listen_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("LISTEN is not a socket address: '{}'", self.listen_addr))?;

        normalize_landing_url(&self.base_url)
            .with_context(|| format!("BASE_URL is invalid: '{}'", self.base_url))?;
        normalize_landing_url(&self.fallback_url)
            .with_context(|| format!("FALLBACK_URL is invalid: '{}'", self.fallback_url))?;

        if let Some(url) = &self.database_url {
            require_scheme("DATABASE_URL", url, &["postgres", "postgresql"])?;
        }
        if let Some(url) = &self.redis_url {
            require_scheme("REDIS_URL", url, &["redis", "rediss"])?;
        }

        if self.registry_ttl_seconds == Some(0) {
            anyhow::bail!("REGISTRY_TTL_SECONDS must be greater than 0");
        }
        if self.pool.max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.pool.acquire_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    /// Returns whether tracking links are signed with the development key.
    pub fn uses_default_secret(&self) -> bool {
        self.hmac_secret == DEFAULT_HMAC_SECRET
    }

    /// Logs the effective settings with credentials masked.
    pub fn print_summary(&self) {
        let store = self
            .database_url
            .as_deref()
            .map_or_else(|| "in-memory".to_string(), mask_connection_string);
        let registry = self
            .redis_url
            .as_deref()
            .map_or_else(|| "in-memory".to_string(), mask_connection_string);

        tracing::info!(
            listen = %self.listen_addr,
            base_url = %self.base_url,
            fallback_url = %self.fallback_url,
            placement_store = %store,
            click_registry = %registry,
            management_api = self.api_token.is_some(),
            behind_proxy = self.behind_proxy,
            extra_bot_patterns = self.extra_bot_patterns.len(),
            log_format = %self.log_format,
            "Configuration loaded"
        );

        if self.uses_default_secret() {
            tracing::warn!("HMAC_SECRET is not set; using the development signing key");
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    non_empty_var(key).unwrap_or_else(|| default.to_string())
}

fn required_var(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set when DATABASE_URL is not provided"))
}

/// Parses an optional variable, failing on malformed values instead of
/// silently using a default.
fn parsed_var<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    non_empty_var(key)
        .map(|v| v.trim().parse::<T>())
        .transpose()
        .with_context(|| format!("{key} has an invalid value"))
}

fn split_patterns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `DATABASE_URL`, or a URL assembled from `DB_*` components.
///
/// `Ok(None)` when neither `DB_HOST` nor `DB_USER` is present.
fn database_url_from_env() -> Result<Option<String>> {
    if let Some(url) = non_empty_var("DATABASE_URL") {
        return Ok(Some(url));
    }

    if non_empty_var("DB_HOST").is_none() && non_empty_var("DB_USER").is_none() {
        return Ok(None);
    }

    let user = required_var("DB_USER")?;
    let password = required_var("DB_PASSWORD")?;
    let name = required_var("DB_NAME")?;
    let host = var_or("DB_HOST", "localhost");
    let port = var_or("DB_PORT", "5432");

    Ok(Some(format!("postgres://{user}:{password}@{host}:{port}/{name}")))
}

/// `REDIS_URL`, or a URL assembled from `REDIS_*` components when
/// `REDIS_HOST` is set.
fn redis_url_from_env() -> Option<String> {
    if let Some(url) = non_empty_var("REDIS_URL") {
        return Some(url);
    }

    let host = non_empty_var("REDIS_HOST")?;
    let port = var_or("REDIS_PORT", "6379");
    let db = var_or("REDIS_DB", "0");

    Some(match non_empty_var("REDIS_PASSWORD") {
        Some(password) => format!("redis://:{password}@{host}:{port}/{db}"),
        None => format!("redis://{host}:{port}/{db}"),
    })
}

fn require_scheme(key: &str, url: &str, allowed: &[&str]) -> Result<()> {
    let scheme = url.split_once("://").map(|(scheme, _)| scheme);

    if scheme.is_some_and(|s| allowed.contains(&s)) {
        Ok(())
    } else {
        anyhow::bail!(
            "{key} must use one of {:?}, got '{}'",
            allowed,
            mask_connection_string(url)
        )
    }
}

/// Replaces the password of a connection URL with `***`.
///
/// Strings that do not parse as URLs, or carry no password, are returned as is.
pub fn mask_connection_string(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => {
            if url.set_password(Some("***")).is_ok() {
                url.to_string()
            } else {
                raw.to_string()
            }
        }
        _ => raw.to_string(),
    }
}

/// Reads and validates the configuration.
///
/// Expects `.env` to have been applied already (see `main.rs`).
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
