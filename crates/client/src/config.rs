//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPFACET_BASE_URL` - Origin of the catalog server (e.g., <https://shop.example.com>)
//!
//! ## Optional
//! - `SHOPFACET_ENDPOINT` - Endpoint family: `shop` (default) or `category:<id>`
//! - `SHOPFACET_PER_PAGE` - Products per page on the shop endpoint (default: 20)
//! - `SHOPFACET_DISPLAY` - Cap on products shown per page, shop endpoint (optional)
//! - `SHOPFACET_TIMEOUT_SECS` - Request timeout (default: 15)
//! - `SHOPFACET_STORAGE_PATH` - Persisted filter storage file (default: .shopfacet/storage.json)
//! - `SHOPFACET_SEARCH_DEBOUNCE_MS` - Search input debounce (default: 500)
//! - `SHOPFACET_SCROLL_DEBOUNCE_MS` - Scroll debounce (default: 100)
//! - `SHOPFACET_RESIZE_DEBOUNCE_MS` - Resize debounce (default: 250)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use shopfacet_core::CategoryId;
use thiserror::Error;
use url::Url;

const DEFAULT_PER_PAGE: u32 = 20;
const DEFAULT_TIMEOUT_SECS: u64 = 15;
/// Storage file used when `SHOPFACET_STORAGE_PATH` is unset.
pub const DEFAULT_STORAGE_PATH: &str = ".shopfacet/storage.json";
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;
const DEFAULT_SCROLL_DEBOUNCE_MS: u64 = 100;
const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 250;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which endpoint family the page talks to.
///
/// Chosen explicitly rather than inferred from which filter form is on the
/// page; each family has its own query dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndpointFamily {
    /// The catalog-wide `/filter_products/` endpoint.
    #[default]
    Shop,
    /// The category-scoped `/category/{id}/filter/` endpoint.
    Category(CategoryId),
}

impl FromStr for EndpointFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("shop") {
            return Ok(Self::Shop);
        }
        if let Some(id) = s.strip_prefix("category:") {
            return id
                .parse::<CategoryId>()
                .map(Self::Category)
                .map_err(|e| format!("invalid category id '{id}': {e}"));
        }
        Err(format!("expected 'shop' or 'category:<id>', got '{s}'"))
    }
}

/// Debounce windows for coalescing rapid UI events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    /// Search input
    pub search: Duration,
    /// Scroll position checks
    pub scroll: Duration,
    /// Viewport resize
    pub resize: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            search: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            scroll: Duration::from_millis(DEFAULT_SCROLL_DEBOUNCE_MS),
            resize: Duration::from_millis(DEFAULT_RESIZE_DEBOUNCE_MS),
        }
    }
}

/// Shopfacet client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin of the catalog server
    pub base_url: Url,
    /// Endpoint family used for product requests
    pub endpoint: EndpointFamily,
    /// Products per page (shop endpoint)
    pub per_page: u32,
    /// Initial items-per-page choice (shop endpoint)
    pub display: Option<u32>,
    /// Request timeout
    pub timeout: Duration,
    /// Persisted filter storage file
    pub storage_path: PathBuf,
    /// Debounce windows
    pub debounce: DebounceConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ClientConfig {
    /// Build a configuration with defaults for everything but the server.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            endpoint: EndpointFamily::default(),
            per_page: DEFAULT_PER_PAGE,
            display: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            debounce: DebounceConfig::default(),
            sentry_dsn: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("SHOPFACET_BASE_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("SHOPFACET_BASE_URL".to_string(), e.to_string())
        })?;

        let endpoint = parse_env_or_default("SHOPFACET_ENDPOINT", EndpointFamily::Shop)?;
        let per_page = parse_env_or_default("SHOPFACET_PER_PAGE", DEFAULT_PER_PAGE)?;
        if per_page == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPFACET_PER_PAGE".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let display = get_optional_env("SHOPFACET_DISPLAY")
            .map(|raw| {
                raw.parse::<u32>().map_err(|e| {
                    ConfigError::InvalidEnvVar("SHOPFACET_DISPLAY".to_string(), e.to_string())
                })
            })
            .transpose()?
            .filter(|d| *d > 0);
        let timeout = Duration::from_secs(parse_env_or_default(
            "SHOPFACET_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )?);
        let storage_path = PathBuf::from(get_env_or_default(
            "SHOPFACET_STORAGE_PATH",
            DEFAULT_STORAGE_PATH,
        ));

        let debounce = DebounceConfig {
            search: Duration::from_millis(parse_env_or_default(
                "SHOPFACET_SEARCH_DEBOUNCE_MS",
                DEFAULT_SEARCH_DEBOUNCE_MS,
            )?),
            scroll: Duration::from_millis(parse_env_or_default(
                "SHOPFACET_SCROLL_DEBOUNCE_MS",
                DEFAULT_SCROLL_DEBOUNCE_MS,
            )?),
            resize: Duration::from_millis(parse_env_or_default(
                "SHOPFACET_RESIZE_DEBOUNCE_MS",
                DEFAULT_RESIZE_DEBOUNCE_MS,
            )?),
        };

        Ok(Self {
            base_url,
            endpoint,
            per_page,
            display,
            timeout,
            storage_path,
            debounce,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, falling back to `default`.
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
