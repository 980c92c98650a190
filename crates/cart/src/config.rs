//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CART_INVENTORY_URL` - Base URL of the inventory service (e.g., `http://localhost:3333`)
//!
//! ## Optional
//! - `CART_INVENTORY_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `CART_PRODUCT_CACHE_TTL_SECS` - Product metadata cache TTL (default: 300)
//! - `CART_PRODUCT_CACHE_CAPACITY` - Product metadata cache size (default: 1000)
//! - `CART_STORE_PATH` - Durable store file (default: `.cartwheel/store.json`)
//! - `CART_STORAGE_KEY` - Key holding the serialized cart (default: `@cartwheel:cart`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Key under which the cart is persisted unless overridden.
pub const DEFAULT_STORAGE_KEY: &str = "@cartwheel:cart";

const DEFAULT_STORE_PATH: &str = ".cartwheel/store.json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Inventory service configuration
    pub inventory: InventoryConfig,
    /// Path of the durable key-value store file
    pub store_path: PathBuf,
    /// Key holding the serialized cart
    pub storage_key: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Inventory service configuration.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Base URL, always ending in `/`
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long product metadata stays cached
    pub product_cache_ttl: Duration,
    /// Maximum number of cached products
    pub product_cache_capacity: u64,
}

impl InventoryConfig {
    /// Configuration with default timeout and cache settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("CART_INVENTORY_URL", base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            product_cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            product_cache_capacity: DEFAULT_CACHE_CAPACITY,
        })
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = get_required(lookup, "CART_INVENTORY_URL")?;
        Ok(Self {
            base_url: parse_base_url("CART_INVENTORY_URL", &raw_url)?,
            timeout: Duration::from_secs(get_parsed_or_default(
                lookup,
                "CART_INVENTORY_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            product_cache_ttl: Duration::from_secs(get_parsed_or_default(
                lookup,
                "CART_PRODUCT_CACHE_TTL_SECS",
                DEFAULT_CACHE_TTL_SECS,
            )?),
            product_cache_capacity: get_parsed_or_default(
                lookup,
                "CART_PRODUCT_CACHE_CAPACITY",
                DEFAULT_CACHE_CAPACITY,
            )?,
        })
    }
}

impl CartConfig {
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let inventory = InventoryConfig::from_lookup(&lookup)?;
        let store_path = PathBuf::from(get_or_default(&lookup, "CART_STORE_PATH", DEFAULT_STORE_PATH));
        let storage_key = get_or_default(&lookup, "CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            inventory,
            store_path,
            storage_key,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required variable.
fn get_required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable, falling back to `default` when it is unset.
fn get_parsed_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a base URL and make sure relative joins stay under its path.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
